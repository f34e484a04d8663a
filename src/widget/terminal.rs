//! Single-line terminal status widget
//!
//! Redraws one line in place: move to column 0, clear the line, print the
//! text in a 24-bit foreground colour. Right alignment pads the line on the
//! left so it ends at the terminal's last column. The line is clipped to the
//! terminal width so it never wraps onto a second row.

use anyhow::Result;
use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use duke_status_core::StatusWidget;
use duke_status_types::{Alignment, HexColor};
use std::io::{self, Stdout, Write};

const DEFAULT_COLUMNS: usize = 80;

/// Width of the attached terminal, or 80 when there is none
pub fn terminal_columns() -> usize {
    match terminal::size() {
        Ok((columns, _)) if columns > 0 => usize::from(columns),
        _ => DEFAULT_COLUMNS,
    }
}

pub struct TerminalWidget<W: Write + Send = Stdout> {
    out: W,
    text: String,
    color: HexColor,
    alignment: Alignment,
    /// Fixed width, or `None` to ask the terminal on every redraw
    columns: Option<usize>,
    visible: bool,
    disposed: bool,
}

impl TerminalWidget<Stdout> {
    /// Widget on stdout that follows terminal resizes
    pub fn stdout(alignment: Alignment) -> Self {
        Self::with_columns(io::stdout(), alignment, None)
    }
}

impl<W: Write + Send> TerminalWidget<W> {
    pub fn new(out: W, alignment: Alignment, columns: usize) -> Self {
        Self::with_columns(out, alignment, Some(columns))
    }

    fn with_columns(out: W, alignment: Alignment, columns: Option<usize>) -> Self {
        Self {
            out,
            text: String::new(),
            color: HexColor::default(),
            alignment,
            columns,
            visible: false,
            disposed: false,
        }
    }

    fn columns(&self) -> usize {
        self.columns.unwrap_or_else(terminal_columns)
    }

    /// The visible line, padded and clipped, without escape sequences
    pub fn render_line(&self) -> String {
        let columns = self.columns();
        let text: String = self.text.chars().take(columns).collect();
        let indent = match self.alignment {
            Alignment::Left => 0,
            Alignment::Right => columns.saturating_sub(text.chars().count()),
        };
        format!("{}{}", " ".repeat(indent), text)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn redraw(&mut self) -> Result<()> {
        if !self.visible || self.disposed {
            return Ok(());
        }
        let (r, g, b) = self.color.to_rgb8();
        let line = self.render_line();
        queue!(
            self.out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Rgb { r, g, b }),
            Print(line),
            ResetColor
        )?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> StatusWidget for TerminalWidget<W> {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.text = text.to_string();
        self.redraw()
    }

    fn set_color(&mut self, color: &HexColor) {
        self.color = color.clone();
    }

    fn set_alignment(&mut self, alignment: Alignment) {
        self.alignment = alignment;
    }

    fn alignment(&self) -> Alignment {
        self.alignment
    }

    fn show(&mut self) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        self.visible = true;
        self.redraw()
    }

    fn dispose(&mut self) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        if self.visible {
            queue!(self.out, Print("\n"))?;
            self.out.flush()?;
        }
        self.visible = false;
        self.disposed = true;
        Ok(())
    }
}
