//! Status widgets the update loop publishes to

mod terminal;

pub use terminal::{terminal_columns, TerminalWidget};
