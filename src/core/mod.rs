//! Update loop for the status line

mod toolbar;

pub use toolbar::Toolbar;
