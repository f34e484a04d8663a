//! duke-status: a compact, stable-width status line for host telemetry
//!
//! This library provides the pieces the `duke-status` binary wires together:
//! - The `Toolbar` update loop that polls sources and publishes one line
//! - A JSON settings file as the configuration provider
//! - A terminal widget that redraws the line in place

pub mod config;
pub mod core;
pub mod widget;

// Re-export commonly used types
pub use config::SettingsFile;
pub use core::Toolbar;
pub use widget::TerminalWidget;
