//! Shared constants for the status line

use std::time::Duration;

/// Text placed between two source displays
pub const DELIMITER: &str = "    ";

/// Filler used to right-pad a display to its widest width so far (U+2000 EN QUAD)
pub const PAD_CHAR: char = '\u{2000}';

/// Decimal places used when `show.precision` is missing or unusable
pub const DEFAULT_PRECISION: usize = 2;

/// Upper bound for `show.precision`
pub const MAX_PRECISION: usize = 10;

/// Poll interval when `updatefrequencyms` is missing
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_millis(60_000);

/// Lower bound for the poll interval so a zero setting cannot spin
pub const MIN_UPDATE_INTERVAL: Duration = Duration::from_millis(100);

/// Per-source render budget when `sourcetimeoutms` is missing
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Configuration keys read by the update cycle
pub mod keys {
    pub const SHOW_PREFIX: &str = "show";
    pub const PRECISION: &str = "show.precision";
    pub const ALIGN_LEFT: &str = "alignLeft";
    pub const COLOR: &str = "color";
    pub const UPDATE_FREQUENCY_MS: &str = "updatefrequencyms";
    pub const SOURCE_TIMEOUT_MS: &str = "sourcetimeoutms";
}
