//! Hex colour used for the status line text.
//!
//! Only the `#RRGGBB` form is accepted. Anything else is treated as a
//! configuration mistake and replaced with the caller's fallback.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Colour used when the configured value is missing or malformed
pub const DEFAULT_COLOR: &str = "#FFFFFF";

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^#[0-9A-F]{6}$").expect("Invalid regex"));

/// Validated `#RRGGBB` colour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Parse a `#RRGGBB` string, returning `None` for anything else
    pub fn parse(value: &str) -> Option<Self> {
        if HEX_COLOR_RE.is_match(value) {
            Some(Self(value.to_string()))
        } else {
            None
        }
    }

    /// Parse `value`, falling back to `fallback` (and then to white) when malformed
    pub fn parse_or(value: &str, fallback: &str) -> Self {
        Self::parse(value)
            .or_else(|| {
                log::debug!("Ignoring malformed colour {:?}, using {}", value, fallback);
                Self::parse(fallback)
            })
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Red, green and blue components
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&self.0[range], 16).unwrap_or(u8::MAX)
        };
        (channel(1..3), channel(3..5), channel(5..7))
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self(DEFAULT_COLOR.to_string())
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("expected #RRGGBB colour, got {:?}", value))
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_rrggbb_any_case() {
        assert!(HexColor::parse("#ffa500").is_some());
        assert!(HexColor::parse("#FFA500").is_some());
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in ["ffa500", "#fff", "#ffa5000", "#gggggg", "", "orange"] {
            assert!(HexColor::parse(bad).is_none(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_parse_or_falls_back() {
        assert_eq!(HexColor::parse_or("nope", "#00FF00").as_str(), "#00FF00");
        assert_eq!(HexColor::parse_or("nope", "also nope").as_str(), DEFAULT_COLOR);
    }

    #[test]
    fn test_rgb_components() {
        let color = HexColor::parse("#10A0ff").unwrap();
        assert_eq!(color.to_rgb8(), (0x10, 0xA0, 0xFF));
    }
}
