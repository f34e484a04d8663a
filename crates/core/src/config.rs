//! Per-cycle configuration snapshot
//!
//! The update loop takes a fresh snapshot at the start of every cycle, so edits
//! to the settings store are picked up without a restart. A snapshot never
//! changes once taken.
//!
//! Keys may be stored flat (`"show.cpuusage": true`) or nested
//! (`"show": {"cpuusage": true}`). A flat entry wins over a nested one.

use crate::constants::{
    keys, DEFAULT_PRECISION, DEFAULT_SOURCE_TIMEOUT, DEFAULT_UPDATE_INTERVAL, MAX_PRECISION,
    MIN_UPDATE_INTERVAL,
};
use anyhow::Result;
use duke_status_types::{Alignment, HexColor, DEFAULT_COLOR};
use log::debug;
use serde_json::{Map, Value};
use std::time::Duration;

/// Source of configuration snapshots (settings file, in-memory map, ...)
pub trait ConfigProvider: Send + Sync {
    /// Read the current settings
    fn snapshot(&self) -> Result<ConfigSnapshot>;
}

/// Immutable key/value view of the settings for one cycle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSnapshot {
    values: Map<String, Value>,
}

impl ConfigSnapshot {
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Build a snapshot from any JSON value; non-objects yield an empty snapshot
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(values) => Self { values },
            Value::Null => Self::default(),
            other => {
                debug!("Settings root is not an object ({}), using defaults", other);
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw lookup: flat key first, then the dotted path through nested objects
    pub fn get(&self, key: &str) -> Option<&Value> {
        if let Some(value) = self.values.get(key) {
            return Some(value);
        }

        let mut parts = key.split('.');
        let first = parts.next()?;
        let mut current = self.values.get(first)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                debug!("Setting {} is not a boolean ({}), using {}", key, other, default);
                default
            }
            None => default,
        }
    }

    /// Non-negative integer setting. Whole-valued floats are accepted.
    pub fn get_u64(&self, key: &str, default: u64) -> u64 {
        let Some(value) = self.get(key) else {
            return default;
        };

        if let Some(n) = value.as_u64() {
            return n;
        }
        match value.as_f64() {
            Some(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 => f as u64,
            _ => {
                debug!("Setting {} is not a non-negative integer ({}), using {}", key, value, default);
                default
            }
        }
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Some(Value::String(s)) => s.clone(),
            _ => default.to_string(),
        }
    }

    /// Decimal places for numeric displays (`show.precision`)
    pub fn precision(&self) -> usize {
        let precision = self.get_u64(keys::PRECISION, DEFAULT_PRECISION as u64);
        (precision as usize).min(MAX_PRECISION)
    }

    /// Text colour (`color`), falling back to white when malformed
    pub fn color(&self) -> HexColor {
        HexColor::parse_or(&self.get_string(keys::COLOR, DEFAULT_COLOR), DEFAULT_COLOR)
    }

    /// Anchor side (`alignLeft`)
    pub fn alignment(&self) -> Alignment {
        Alignment::from_align_left(self.get_bool(keys::ALIGN_LEFT, false))
    }

    /// Delay between the end of one cycle and the start of the next (`updatefrequencyms`)
    pub fn update_interval(&self) -> Duration {
        let ms = self.get_u64(
            keys::UPDATE_FREQUENCY_MS,
            DEFAULT_UPDATE_INTERVAL.as_millis() as u64,
        );
        Duration::from_millis(ms).max(MIN_UPDATE_INTERVAL)
    }

    /// Longest a single source may take to render (`sourcetimeoutms`); 0 disables the limit
    pub fn source_timeout(&self) -> Option<Duration> {
        match self.get_u64(keys::SOURCE_TIMEOUT_MS, DEFAULT_SOURCE_TIMEOUT.as_millis() as u64) {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

impl From<Map<String, Value>> for ConfigSnapshot {
    fn from(values: Map<String, Value>) -> Self {
        Self::new(values)
    }
}

/// Provider that always hands out the same settings
#[derive(Debug, Clone, Default)]
pub struct StaticConfig {
    snapshot: ConfigSnapshot,
}

impl StaticConfig {
    pub fn new(value: Value) -> Self {
        Self {
            snapshot: ConfigSnapshot::from_value(value),
        }
    }
}

impl ConfigProvider for StaticConfig {
    fn snapshot(&self) -> Result<ConfigSnapshot> {
        Ok(self.snapshot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_key_lookup() {
        let config = ConfigSnapshot::from_value(json!({"show.cpuusage": false}));
        assert!(!config.get_bool("show.cpuusage", true));
    }

    #[test]
    fn test_nested_key_lookup() {
        let config = ConfigSnapshot::from_value(json!({"show": {"voltage": true}}));
        assert!(config.get_bool("show.voltage", false));
    }

    #[test]
    fn test_flat_key_wins_over_nested() {
        let config = ConfigSnapshot::from_value(json!({
            "show.location": true,
            "show": {"location": false}
        }));
        assert!(config.get_bool("show.location", false));
    }

    #[test]
    fn test_default_is_a_fallback_not_an_override() {
        let config = ConfigSnapshot::from_value(json!({"show.emissions": false}));
        assert!(!config.get_bool("show.emissions", true));
        assert!(config.get_bool("show.missing", true));
    }

    #[test]
    fn test_wrong_type_uses_default() {
        let config = ConfigSnapshot::from_value(json!({"show.cpuusage": "yes"}));
        assert!(config.get_bool("show.cpuusage", true));
    }

    #[test]
    fn test_precision_default_and_clamp() {
        assert_eq!(ConfigSnapshot::default().precision(), 2);
        let config = ConfigSnapshot::from_value(json!({"show.precision": 4}));
        assert_eq!(config.precision(), 4);
        let config = ConfigSnapshot::from_value(json!({"show.precision": 99}));
        assert_eq!(config.precision(), MAX_PRECISION);
        let config = ConfigSnapshot::from_value(json!({"show.precision": -1}));
        assert_eq!(config.precision(), 2);
    }

    #[test]
    fn test_color_fallback() {
        let config = ConfigSnapshot::from_value(json!({"color": "#12ab34"}));
        assert_eq!(config.color().as_str(), "#12ab34");
        let config = ConfigSnapshot::from_value(json!({"color": "red"}));
        assert_eq!(config.color().as_str(), DEFAULT_COLOR);
    }

    #[test]
    fn test_alignment() {
        assert_eq!(ConfigSnapshot::default().alignment(), Alignment::Right);
        let config = ConfigSnapshot::from_value(json!({"alignLeft": true}));
        assert_eq!(config.alignment(), Alignment::Left);
    }

    #[test]
    fn test_update_interval() {
        assert_eq!(ConfigSnapshot::default().update_interval(), DEFAULT_UPDATE_INTERVAL);
        let config = ConfigSnapshot::from_value(json!({"updatefrequencyms": 1500}));
        assert_eq!(config.update_interval(), Duration::from_millis(1500));
        let config = ConfigSnapshot::from_value(json!({"updatefrequencyms": 0}));
        assert_eq!(config.update_interval(), MIN_UPDATE_INTERVAL);
    }

    #[test]
    fn test_source_timeout_zero_disables() {
        assert_eq!(ConfigSnapshot::default().source_timeout(), Some(DEFAULT_SOURCE_TIMEOUT));
        let config = ConfigSnapshot::from_value(json!({"sourcetimeoutms": 0}));
        assert_eq!(config.source_timeout(), None);
    }

    #[test]
    fn test_non_object_root_is_empty() {
        assert!(ConfigSnapshot::from_value(json!([1, 2, 3])).is_empty());
    }
}
