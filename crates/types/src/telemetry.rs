//! Telemetry readings handed to metric sources.
//!
//! Units follow what the host telemetry layer reports: battery capacity in
//! milliwatt-hours, voltage in volts, charge as a whole percentage.

use serde::{Deserialize, Serialize};

/// Instantaneous CPU load
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpuLoad {
    /// Percentage of time the CPUs were idle since the previous sample (0.0 - 100.0)
    pub idle_percent: f64,
}

impl CpuLoad {
    pub fn new(idle_percent: f64) -> Self {
        Self { idle_percent }
    }

    /// Busy percentage, `100 - idle`
    pub fn usage_percent(&self) -> f64 {
        100.0 - self.idle_percent
    }
}

/// Battery state at the time of sampling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryReading {
    /// Remaining energy in mWh
    pub current_capacity: f64,
    /// Battery voltage in volts
    pub voltage: f64,
    /// State of charge, 0 - 100
    pub charge_percent: u8,
}

impl BatteryReading {
    pub fn new(current_capacity: f64, voltage: f64, charge_percent: u8) -> Self {
        Self {
            current_capacity,
            voltage,
            charge_percent,
        }
    }

    pub fn is_fully_charged(&self) -> bool {
        self.charge_percent >= 100
    }
}

/// Location derived from the machine's public IP address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Country name as reported by the lookup service (e.g. "United States")
    pub country: String,
    /// ISO 3166-1 alpha-2 code (e.g. "US")
    pub country_code: String,
    /// First-level subdivision name (e.g. "Oregon")
    pub region: String,
}

impl GeoLocation {
    pub fn new(
        country: impl Into<String>,
        country_code: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            country: country.into(),
            country_code: country_code.into(),
            region: region.into(),
        }
    }
}
