//! Estimated CO₂ emissions from battery drain
//!
//! Each poll compares the battery's remaining capacity with the previous poll,
//! turns the difference into energy, adds it to a running total and converts
//! the total to grams of CO₂ using the regional emission factor for where the
//! machine is.
//!
//! The energy step uses `delta_capacity * voltage / 1_000_000 / 3600`. The
//! units are informal (it assumes one sample per interval and mixes mWh with
//! volts) and the result is an approximation; the constants are kept fixed
//! because the regional conversion is tuned to this magnitude.

use crate::emission_factors::EmissionFactors;
use async_trait::async_trait;
use duke_status_core::{MetricSource, SourceError, SourceMetadata, TelemetrySnapshot};
use duke_status_types::{BatteryReading, GeoLocation};
use std::sync::Arc;

/// Shown for the first sample, which only seeds the baseline
pub const ZERO_PLACEHOLDER: &str = "0 emissions";

/// Shown while the battery is full; no drain can be measured on mains power
pub const UNPLUG_MESSAGE: &str = "Unplug to measure emissions";

/// Shown when there is no emission factor for the current location
pub const UNSUPPORTED_REGION_MESSAGE: &str = "Emissions data unavailable for this region";

const GRAMS_PER_POUND: f64 = 453.592;

/// Energy drawn between two samples, in Wh
pub fn energy_increment_wh(delta_capacity: f64, voltage: f64) -> f64 {
    delta_capacity * voltage / 1_000_000.0 / 3600.0
}

/// What a sample did to the estimator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    /// First sample; baseline recorded, nothing accumulated
    Priming,
    /// Battery full; baseline moved, nothing accumulated
    FullCharge,
    /// Energy added to the running total
    Accumulated { increment_wh: f64 },
}

/// Running energy total carried across polls
#[derive(Debug, Clone)]
pub struct EmissionsEstimator {
    sample_index: i64,
    last_capacity: f64,
    cumulative_energy_wh: f64,
}

impl EmissionsEstimator {
    pub fn new() -> Self {
        Self {
            sample_index: -1,
            last_capacity: 0.0,
            cumulative_energy_wh: 0.0,
        }
    }

    pub fn sample_index(&self) -> i64 {
        self.sample_index
    }

    pub fn last_capacity(&self) -> f64 {
        self.last_capacity
    }

    pub fn cumulative_energy_wh(&self) -> f64 {
        self.cumulative_energy_wh
    }

    pub fn is_priming(&self) -> bool {
        self.sample_index < 0
    }

    /// Feed one battery reading into the estimator
    pub fn record(&mut self, battery: &BatteryReading) -> Sample {
        let priming = self.is_priming();
        self.sample_index += 1;

        if priming {
            self.last_capacity = battery.current_capacity;
            return Sample::Priming;
        }

        let delta_capacity = (battery.current_capacity - self.last_capacity).abs();
        // Capacity tracking continues even while the battery is full
        self.last_capacity = battery.current_capacity;

        if battery.is_fully_charged() {
            return Sample::FullCharge;
        }

        let increment_wh = energy_increment_wh(delta_capacity, battery.voltage);
        // The total never goes backward, even on a nonsensical voltage reading
        let increment_wh = if increment_wh.is_finite() {
            increment_wh.max(0.0)
        } else {
            0.0
        };
        self.cumulative_energy_wh += increment_wh;

        Sample::Accumulated { increment_wh }
    }

    /// Grams of CO₂ for the energy used so far, given pounds of CO₂ per MWh
    pub fn grams_co2(&self, lbs_per_mwh: f64) -> f64 {
        let lbs = (lbs_per_mwh / 1000.0) * self.cumulative_energy_wh;
        lbs * GRAMS_PER_POUND
    }
}

impl Default for EmissionsEstimator {
    fn default() -> Self {
        Self::new()
    }
}

/// Emissions source
///
/// Owns the only mutable accumulation state in the status line. It must be
/// created once and kept for the lifetime of the update loop.
pub struct EmissionsSource {
    metadata: SourceMetadata,
    estimator: EmissionsEstimator,
    factors: Arc<EmissionFactors>,
}

impl EmissionsSource {
    pub fn new() -> Self {
        Self::with_factors(EmissionFactors::bundled())
    }

    pub fn with_factors(factors: Arc<EmissionFactors>) -> Self {
        let metadata = SourceMetadata::new(
            "emissions",
            "Emissions",
            "Estimated grams of CO2 emitted by the energy drawn from the battery",
            true,
        );

        Self {
            metadata,
            estimator: EmissionsEstimator::new(),
            factors,
        }
    }

    pub fn estimator(&self) -> &EmissionsEstimator {
        &self.estimator
    }

    fn describe(&self, location: &GeoLocation) -> String {
        match self.factors.factor_for(location) {
            Some(factor) => format!("{:.5} grams of CO₂ emitted", self.estimator.grams_co2(factor)),
            None => {
                log::debug!(
                    "No emission factor for {} / {}",
                    location.country,
                    location.region
                );
                UNSUPPORTED_REGION_MESSAGE.to_string()
            }
        }
    }
}

impl Default for EmissionsSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricSource for EmissionsSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    async fn render(
        &mut self,
        telemetry: &TelemetrySnapshot,
        _precision: usize,
    ) -> Result<String, SourceError> {
        // A failed read leaves the state machine where it was
        let battery = telemetry.battery().await?;

        match self.estimator.record(&battery) {
            Sample::Priming => return Ok(ZERO_PLACEHOLDER.to_string()),
            Sample::FullCharge => return Ok(UNPLUG_MESSAGE.to_string()),
            Sample::Accumulated { increment_wh } => {
                log::trace!(
                    "Emissions: +{:.9} Wh, total {:.9} Wh",
                    increment_wh,
                    self.estimator.cumulative_energy_wh()
                );
            }
        }

        let location = telemetry.location().await?;
        Ok(self.describe(&location))
    }
}
