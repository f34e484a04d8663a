//! duke-status-sources: Metric sources and telemetry providers for duke-status.

mod battery;
mod cpu;
mod emission_factors;
mod emissions;
mod geolocation;
mod location;
mod system_telemetry;

pub use battery::{CurrentCapacitySource, VoltageSource};
pub use cpu::CpuUsageSource;
pub use emission_factors::EmissionFactors;
pub use emissions::{
    energy_increment_wh, EmissionsEstimator, EmissionsSource, Sample, UNPLUG_MESSAGE,
    UNSUPPORTED_REGION_MESSAGE, ZERO_PLACEHOLDER,
};
pub use geolocation::{CachedGeolocation, HttpGeolocation, DEFAULT_CACHE_TTL, DEFAULT_HTTP_TIMEOUT};
pub use location::LocationSource;
pub use system_telemetry::SystemTelemetry;

use duke_status_core::Registry;

/// Register all built-in sources; registration order is display order
pub fn register_all(registry: &mut Registry) {
    registry.register_source(|| Box::new(CpuUsageSource::new()));
    registry.register_source(|| Box::new(VoltageSource::new()));
    registry.register_source(|| Box::new(CurrentCapacitySource::new()));
    registry.register_source(|| Box::new(LocationSource::new()));
    registry.register_source(|| Box::new(EmissionsSource::new()));
}

/// A registry holding every built-in source
pub fn default_registry() -> Registry {
    let mut registry = Registry::new();
    register_all(&mut registry);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order_and_defaults() {
        let sources = default_registry().list_sources();
        let summary: Vec<_> = sources
            .iter()
            .map(|s| (s.key.as_str(), s.shown_by_default))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("cpuusage", true),
                ("voltage", true),
                ("curcap", true),
                ("location", false),
                ("emissions", true),
            ]
        );
    }
}
