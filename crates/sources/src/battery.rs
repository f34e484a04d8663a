//! Raw battery readings: voltage and remaining capacity

use async_trait::async_trait;
use duke_status_core::{MetricSource, SourceError, SourceMetadata, TelemetrySnapshot};

/// Battery voltage source
pub struct VoltageSource {
    metadata: SourceMetadata,
}

impl VoltageSource {
    pub fn new() -> Self {
        let metadata = SourceMetadata::new("voltage", "Voltage", "Battery voltage in volts", true);
        Self { metadata }
    }
}

impl Default for VoltageSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricSource for VoltageSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    async fn render(
        &mut self,
        telemetry: &TelemetrySnapshot,
        precision: usize,
    ) -> Result<String, SourceError> {
        let battery = telemetry.battery().await?;
        Ok(format!("Voltage: {:.*}", precision, battery.voltage))
    }
}

/// Remaining battery capacity source
pub struct CurrentCapacitySource {
    metadata: SourceMetadata,
}

impl CurrentCapacitySource {
    pub fn new() -> Self {
        let metadata = SourceMetadata::new(
            "curcap",
            "Current Capacity",
            "Remaining battery energy in mWh",
            true,
        );
        Self { metadata }
    }
}

impl Default for CurrentCapacitySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricSource for CurrentCapacitySource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    async fn render(
        &mut self,
        telemetry: &TelemetrySnapshot,
        precision: usize,
    ) -> Result<String, SourceError> {
        let battery = telemetry.battery().await?;
        Ok(format!("Current Capacity: {:.*}", precision, battery.current_capacity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duke_status_core::fixed::{FixedGeolocation, FixedTelemetry};
    use duke_status_types::BatteryReading;
    use std::sync::Arc;

    fn snapshot(battery: Option<BatteryReading>) -> TelemetrySnapshot {
        TelemetrySnapshot::new(
            Arc::new(FixedTelemetry::new(None, battery)),
            Arc::new(FixedGeolocation::none()),
        )
    }

    #[tokio::test]
    async fn test_voltage_rounding() {
        let snapshot = snapshot(Some(BatteryReading::new(4900.0, 12.3456, 80)));
        let mut source = VoltageSource::new();
        assert_eq!(source.render(&snapshot, 2).await.unwrap(), "Voltage: 12.35");
    }

    #[tokio::test]
    async fn test_capacity_rounding() {
        let snapshot = snapshot(Some(BatteryReading::new(4900.0, 12.0, 80)));
        let mut source = CurrentCapacitySource::new();
        assert_eq!(source.render(&snapshot, 1).await.unwrap(), "Current Capacity: 4900.0");
    }

    #[tokio::test]
    async fn test_no_battery() {
        let snapshot = snapshot(None);
        assert!(VoltageSource::new().render(&snapshot, 2).await.is_err());
        assert!(CurrentCapacitySource::new().render(&snapshot, 2).await.is_err());
    }
}
