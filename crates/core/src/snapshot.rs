//! Per-cycle telemetry snapshot
//!
//! Every source in a cycle reads from the same snapshot. Each provider call is
//! made at most once per cycle, on first demand, so three sources that all
//! need the battery share one reading and a cycle where nobody needs the
//! location never touches the network.

use crate::error::SourceError;
use crate::providers::{GeolocationProvider, TelemetryProvider};
use duke_status_types::{BatteryReading, CpuLoad, GeoLocation};
use std::sync::Arc;
use tokio::sync::OnceCell;

pub struct TelemetrySnapshot {
    telemetry: Arc<dyn TelemetryProvider>,
    geolocation: Arc<dyn GeolocationProvider>,
    load: OnceCell<CpuLoad>,
    battery: OnceCell<BatteryReading>,
    location: OnceCell<GeoLocation>,
}

impl TelemetrySnapshot {
    pub fn new(
        telemetry: Arc<dyn TelemetryProvider>,
        geolocation: Arc<dyn GeolocationProvider>,
    ) -> Self {
        Self {
            telemetry,
            geolocation,
            load: OnceCell::new(),
            battery: OnceCell::new(),
            location: OnceCell::new(),
        }
    }

    pub async fn cpu_load(&self) -> Result<CpuLoad, SourceError> {
        self.load
            .get_or_try_init(|| self.telemetry.current_load())
            .await
            .copied()
            .map_err(SourceError::TelemetryUnavailable)
    }

    pub async fn battery(&self) -> Result<BatteryReading, SourceError> {
        self.battery
            .get_or_try_init(|| self.telemetry.battery())
            .await
            .copied()
            .map_err(SourceError::TelemetryUnavailable)
    }

    pub async fn location(&self) -> Result<GeoLocation, SourceError> {
        self.location
            .get_or_try_init(|| self.geolocation.locate())
            .await
            .cloned()
            .map_err(SourceError::TelemetryUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::{FixedGeolocation, FixedTelemetry};

    #[tokio::test]
    async fn test_provider_called_once_per_snapshot() {
        let telemetry = Arc::new(FixedTelemetry::new(
            Some(CpuLoad::new(40.0)),
            Some(BatteryReading::new(5000.0, 12.0, 80)),
        ));
        let snapshot = TelemetrySnapshot::new(telemetry.clone(), Arc::new(FixedGeolocation::none()));

        snapshot.battery().await.unwrap();
        snapshot.battery().await.unwrap();
        snapshot.cpu_load().await.unwrap();

        assert_eq!(telemetry.battery_calls(), 1);
        assert_eq!(telemetry.load_calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_is_reported_as_telemetry_unavailable() {
        let snapshot = TelemetrySnapshot::new(
            Arc::new(FixedTelemetry::new(None, None)),
            Arc::new(FixedGeolocation::none()),
        );

        assert!(matches!(
            snapshot.battery().await,
            Err(SourceError::TelemetryUnavailable(_))
        ));
        assert!(matches!(
            snapshot.location().await,
            Err(SourceError::TelemetryUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_fresh_snapshot_sees_new_readings() {
        let telemetry = Arc::new(FixedTelemetry::new(
            None,
            Some(BatteryReading::new(5000.0, 12.0, 80)),
        ));
        let geo: Arc<FixedGeolocation> = Arc::new(FixedGeolocation::none());

        let first = TelemetrySnapshot::new(telemetry.clone(), geo.clone());
        assert_eq!(first.battery().await.unwrap().current_capacity, 5000.0);

        telemetry.set_battery(Some(BatteryReading::new(4900.0, 12.0, 79)));
        let second = TelemetrySnapshot::new(telemetry.clone(), geo);
        assert_eq!(second.battery().await.unwrap().current_capacity, 4900.0);
        // The earlier snapshot keeps what it saw
        assert_eq!(first.battery().await.unwrap().current_capacity, 5000.0);
    }
}
