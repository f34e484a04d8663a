//! Location source: country code of the machine's public IP

use async_trait::async_trait;
use duke_status_core::{MetricSource, SourceError, SourceMetadata, TelemetrySnapshot};

/// Location source
///
/// Hidden unless `show.location` is set, since it needs a network lookup.
pub struct LocationSource {
    metadata: SourceMetadata,
}

impl LocationSource {
    pub fn new() -> Self {
        let metadata = SourceMetadata::new(
            "location",
            "Location",
            "Country of the machine's public IP address",
            false,
        );
        Self { metadata }
    }
}

impl Default for LocationSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricSource for LocationSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    async fn render(
        &mut self,
        telemetry: &TelemetrySnapshot,
        _precision: usize,
    ) -> Result<String, SourceError> {
        let location = telemetry.location().await?;
        let country = if location.country_code.is_empty() {
            &location.country
        } else {
            &location.country_code
        };
        Ok(format!("Location: {}", country))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duke_status_core::fixed::{FixedGeolocation, FixedTelemetry};
    use duke_status_types::GeoLocation;
    use std::sync::Arc;

    fn snapshot(location: GeoLocation) -> TelemetrySnapshot {
        TelemetrySnapshot::new(
            Arc::new(FixedTelemetry::default()),
            Arc::new(FixedGeolocation::new(location)),
        )
    }

    #[tokio::test]
    async fn test_country_code() {
        let mut source = LocationSource::new();
        let text = source
            .render(&snapshot(GeoLocation::new("United States", "US", "Oregon")), 2)
            .await
            .unwrap();
        assert_eq!(text, "Location: US");
    }

    #[tokio::test]
    async fn test_falls_back_to_country_name() {
        let mut source = LocationSource::new();
        let text = source
            .render(&snapshot(GeoLocation::new("Germany", "", "Bavaria")), 2)
            .await
            .unwrap();
        assert_eq!(text, "Location: Germany");
    }

    #[test]
    fn test_hidden_by_default() {
        assert!(!LocationSource::new().metadata().shown_by_default);
    }
}
