//! Errors a metric source can report for one cycle

use std::time::Duration;
use thiserror::Error;

/// Why a source produced no text this cycle
///
/// None of these abort the cycle. The aggregator logs them and treats the
/// source as absent until the next poll.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A telemetry or geolocation provider failed or returned unusable data
    #[error("telemetry unavailable: {0:#}")]
    TelemetryUnavailable(#[source] anyhow::Error),

    /// The source did not finish within the per-source budget
    #[error("render timed out after {0:?}")]
    TimedOut(Duration),
}

impl SourceError {
    pub fn telemetry(err: impl Into<anyhow::Error>) -> Self {
        SourceError::TelemetryUnavailable(err.into())
    }
}
