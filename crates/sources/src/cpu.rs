//! CPU usage source

use async_trait::async_trait;
use duke_status_core::{MetricSource, SourceError, SourceMetadata, TelemetrySnapshot};

/// CPU usage source
///
/// Displays overall busy time, `100 - idle`, at the configured precision.
pub struct CpuUsageSource {
    metadata: SourceMetadata,
}

impl CpuUsageSource {
    pub fn new() -> Self {
        let metadata = SourceMetadata::new(
            "cpuusage",
            "CPU Usage",
            "Overall CPU usage percentage",
            true,
        );
        Self { metadata }
    }
}

impl Default for CpuUsageSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricSource for CpuUsageSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    async fn render(
        &mut self,
        telemetry: &TelemetrySnapshot,
        precision: usize,
    ) -> Result<String, SourceError> {
        let load = telemetry.cpu_load().await?;
        Ok(format!("CPU {:.*}%", precision, load.usage_percent()))
    }
}
