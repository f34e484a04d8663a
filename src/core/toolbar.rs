//! Update loop that polls every source and publishes the status line

use anyhow::Result;
use duke_status_core::{
    BoxedMetricSource, ConfigProvider, ConfigSnapshot, GeolocationProvider, SourceSlot,
    StatusWidget, TelemetryProvider, TelemetrySnapshot, DELIMITER,
};
use futures::future::join_all;
use log::{debug, error, info, trace, warn};
use std::sync::Arc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Owns the sources and the widget, and runs one cycle at a time
///
/// A cycle re-reads the configuration, restyles the widget, renders every
/// source concurrently, joins the results in registration order and
/// publishes the line. The next cycle starts `updatefrequencyms` after the
/// previous publish, so cycles never overlap.
pub struct Toolbar {
    config: Arc<dyn ConfigProvider>,
    telemetry: Arc<dyn TelemetryProvider>,
    geolocation: Arc<dyn GeolocationProvider>,
    widget: Box<dyn StatusWidget>,
    sources: Vec<SourceSlot>,
    /// Last snapshot that was read successfully
    snapshot: ConfigSnapshot,
}

impl Toolbar {
    pub fn new(
        config: Arc<dyn ConfigProvider>,
        telemetry: Arc<dyn TelemetryProvider>,
        geolocation: Arc<dyn GeolocationProvider>,
        widget: Box<dyn StatusWidget>,
        sources: Vec<BoxedMetricSource>,
    ) -> Self {
        Self {
            config,
            telemetry,
            geolocation,
            widget,
            sources: sources.into_iter().map(SourceSlot::new).collect(),
            snapshot: ConfigSnapshot::default(),
        }
    }

    /// Configuration in effect for the current cycle
    pub fn config(&self) -> &ConfigSnapshot {
        &self.snapshot
    }

    pub fn sources(&self) -> &[SourceSlot] {
        &self.sources
    }

    /// Re-read the configuration, keeping the previous snapshot if the read fails
    pub fn refresh_config(&mut self) {
        match self.config.snapshot() {
            Ok(snapshot) => self.snapshot = snapshot,
            Err(e) => warn!("Failed to read configuration, keeping previous settings: {:#}", e),
        }
    }

    /// Bring the widget's colour and alignment in line with the configuration
    fn reconcile_presentation(&mut self) {
        let alignment = self.snapshot.alignment();
        if alignment != self.widget.alignment() {
            debug!("Status line alignment changed to {:?}", alignment);
            self.widget.set_alignment(alignment);
        }
        self.widget.set_color(&self.snapshot.color());
    }

    /// Apply the configuration and make the widget visible
    pub fn show(&mut self) -> Result<()> {
        self.refresh_config();
        self.reconcile_presentation();
        self.widget.show()
    }

    /// Render every source for one cycle and join the results
    ///
    /// Renders run concurrently; the line is only assembled once all of them
    /// have finished, failed or timed out. Absent sources leave no delimiter.
    pub async fn collect(&mut self) -> String {
        let config = &self.snapshot;
        let timeout = config.source_timeout();
        let telemetry = TelemetrySnapshot::new(
            Arc::clone(&self.telemetry),
            Arc::clone(&self.geolocation),
        );

        let pending = self
            .sources
            .iter_mut()
            .map(|slot| slot.get_resource_display(config, &telemetry, timeout));
        let finished = join_all(pending).await;

        finished
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(DELIMITER)
    }

    /// Run one full cycle and publish the result
    pub async fn update(&mut self) -> Result<String> {
        self.refresh_config();
        self.reconcile_presentation();

        let text = self.collect().await;
        self.widget.set_text(&text)?;
        Ok(text)
    }

    /// Run cycles until `cancel` fires
    ///
    /// Cancellation is only observed between cycles: a cycle that has started
    /// always finishes and publishes.
    pub async fn run(&mut self, cancel: CancellationToken) {
        if let Err(e) = self.show() {
            error!("Failed to show status line: {:#}", e);
        }

        info!("Starting update loop with {} sources", self.sources.len());
        while !cancel.is_cancelled() {
            let start = Instant::now();
            if let Err(e) = self.update().await {
                error!("Error publishing status line: {:#}", e);
            }
            trace!("Update cycle took {:?}", start.elapsed());

            let interval = self.snapshot.update_interval();
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }
        info!("Update loop stopped");
    }

    /// Stop drawing and release the widget
    pub fn dispose(&mut self) -> Result<()> {
        self.widget.dispose()
    }
}
