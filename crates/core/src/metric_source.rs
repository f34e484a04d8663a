//! Metric source trait and the padding wrapper the aggregator drives

use crate::config::ConfigSnapshot;
use crate::constants::{keys, PAD_CHAR};
use crate::error::SourceError;
use crate::snapshot::TelemetrySnapshot;
use async_trait::async_trait;
use log::{debug, warn};
use std::time::Duration;

/// Metadata about a metric source
#[derive(Debug, Clone)]
pub struct SourceMetadata {
    /// Configuration key; the source is toggled by `show.<key>`
    pub key: String,
    /// Human-readable name
    pub name: String,
    /// Description of what this source displays
    pub description: String,
    /// Whether the source is shown when `show.<key>` is not set
    pub shown_by_default: bool,
}

impl SourceMetadata {
    pub fn new(key: &str, name: &str, description: &str, shown_by_default: bool) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            shown_by_default,
        }
    }

    /// The `show.<key>` setting controlling this source
    pub fn show_key(&self) -> String {
        format!("{}.{}", keys::SHOW_PREFIX, self.key)
    }
}

/// Trait for everything that contributes a piece of the status line
///
/// A source turns one telemetry snapshot into one display string. It may keep
/// state between calls; the aggregator holds each source for its whole
/// lifetime and never runs two renders of the same source at once.
#[async_trait]
pub trait MetricSource: Send {
    /// Get metadata about this source
    fn metadata(&self) -> &SourceMetadata;

    /// Produce the display text for this cycle
    async fn render(
        &mut self,
        telemetry: &TelemetrySnapshot,
        precision: usize,
    ) -> Result<String, SourceError>;

    /// Whether the source should contribute this cycle
    fn is_enabled(&self, config: &ConfigSnapshot) -> bool {
        let metadata = self.metadata();
        config.get_bool(&metadata.show_key(), metadata.shown_by_default)
    }

    /// Decimal places for numeric output
    fn precision(&self, config: &ConfigSnapshot) -> usize {
        config.precision()
    }
}

/// Type-erased metric source for dynamic dispatch
pub type BoxedMetricSource = Box<dyn MetricSource>;

/// Pad `text` on the right with [`PAD_CHAR`] up to `width` characters
pub fn pad_to_width(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let mut padded = String::with_capacity(text.len() + width.saturating_sub(len) * PAD_CHAR.len_utf8());
    padded.push_str(text);
    padded.extend(std::iter::repeat(PAD_CHAR).take(width.saturating_sub(len)));
    padded
}

/// A registered source plus the widest display it has produced so far
///
/// Padding every display to that width keeps the status line from jittering
/// as readings gain or lose digits. The width only ever grows.
pub struct SourceSlot {
    source: BoxedMetricSource,
    max_width: usize,
}

impl SourceSlot {
    pub fn new(source: BoxedMetricSource) -> Self {
        Self {
            source,
            max_width: 0,
        }
    }

    pub fn metadata(&self) -> &SourceMetadata {
        self.source.metadata()
    }

    pub fn max_width(&self) -> usize {
        self.max_width
    }

    /// Render the source for this cycle, or `None` if it is disabled or failed
    ///
    /// Disabled and failed sources leave the width untouched.
    pub async fn get_resource_display(
        &mut self,
        config: &ConfigSnapshot,
        telemetry: &TelemetrySnapshot,
        timeout: Option<Duration>,
    ) -> Option<String> {
        if !self.source.is_enabled(config) {
            return None;
        }

        let precision = self.source.precision(config);
        let rendered = match timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, self.source.render(telemetry, precision)).await {
                    Ok(result) => result,
                    Err(_) => Err(SourceError::TimedOut(limit)),
                }
            }
            None => self.source.render(telemetry, precision).await,
        };

        match rendered {
            Ok(text) => {
                self.max_width = self.max_width.max(text.chars().count());
                Some(pad_to_width(&text, self.max_width))
            }
            Err(e @ SourceError::TimedOut(_)) => {
                debug!("Source {} skipped this cycle: {}", self.source.metadata().key, e);
                None
            }
            Err(e) => {
                warn!("Source {} skipped this cycle: {}", self.source.metadata().key, e);
                None
            }
        }
    }
}
