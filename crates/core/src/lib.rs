//! duke-status-core: Core traits and registry for the duke-status line.
//!
//! This crate contains the `MetricSource` trait and its padding wrapper, the
//! per-cycle configuration and telemetry snapshots, the collaborator traits
//! the update cycle talks to, and the source registry.

pub mod config;
pub mod constants;
mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod fixed;
mod metric_source;
mod providers;
mod registry;
mod snapshot;

pub use config::{ConfigProvider, ConfigSnapshot, StaticConfig};
pub use constants::{
    DEFAULT_PRECISION, DEFAULT_SOURCE_TIMEOUT, DEFAULT_UPDATE_INTERVAL, DELIMITER, MAX_PRECISION,
    MIN_UPDATE_INTERVAL, PAD_CHAR,
};
pub use error::SourceError;
pub use metric_source::{pad_to_width, BoxedMetricSource, MetricSource, SourceMetadata, SourceSlot};
pub use providers::{GeolocationProvider, StatusWidget, TelemetryProvider};
pub use registry::{Registry, SourceFactory, SourceInfo};
pub use snapshot::TelemetrySnapshot;

// Re-export types used in trait signatures for convenience
pub use duke_status_types::{Alignment, BatteryReading, CpuLoad, GeoLocation, HexColor};
