//! duke-status-types: Shared data types for the duke-status telemetry line.
//!
//! This crate contains plain data (telemetry readings, presentation settings)
//! shared by every duke-status crate. It has no runtime or I/O dependencies,
//! which keeps it usable from tests and fake providers.

pub mod color;
pub mod presentation;
pub mod telemetry;

// Re-export commonly used types at the crate root for convenience
pub use color::{HexColor, DEFAULT_COLOR};
pub use presentation::Alignment;
pub use telemetry::{BatteryReading, CpuLoad, GeoLocation};
