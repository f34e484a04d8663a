//! Collaborator interfaces consumed by the update cycle
//!
//! Concrete implementations live in `duke-status-sources` (host telemetry,
//! HTTP geolocation) and in the binary crate (terminal widget). The core only
//! talks to these traits.

use anyhow::Result;
use async_trait::async_trait;
use duke_status_types::{Alignment, BatteryReading, CpuLoad, GeoLocation, HexColor};
use std::net::IpAddr;

/// Host CPU and battery sampling
#[async_trait]
pub trait TelemetryProvider: Send + Sync {
    async fn current_load(&self) -> Result<CpuLoad>;

    async fn battery(&self) -> Result<BatteryReading>;
}

/// Public-IP based location lookup
///
/// Both calls go over the network and may be slow or fail.
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn resolve_public_ip(&self) -> Result<IpAddr>;

    async fn lookup(&self, ip: IpAddr) -> Result<GeoLocation>;

    /// Resolve the public IP and look it up
    async fn locate(&self) -> Result<GeoLocation> {
        let ip = self.resolve_public_ip().await?;
        self.lookup(ip).await
    }
}

/// Where the composite status line is published
pub trait StatusWidget: Send {
    fn set_text(&mut self, text: &str) -> Result<()>;

    fn set_color(&mut self, color: &HexColor);

    fn set_alignment(&mut self, alignment: Alignment);

    fn alignment(&self) -> Alignment;

    fn show(&mut self) -> Result<()>;

    fn dispose(&mut self) -> Result<()>;
}
