//! Providers that replay readings set in code
//!
//! Used by tests across the workspace and handy for driving the status line
//! without real hardware. A `None` reading makes the corresponding call fail.

use crate::providers::{GeolocationProvider, TelemetryProvider};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use duke_status_types::{BatteryReading, CpuLoad, GeoLocation};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        log::warn!("Fixed provider mutex was poisoned, recovering");
        poisoned.into_inner()
    })
}

#[derive(Debug, Default)]
pub struct FixedTelemetry {
    load: Mutex<Option<CpuLoad>>,
    battery: Mutex<Option<BatteryReading>>,
    load_calls: AtomicUsize,
    battery_calls: AtomicUsize,
}

impl FixedTelemetry {
    pub fn new(load: Option<CpuLoad>, battery: Option<BatteryReading>) -> Self {
        Self {
            load: Mutex::new(load),
            battery: Mutex::new(battery),
            ..Default::default()
        }
    }

    pub fn set_load(&self, load: Option<CpuLoad>) {
        *lock(&self.load) = load;
    }

    pub fn set_battery(&self, battery: Option<BatteryReading>) {
        *lock(&self.battery) = battery;
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }

    pub fn battery_calls(&self) -> usize {
        self.battery_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TelemetryProvider for FixedTelemetry {
    async fn current_load(&self) -> Result<CpuLoad> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        (*lock(&self.load)).ok_or_else(|| anyhow!("no CPU load reading"))
    }

    async fn battery(&self) -> Result<BatteryReading> {
        self.battery_calls.fetch_add(1, Ordering::SeqCst);
        (*lock(&self.battery)).ok_or_else(|| anyhow!("no battery reading"))
    }
}

#[derive(Debug, Default)]
pub struct FixedGeolocation {
    location: Mutex<Option<GeoLocation>>,
    lookups: AtomicUsize,
}

impl FixedGeolocation {
    pub fn new(location: GeoLocation) -> Self {
        Self {
            location: Mutex::new(Some(location)),
            lookups: AtomicUsize::new(0),
        }
    }

    /// A provider whose lookups always fail
    pub fn none() -> Self {
        Self::default()
    }

    pub fn set_location(&self, location: Option<GeoLocation>) {
        *lock(&self.location) = location;
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeolocationProvider for FixedGeolocation {
    async fn resolve_public_ip(&self) -> Result<IpAddr> {
        Ok(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
    }

    async fn lookup(&self, _ip: IpAddr) -> Result<GeoLocation> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        lock(&self.location)
            .clone()
            .ok_or_else(|| anyhow!("no location configured"))
    }
}
