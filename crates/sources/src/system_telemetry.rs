//! Host telemetry backed by sysinfo and the battery crate
//!
//! One `sysinfo::System` is kept for the life of the provider: CPU usage is
//! computed from the difference between two refreshes, so a fresh `System`
//! per poll would always report zero. Sampling runs on the blocking pool
//! because both libraries read from procfs/sysfs synchronously.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use duke_status_core::TelemetryProvider;
use duke_status_types::{BatteryReading, CpuLoad};
use starship_battery::units::electric_potential::volt;
use starship_battery::units::energy::watt_hour;
use starship_battery::units::ratio::percent;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use sysinfo::{CpuRefreshKind, RefreshKind, System, MINIMUM_CPU_UPDATE_INTERVAL};

/// CPU and battery sampling for the local machine
pub struct SystemTelemetry {
    cpu: Arc<Mutex<CpuSampler>>,
}

/// The `System` plus the time of its last CPU refresh
struct CpuSampler {
    system: System,
    refreshed_at: Instant,
}

impl SystemTelemetry {
    pub fn new() -> Self {
        // Initialize system with CPU refresh configuration
        let system = System::new_with_specifics(
            RefreshKind::new().with_cpu(CpuRefreshKind::new().with_cpu_usage()),
        );
        log::info!("System telemetry initialized: {} CPUs", system.cpus().len());

        Self {
            cpu: Arc::new(Mutex::new(CpuSampler {
                system,
                refreshed_at: Instant::now(),
            })),
        }
    }
}

impl Default for SystemTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

/// How long to wait before a refresh yields a usable CPU delta
fn refresh_wait(since_last_refresh: Duration) -> Duration {
    MINIMUM_CPU_UPDATE_INTERVAL.saturating_sub(since_last_refresh)
}

fn sample_cpu(cpu: &Mutex<CpuSampler>) -> CpuLoad {
    // Use unwrap_or_else to recover from poisoned mutex - the System is still usable
    let mut cpu = cpu.lock().unwrap_or_else(|poisoned| {
        log::warn!("System telemetry mutex was poisoned, recovering");
        poisoned.into_inner()
    });

    // A refresh closer than the minimum interval reports a meaningless delta
    let wait = refresh_wait(cpu.refreshed_at.elapsed());
    if !wait.is_zero() {
        log::debug!("Waiting {:?} for the CPU usage interval", wait);
        std::thread::sleep(wait);
    }

    cpu.system.refresh_cpu_usage();
    cpu.refreshed_at = Instant::now();
    let usage = f64::from(cpu.system.global_cpu_usage()).clamp(0.0, 100.0);
    CpuLoad::new(100.0 - usage)
}

fn sample_battery() -> Result<BatteryReading> {
    let manager = starship_battery::Manager::new().context("battery manager unavailable")?;
    let battery = manager
        .batteries()
        .context("failed to enumerate batteries")?
        .next()
        .ok_or_else(|| anyhow!("no battery found"))?
        .context("failed to read battery")?;

    let capacity_mwh = f64::from(battery.energy().get::<watt_hour>()) * 1000.0;
    let voltage = f64::from(battery.voltage().get::<volt>());
    let charge = f64::from(battery.state_of_charge().get::<percent>())
        .round()
        .clamp(0.0, 100.0) as u8;

    if !capacity_mwh.is_finite() || !voltage.is_finite() {
        return Err(anyhow!(
            "battery reported unusable values (capacity {} mWh, voltage {} V)",
            capacity_mwh,
            voltage
        ));
    }

    Ok(BatteryReading::new(capacity_mwh, voltage, charge))
}

#[async_trait]
impl TelemetryProvider for SystemTelemetry {
    async fn current_load(&self) -> Result<CpuLoad> {
        let cpu = Arc::clone(&self.cpu);
        tokio::task::spawn_blocking(move || sample_cpu(&cpu))
            .await
            .context("CPU sampling task failed")
    }

    async fn battery(&self) -> Result<BatteryReading> {
        tokio::task::spawn_blocking(sample_battery)
            .await
            .context("battery sampling task failed")?
    }
}
