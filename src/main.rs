use anyhow::Result;
use clap::Parser;
use duke_status::{SettingsFile, TerminalWidget, Toolbar};
use duke_status_core::{ConfigProvider, GeolocationProvider, TelemetryProvider};
use duke_status_sources::{
    default_registry, CachedGeolocation, HttpGeolocation, SystemTelemetry, DEFAULT_CACHE_TTL,
    DEFAULT_HTTP_TIMEOUT,
};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// duke-status - CPU, battery and estimated CO2 emissions on one stable-width line
#[derive(Parser, Debug, Clone)]
#[command(name = "duke-status")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,

    /// Settings file to read (defaults to settings.json in the user config directory)
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run a single cycle, print the line and exit
    #[arg(long = "once")]
    once: bool,

    /// Write a settings file with every default filled in, then exit
    #[arg(long = "init-config")]
    init_config: bool,

    /// List the available sources and whether they are shown by default
    #[arg(short = 'l', long = "list-sources")]
    list_sources: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Level 0 (default): warn only, so log output does not fight the status line
    // Level 1: info
    // Level 2: debug
    // Level 3+: trace
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    info!("Starting duke-status v{}", env!("CARGO_PKG_VERSION"));

    let registry = default_registry();

    if cli.list_sources {
        for source in registry.list_sources() {
            let shown = if source.shown_by_default { "shown" } else { "hidden" };
            println!("  {:<10} {:<18} ({} by default)", source.key, source.name, shown);
        }
        return Ok(());
    }

    let settings = match cli.config {
        Some(path) => SettingsFile::new(path),
        None => SettingsFile::default_location()?,
    };

    if cli.init_config {
        if settings.save_defaults(&registry.list_sources())? {
            println!("Wrote {}", settings.path().display());
        } else {
            println!("{} already exists", settings.path().display());
        }
        return Ok(());
    }

    let config: Arc<dyn ConfigProvider> = Arc::new(settings);
    let alignment = config
        .snapshot()
        .map(|snapshot| snapshot.alignment())
        .unwrap_or_default();
    let telemetry: Arc<dyn TelemetryProvider> = Arc::new(SystemTelemetry::new());
    let geolocation: Arc<dyn GeolocationProvider> = Arc::new(CachedGeolocation::new(
        HttpGeolocation::new(DEFAULT_HTTP_TIMEOUT)?,
        DEFAULT_CACHE_TTL,
    ));

    let mut toolbar = Toolbar::new(
        config,
        telemetry,
        geolocation,
        Box::new(TerminalWidget::stdout(alignment)),
        registry.create_all(),
    );

    if cli.once {
        toolbar.show()?;
        toolbar.update().await?;
        return toolbar.dispose();
    }

    let cancel = CancellationToken::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupted, finishing current cycle");
                cancel_on_signal.cancel();
            }
            Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
        }
    });

    toolbar.run(cancel).await;
    toolbar.dispose()
}
