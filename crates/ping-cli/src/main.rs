//! pingwatch — periodically probe a site and log its status code.
//!
//! Each interval the monitor checks a reliable baseline URL; only if that
//! answers 200 does it probe the target and append
//! `<epoch>, <code>, <label>` to the log directory. Runs until SIGTERM,
//! SIGHUP or SIGINT.
//!
//! # Usage
//!
//! ```text
//! pingwatch https://gitlab.example.com --interval 5 --log-directory /var/log/pingwatch
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use ping_core::{ConfigError, FileConfig, MonitorConfig, Rotation, epoch_secs_f64};
use ping_monitor::{CycleController, Scheduler, ShutdownToken, spawn_signal_listener};
use ping_probe::Prober;

#[derive(Parser)]
#[command(
    name = "pingwatch",
    about = "Periodically log the status code of a given website",
    version
)]
struct Cli {
    /// URL of the website to monitor.
    url: Option<String>,

    /// A "reliable" website used to tell local internet problems apart.
    #[arg(short, long, value_name = "URL")]
    baseline: Option<String>,

    /// Directory to place logs in (default: `logs` beside the executable).
    #[arg(short, long, value_name = "PATH")]
    log_directory: Option<PathBuf>,

    /// Seconds between polls.
    #[arg(short, long, value_name = "SECONDS")]
    interval: Option<f64>,

    /// Log file rotation: daily or per-run.
    #[arg(long)]
    rotation: Option<Rotation>,

    /// Connect directly, ignoring HTTP_PROXY/HTTPS_PROXY.
    #[arg(long)]
    no_proxy: bool,

    /// TOML file with the same settings; flags override it.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Emit structured JSON logs instead of text.
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// Layer flags over the config file (if any) and validate.
    fn resolve(&self) -> Result<MonitorConfig, ConfigError> {
        let mut file = match &self.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        if let Some(url) = &self.url {
            file.target = Some(url.clone());
        }
        if let Some(baseline) = &self.baseline {
            file.baseline = Some(baseline.clone());
        }
        if let Some(dir) = &self.log_directory {
            file.log_directory = Some(dir.clone());
        }
        if let Some(interval) = self.interval {
            file.interval = Some(interval);
        }
        if let Some(rotation) = self.rotation {
            file.rotation = Some(rotation);
        }
        if self.no_proxy {
            file.proxy = Some(false);
        }
        MonitorConfig::resolve(file)
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json);

    let config = Arc::new(cli.resolve().context("invalid configuration")?);
    let prober = Prober::for_config(&config)?;
    let controller = CycleController::new(Arc::clone(&config), prober);
    controller
        .writer()
        .ensure_directory()
        .context("cannot prepare log directory")?;

    info!(
        started = %chrono::Local::now().to_rfc3339(),
        epoch = epoch_secs_f64(),
        target = %config.target_url,
        baseline = %config.baseline_url,
        proxy = config.proxy,
        log_directory = %config.log_directory.display(),
        "starting to ping"
    );

    // ── Shutdown signal ────────────────────────────────────────
    let shutdown = ShutdownToken::new();
    let signals =
        spawn_signal_listener(shutdown.clone()).context("failed to install signal handlers")?;

    let stats = Scheduler::new(controller, shutdown).run().await;
    signals.abort();

    info!(
        cycles = stats.cycles,
        records = stats.records,
        "pingwatch stopped"
    );
    Ok(())
}
