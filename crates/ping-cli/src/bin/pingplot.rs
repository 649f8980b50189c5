//! pingplot — render pingwatch logs as uptime charts.
//!
//! By default only the latest log is plotted. Each log becomes one
//! `<name>.html` page with an inline SVG timeline.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::warn;

use ping_core::config::default_log_directory;
use ping_log::{latest_log_file, list_log_files, load_log};
use ping_report::{LogSummary, PlotMode, RenderOptions, render_log};

#[derive(Parser)]
#[command(name = "pingplot", about = "Plot some pingwatch logs", version)]
struct Cli {
    /// Directory containing logs (default: `logs` beside the executable).
    #[arg(short, long, value_name = "PATH")]
    log_directory: Option<PathBuf>,

    /// Plot all logs. Default is to just plot the latest.
    #[arg(short, long)]
    all: bool,

    /// Any-down filter over +/- N samples. 0 plots the raw series.
    #[arg(short, long, default_value_t = 0)]
    filter: usize,

    /// What to plot: uptime or codes.
    #[arg(short, long, default_value = "uptime")]
    mode: PlotMode,

    /// Where to write charts (default: the log directory).
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Summary format: text or json.
    #[arg(long, default_value = "text")]
    format: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let summaries = plot(&cli)?;

    if cli.format == "json" {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    }
    Ok(())
}

fn plot(cli: &Cli) -> anyhow::Result<Vec<LogSummary>> {
    let log_dir = cli.log_directory.clone().unwrap_or_else(default_log_directory);
    let text = cli.format != "json";

    let files = select_files(&log_dir, cli.all)?;
    if text {
        if cli.all {
            println!("Plotting {} log files in {}", files.len(), log_dir.display());
        } else {
            println!("Plotting latest file in {}", log_dir.display());
        }
    }

    let options = RenderOptions {
        mode: cli.mode,
        filter_window: cli.filter,
        output_dir: cli.output.clone().unwrap_or_else(|| log_dir.clone()),
    };

    let mut summaries = Vec::new();
    for path in &files {
        let log = match load_log(path) {
            Ok(log) => log,
            Err(error) => {
                warn!(path = ?path, %error, "skipping unreadable log");
                if text {
                    println!("Skipping unreadable file {}", path.display());
                }
                continue;
            }
        };
        match render_log(&log, &options)
            .with_context(|| format!("failed to render {}", path.display()))?
        {
            Some(rendered) => {
                if text {
                    let s = &rendered.summary;
                    println!(
                        "  {}: {} samples, {:.1}% up -> {}",
                        s.day,
                        s.samples,
                        s.uptime_pct,
                        rendered.output.display()
                    );
                }
                summaries.push(rendered.summary);
            }
            None => {
                if text {
                    println!("Skipping empty file {}", path.display());
                }
            }
        }
    }
    Ok(summaries)
}

fn select_files(log_dir: &Path, all: bool) -> anyhow::Result<Vec<PathBuf>> {
    let files = if all {
        list_log_files(log_dir)?
    } else {
        latest_log_file(log_dir)?.into_iter().collect()
    };
    Ok(files)
}
