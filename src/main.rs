//! Typing Rhythm CLI
//!
//! Records keystroke timing to daily logs and generates typing statistics.

use anyhow::{bail, Context};
use chrono::{Duration as ChronoDuration, Utc};
use clap::{Parser, Subcommand};
use crossbeam_channel::RecvTimeoutError;
use std::io::Read;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use typing_rhythm::{
    collector::{LineCollector, Stamper},
    config::Config,
    core::ReportBuilder,
    storage::{self, DailyLogWriter},
    transparency::{create_shared_log_with_persistence, read_persisted},
    DATA_DECLARATION, VERSION,
};

#[derive(Parser)]
#[command(name = "typing-rhythm")]
#[command(version = VERSION)]
#[command(about = "Keystroke timing recorder and typing statistics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record key presses (one key name per line) to the daily log
    Record {
        /// Read key names from this file or FIFO instead of stdin
        #[arg(long, short)]
        input: Option<PathBuf>,
    },

    /// Generate the typing statistics report
    Report {
        /// Output file for the report JSON
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Typing speed window in minutes
        #[arg(long)]
        window_minutes: Option<u64>,

        /// Gap below which keystrokes form a burst, in milliseconds
        #[arg(long)]
        burst_threshold_ms: Option<f64>,
    },

    /// Show current collection status
    Status,

    /// Display data declaration
    Privacy,

    /// Show configuration
    Config {
        /// Write the current settings to the config file
        #[arg(long)]
        save: bool,
    },
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Record { input } => cmd_record(input),
        Commands::Report {
            output,
            window_minutes,
            burst_threshold_ms,
        } => cmd_report(output, window_minutes, burst_threshold_ms),
        Commands::Status => cmd_status(),
        Commands::Privacy => {
            println!("{DATA_DECLARATION}");
            Ok(())
        }
        Commands::Config { save } => cmd_config(save),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// Log to stderr so stdout stays free for command output.
fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("typing_rhythm=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_record(input: Option<PathBuf>) -> anyhow::Result<()> {
    println!("Typing Rhythm v{VERSION}");
    println!();

    let config = Config::load().context("loading configuration")?;
    config
        .ensure_directories()
        .context("creating data directories")?;

    let source: Box<dyn Read + Send> = match &input {
        Some(path) => Box::new(
            std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?,
        ),
        None => Box::new(std::io::stdin()),
    };

    println!("Starting recorder...");
    println!("  Log directory: {}", config.raw_dir().display());
    println!("  Batch size: {}", config.batch_size);
    println!("  Flush interval: {}s", config.flush_interval.as_secs());
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let recorder_log = create_shared_log_with_persistence(config.recorder_stats_path());
    let mut writer = DailyLogWriter::new(config.raw_dir())
        .with_batch_size(config.batch_size)
        .with_flush_interval(config.flush_interval);
    let mut stamper = Stamper::new();

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("setting Ctrl+C handler")?;

    let mut collector = LineCollector::new(source);
    collector.start()?;
    let receiver = collector.receiver().clone();

    while running.load(Ordering::SeqCst) {
        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(press) => {
                let event = stamper.stamp(&press);
                recorder_log.record_keystroke(event.is_deletion);

                match writer.push(event) {
                    Ok(0) => {}
                    Ok(_) => recorder_log.record_batch_flushed(),
                    Err(e) => tracing::warn!("Flush failed, keeping buffer for retry: {e}"),
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                if writer.should_flush() {
                    match writer.flush() {
                        Ok(_) => recorder_log.record_batch_flushed(),
                        Err(e) => tracing::warn!("Periodic flush failed: {e}"),
                    }
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                tracing::info!("Input closed");
                break;
            }
        }
    }

    println!();
    println!("Stopping recorder...");
    collector.stop();

    // Flush remaining keystrokes
    if writer.pending() > 0 {
        writer.flush().context("flushing remaining keystrokes")?;
        recorder_log.record_batch_flushed();
    }
    if let Some(path) = writer.current_path() {
        println!("Keystrokes saved to {}", path.display());
    }

    if let Err(e) = recorder_log.save() {
        tracing::warn!("Could not save recorder stats: {e}");
    }

    println!();
    println!("{}", recorder_log.summary());
    Ok(())
}

fn cmd_report(
    output: Option<PathBuf>,
    window_minutes: Option<u64>,
    burst_threshold_ms: Option<f64>,
) -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;
    let output = output.unwrap_or_else(|| config.report_path.clone());

    let window_secs = match window_minutes {
        Some(minutes) => minutes.checked_mul(60),
        None => Some(config.rate_window.as_secs()),
    };
    let rate_window = window_secs
        .and_then(|secs| i64::try_from(secs).ok())
        .and_then(ChronoDuration::try_seconds)
        .context("typing speed window is too large")?;
    let threshold_ms = burst_threshold_ms.unwrap_or(config.burst_threshold_ms);
    if !threshold_ms.is_finite() || threshold_ms < 0.0 {
        bail!("burst threshold must be a non-negative number of milliseconds");
    }

    println!("Loading keystroke data...");
    let events = storage::load_all_keystrokes(&config.raw_dir())
        .context("loading keystroke logs")?;
    if events.is_empty() {
        println!("No keystroke data found. Generating empty stats file.");
    } else {
        println!("Processing {} keystrokes...", events.len());
    }

    let builder = ReportBuilder::new()
        .with_rate_window(rate_window)
        .with_burst_threshold_ms(threshold_ms)
        .with_history(config.wpm_history_limit, config.burst_history_limit);
    let report = builder.build(&events, Utc::now());

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&report).context("serializing report")?;
    std::fs::write(&output, json).with_context(|| format!("writing {}", output.display()))?;
    tracing::info!(path = %output.display(), "wrote statistics report");

    let recorder_log = create_shared_log_with_persistence(config.recorder_stats_path());
    recorder_log.record_report_generated();
    if let Err(e) = recorder_log.save() {
        tracing::warn!("Could not save recorder stats: {e}");
    }

    println!(
        "Average speed: {} wpm | Bursts: {} (avg {} keys)",
        report.summary.avg_wpm, report.summary.total_bursts, report.summary.avg_burst_length
    );
    println!("Statistics saved to {}", output.display());
    Ok(())
}

fn cmd_status() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    println!("Typing Rhythm Status");
    println!("====================");
    println!();

    println!("Configuration:");
    println!("  Log directory: {}", config.raw_dir().display());
    println!("  Report file: {}", config.report_path.display());
    println!("  Speed window: {}s", config.rate_window.as_secs());
    println!("  Burst threshold: {}ms", config.burst_threshold_ms);
    println!();

    let files = storage::list_log_files(&config.raw_dir()).context("listing keystroke logs")?;
    println!("Daily logs: {}", files.len());
    if let (Some(first), Some(last)) = (files.first(), files.last()) {
        let name = |p: &PathBuf| {
            p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        };
        println!("  Oldest: {}", name(first));
        println!("  Newest: {}", name(last));
    }
    println!();

    let stats_path = config.recorder_stats_path();
    if stats_path.exists() {
        let stats = read_persisted(&stats_path)
            .with_context(|| format!("reading {}", stats_path.display()))?;
        println!("Cumulative Statistics:");
        println!("  Keystrokes recorded: {}", stats.keystrokes);
        println!("  Deletions recorded: {}", stats.deletions);
        println!("  Batches flushed: {}", stats.batches_flushed);
        println!("  Reports generated: {}", stats.reports_generated);
        println!("  Last updated: {}", stats.last_updated.to_rfc3339());
    } else {
        println!("No previous session data found.");
    }
    Ok(())
}

fn cmd_config(save: bool) -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;
    if save {
        config.save().context("saving configuration")?;
    }

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {}", Config::config_path().display());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).context("serializing configuration")?
    );
    Ok(())
}
