//! In-flight write tracker driver.
//!
//! Feeds records through a [`WriteTracker`] against a simulated store and
//! reports the outcome of the batch.
//!
//! # Architecture Overview
//!
//! ```text
//!     records (file or synthetic)
//!         │
//!         ▼
//!   ┌───────────┐  submit   ┌──────────────────────────────┐   write   ┌───────────┐
//!   │  feeder   │──────────▶│         WriteTracker         │──────────▶│ simulated │
//!   │ (main.rs) │           │ circuit breaker → admission  │           │   store   │
//!   └───────────┘           │ gate → observer task         │◀──────────└───────────┘
//!         ▲                 └──────────────┬───────────────┘  outcome
//!         │ should_stop()                  │
//!         │                                ▼
//!         │                       ┌────────────────┐
//!         └───────────────────────│ReportingHandler│
//!                                 └────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use inflight_tracker::config::loader::load_config;
use inflight_tracker::config::AppConfig;
use inflight_tracker::lifecycle::signals::spawn_ctrl_c_handler;
use inflight_tracker::lifecycle::Shutdown;
use inflight_tracker::observability::{logging, metrics};
use inflight_tracker::simulation::{feed, BatchSummary, RecordSource, ReportingHandler, SimulatedStore};
use inflight_tracker::{DrainError, WriteTracker};

#[derive(Parser)]
#[command(name = "inflight-tracker")]
#[command(about = "Feed records through a bounded in-flight write tracker", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input file, one record per line. Defaults to synthetic records.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!(
        capacity = config.tracker.capacity,
        error_threshold = config.tracker.error_threshold,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shutdown = Arc::new(Shutdown::new());
    spawn_ctrl_c_handler(Arc::clone(&shutdown));

    let tracker = WriteTracker::new(&config.tracker, ReportingHandler::new())?
        .with_interrupt(shutdown.subscribe());
    let store = SimulatedStore::new(config.simulation.clone());

    let mut source = match &cli.input {
        Some(path) => RecordSource::open(path).await?,
        None => RecordSource::synthetic(config.simulation.records as u64),
    };

    let (submitted, stopped_early) = feed(&tracker, &store, &mut source).await?;
    if let Some(reason) = &stopped_early {
        tracing::warn!(submitted, reason = %reason, "Stopped reading input");
    }

    let drained = tracker.drain().await;
    if let Err(DrainError::Interrupted) = &drained {
        tracing::warn!(
            in_flight = tracker.in_flight(),
            "Writes still running at exit; their outcomes are unknown"
        );
    }
    let handler = tracker.handler();
    let summary = BatchSummary {
        submitted,
        stopped_early: stopped_early.map(|r| r.to_string()),
        drain_error: drained.as_ref().err().map(ToString::to_string),
        bytes_written: handler.bytes_written(),
        first_failed_line: handler.first_failed_line(),
        stats: tracker.stats(),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary);
    }

    drained?;
    tracing::info!("Batch complete");
    Ok(())
}
