//! Synthetic write workload used by the driver binary.
//!
//! Stands in for a real store: each write sleeps for a random latency and
//! fails with the configured probability.

use std::future::Future;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};

use crate::config::SimulationConfig;
use crate::tracker::{AdmissionError, CompletionHandler, TrackerStats, WriteTracker};

/// One input record, kept as the context token of its write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based position in the input.
    pub line: u64,
    pub text: String,
}

/// Acknowledgement of a simulated write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteReceipt {
    pub bytes: usize,
    pub latency: Duration,
}

/// Failure of a simulated write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    #[error("write rejected by store after {latency_ms} ms")]
    Rejected { latency_ms: u64 },
}

/// Store that acknowledges or rejects writes at random.
#[derive(Debug, Clone)]
pub struct SimulatedStore {
    config: SimulationConfig,
}

impl SimulatedStore {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Build the write for `record`.
    ///
    /// Outcome and latency are drawn up front so the returned future is `Send`.
    pub fn write(
        &self,
        record: &Record,
    ) -> impl Future<Output = Result<WriteReceipt, WriteError>> + Send + 'static {
        let mut rng = rand::thread_rng();
        let latency_ms = rng.gen_range(self.config.min_latency_ms..=self.config.max_latency_ms);
        let fails = rng.gen_bool(self.config.failure_rate.clamp(0.0, 1.0));
        let bytes = record.text.len();

        async move {
            let latency = Duration::from_millis(latency_ms);
            tokio::time::sleep(latency).await;
            if fails {
                Err(WriteError::Rejected { latency_ms })
            } else {
                Ok(WriteReceipt { bytes, latency })
            }
        }
    }
}

/// Handler that tallies outcomes and tells the feeder when to stop.
#[derive(Debug, Default)]
pub struct ReportingHandler {
    bytes_written: AtomicU64,
    first_failed_line: AtomicU64,
    stop: AtomicBool,
}

impl ReportingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set once the error threshold has been crossed.
    pub fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    /// Line of the earliest-numbered failed record, if any failed.
    pub fn first_failed_line(&self) -> Option<u64> {
        match self.first_failed_line.load(Ordering::Relaxed) {
            0 => None,
            line => Some(line),
        }
    }
}

impl CompletionHandler for ReportingHandler {
    type Output = WriteReceipt;
    type Error = WriteError;
    type Context = Record;

    fn on_success(&self, output: WriteReceipt, _context: Record) {
        self.bytes_written
            .fetch_add(output.bytes as u64, Ordering::Relaxed);
    }

    fn on_failure(&self, _error: WriteError, context: Record) {
        let _ = self
            .first_failed_line
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                (current == 0 || context.line < current).then_some(context.line)
            });
    }

    fn on_threshold_exceeded(&self) {
        self.stop.store(true, Ordering::Release);
    }
}

/// Where records come from.
pub enum RecordSource {
    /// Lines of a file, read lazily.
    File { lines: Lines<BufReader<File>>, line: u64 },
    /// `record-1` .. `record-N`.
    Synthetic { next: u64, total: u64 },
}

impl RecordSource {
    pub async fn open(path: &Path) -> std::io::Result<Self> {
        let file = File::open(path).await?;
        Ok(RecordSource::File {
            lines: BufReader::new(file).lines(),
            line: 0,
        })
    }

    pub fn synthetic(total: u64) -> Self {
        RecordSource::Synthetic { next: 1, total }
    }

    pub async fn next_record(&mut self) -> std::io::Result<Option<Record>> {
        match self {
            RecordSource::File { lines, line } => {
                let Some(text) = lines.next_line().await? else {
                    return Ok(None);
                };
                *line += 1;
                Ok(Some(Record { line: *line, text }))
            }
            RecordSource::Synthetic { next, total } => {
                if *next > *total {
                    return Ok(None);
                }
                let record = Record {
                    line: *next,
                    text: format!("record-{}", next),
                };
                *next += 1;
                Ok(Some(record))
            }
        }
    }
}

/// Why feeding stopped before the input ran out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StopReason {
    #[error("error threshold exceeded")]
    ThresholdExceeded,
    #[error("submission refused: {0}")]
    Refused(AdmissionError),
}

/// Submit every record until the input ends or the tracker stops admitting.
///
/// Returns the number of admitted writes and the stop reason, if any.
pub async fn feed(
    tracker: &WriteTracker<ReportingHandler>,
    store: &SimulatedStore,
    source: &mut RecordSource,
) -> std::io::Result<(u64, Option<StopReason>)> {
    let mut submitted = 0;
    while let Some(record) = source.next_record().await? {
        if tracker.handler().should_stop() {
            return Ok((submitted, Some(StopReason::ThresholdExceeded)));
        }
        let write = store.write(&record);
        if let Err(e) = tracker.submit(write, record).await {
            return Ok((submitted, Some(StopReason::Refused(e))));
        }
        submitted += 1;
    }
    Ok((submitted, None))
}

/// Final report printed by the driver.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub submitted: u64,
    pub stopped_early: Option<String>,
    pub drain_error: Option<String>,
    pub bytes_written: u64,
    pub first_failed_line: Option<u64>,
    pub stats: TrackerStats,
}

impl std::fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Submitted:     {}", self.submitted)?;
        writeln!(f, "Succeeded:     {}", self.stats.successes)?;
        writeln!(f, "Failed:        {}", self.stats.errors)?;
        writeln!(f, "Bytes written: {}", self.bytes_written)?;
        writeln!(f, "State:         {}", self.stats.state)?;
        if self.stats.in_flight > 0 {
            writeln!(f, "Still running: {} (outcome unknown)", self.stats.in_flight)?;
        }
        if let Some(line) = self.first_failed_line {
            writeln!(f, "First failure: line {}", line)?;
        }
        if let Some(reason) = &self.stopped_early {
            writeln!(f, "Stopped early: {}", reason)?;
        }
        if let Some(err) = &self.drain_error {
            writeln!(f, "Drain failed:  {}", err)?;
        }
        Ok(())
    }
}
