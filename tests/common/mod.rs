//! Shared utilities for tracker integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use inflight_tracker::config::TrackerConfig;
use inflight_tracker::{CompletionHandler, WriteTracker};
use tokio::sync::oneshot;

pub type Outcome = Result<u32, TestError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("write {0} failed")]
pub struct TestError(pub u32);

/// A notification seen by [`RecordingHandler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Success { value: u32, context: u32 },
    Failure { error: u32, context: u32 },
    ThresholdExceeded,
}

/// Handler that records every notification in arrival order.
#[derive(Debug, Default)]
pub struct RecordingHandler {
    events: Mutex<Vec<Event>>,
    threshold_calls: AtomicUsize,
}

impl RecordingHandler {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn threshold_calls(&self) -> usize {
        self.threshold_calls.load(Ordering::SeqCst)
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl CompletionHandler for RecordingHandler {
    type Output = u32;
    type Error = TestError;
    type Context = u32;

    fn on_success(&self, output: u32, context: u32) {
        self.push(Event::Success {
            value: output,
            context,
        });
    }

    fn on_failure(&self, error: TestError, context: u32) {
        self.push(Event::Failure {
            error: error.0,
            context,
        });
    }

    fn on_threshold_exceeded(&self) {
        self.threshold_calls.fetch_add(1, Ordering::SeqCst);
        self.push(Event::ThresholdExceeded);
    }
}

pub fn tracker(capacity: usize, error_threshold: u64) -> WriteTracker<RecordingHandler> {
    let config = TrackerConfig {
        capacity,
        error_threshold,
    };
    WriteTracker::new(&config, RecordingHandler::default()).unwrap()
}

/// A write that completes only when the test sends its outcome.
///
/// Dropping the sender fails the write with `TestError(u32::MAX)`.
pub fn controlled_write() -> (
    oneshot::Sender<Outcome>,
    impl Future<Output = Outcome> + Send + 'static,
) {
    let (tx, rx) = oneshot::channel();
    let write = async move { rx.await.unwrap_or(Err(TestError(u32::MAX))) };
    (tx, write)
}

/// A write that panics instead of producing an outcome.
#[allow(unreachable_code)]
pub fn panicking_write() -> impl Future<Output = Outcome> + Send + 'static {
    async {
        let outcome: Outcome = panic!("store connection lost");
        outcome
    }
}

/// A write that sleeps, tracking how many writes run at once.
pub fn timed_write(
    id: u32,
    latency: Duration,
    fail: bool,
    running: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
) -> impl Future<Output = Outcome> + Send + 'static {
    async move {
        let now = running.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(latency).await;
        running.fetch_sub(1, Ordering::SeqCst);
        if fail {
            Err(TestError(id))
        } else {
            Ok(id)
        }
    }
}

/// Poll `condition` until it holds, failing the test after five seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("condition not reached within 5s");
}
