//! Bounded tracker for in-flight asynchronous writes.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::task::JoinError;

use crate::config::validation::{validate_tracker_config, ValidationError};
use crate::config::TrackerConfig;
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::resilience::CircuitBreaker;
use crate::tracker::admission::{AdmissionGate, AdmissionPermit, GateError};
use crate::tracker::error::{AdmissionError, DrainError, TrackerError};
use crate::tracker::handler::CompletionHandler;
use crate::tracker::stats::{TrackerState, TrackerStats};

/// Admits at most `capacity` concurrent writes and tracks their outcomes.
///
/// Cloning is cheap and every clone shares the same gate, counters and
/// handler.
pub struct WriteTracker<H: CompletionHandler> {
    shared: Arc<Shared<H>>,
    interrupt: ShutdownSignal,
}

struct Shared<H: CompletionHandler> {
    gate: AdmissionGate,
    breaker: CircuitBreaker,
    successes: AtomicU64,
    handler: H,
}

impl<H: CompletionHandler> WriteTracker<H> {
    /// Create a tracker from validated settings.
    pub fn new(config: &TrackerConfig, handler: H) -> Result<Self, TrackerError> {
        validate_tracker_config(config).map_err(TrackerError::InvalidConfig)?;
        let capacity = u32::try_from(config.capacity).map_err(|_| {
            TrackerError::InvalidConfig(vec![ValidationError::new(
                "tracker.capacity",
                "must fit in 32 bits",
            )])
        })?;

        tracing::debug!(
            capacity,
            error_threshold = config.error_threshold,
            "Write tracker created"
        );

        Ok(Self {
            shared: Arc::new(Shared {
                gate: AdmissionGate::new(capacity),
                breaker: CircuitBreaker::new(config.error_threshold),
                successes: AtomicU64::new(0),
                handler,
            }),
            interrupt: ShutdownSignal::never(),
        })
    }

    /// Let `signal` interrupt waits in [`submit`](Self::submit) and
    /// [`drain`](Self::drain).
    pub fn with_interrupt(mut self, signal: ShutdownSignal) -> Self {
        self.interrupt = signal;
        self
    }

    /// Admit a write and observe its completion.
    ///
    /// Waits while `capacity` writes are outstanding. Returns as soon as the
    /// write is admitted; its outcome is delivered to the handler later, on
    /// whichever worker thread the write completes on.
    ///
    /// Refuses without waiting once the error threshold has been reached.
    /// Dropping the returned future before it resolves admits nothing.
    ///
    /// A write that panics yields no outcome: neither counter moves and no
    /// handler method runs. The panic is logged and its permit is released.
    pub async fn submit<F>(&self, operation: F, context: H::Context) -> Result<(), AdmissionError>
    where
        F: Future<Output = Result<H::Output, H::Error>> + Send + 'static,
    {
        let shared = &self.shared;

        // Best-effort: a failure may land between this check and the acquire.
        if shared.breaker.is_open() {
            let err = AdmissionError::CircuitOpen {
                errors: shared.breaker.failures(),
                threshold: shared.breaker.threshold(),
            };
            return Err(self.refuse(err, &context));
        }

        let permit = match shared.gate.acquire(self.interrupt.clone()).await {
            Ok(permit) => permit,
            Err(GateError::Interrupted) => {
                return Err(self.refuse(AdmissionError::Interrupted, &context));
            }
            Err(GateError::Closed) => return Err(self.refuse(AdmissionError::Drained, &context)),
        };
        metrics::record_in_flight(shared.gate.in_use());

        let shared = Arc::clone(shared);
        tokio::spawn(async move {
            match tokio::spawn(operation).await {
                Ok(outcome) => shared.complete(outcome, context, permit),
                Err(join_error) => shared.abandon(join_error, context, permit),
            }
        });

        Ok(())
    }

    /// Wait for every admitted write to finish, then close the tracker.
    ///
    /// This is a full barrier and is single-use: the reclaimed permits are
    /// never returned, so later submissions fail with
    /// [`AdmissionError::Drained`].
    pub async fn drain(&self) -> Result<TrackerStats, DrainError> {
        let shared = &self.shared;

        match shared.gate.acquire_all(self.interrupt.clone()).await {
            Ok(()) => {}
            Err(GateError::Interrupted) => {
                tracing::warn!(
                    in_flight = shared.gate.in_use(),
                    error_count = shared.breaker.failures(),
                    success_count = shared.successes(),
                    "Drain interrupted before all writes completed"
                );
                return Err(DrainError::Interrupted);
            }
            Err(GateError::Closed) => {
                tracing::warn!("Drain requested on a tracker that was already drained");
                return Err(DrainError::AlreadyDrained);
            }
        }
        metrics::record_in_flight(0);

        let stats = self.stats();
        if shared.breaker.is_open() {
            tracing::error!(
                error_count = stats.errors,
                error_threshold = stats.error_threshold,
                success_count = stats.successes,
                "Drain finished with too many errors"
            );
            return Err(DrainError::ThresholdExceeded {
                errors: stats.errors,
                threshold: stats.error_threshold,
            });
        }

        tracing::info!(
            error_count = stats.errors,
            success_count = stats.successes,
            "All writes drained"
        );
        Ok(stats)
    }

    pub fn error_count(&self) -> u64 {
        self.shared.breaker.failures()
    }

    pub fn success_count(&self) -> u64 {
        self.shared.successes()
    }

    pub fn capacity(&self) -> u32 {
        self.shared.gate.capacity()
    }

    pub fn error_threshold(&self) -> u64 {
        self.shared.breaker.threshold()
    }

    /// Permits currently free.
    pub fn available_permits(&self) -> usize {
        self.shared.gate.available()
    }

    /// Admitted writes whose outcome has not been recorded yet.
    pub fn in_flight(&self) -> usize {
        if self.shared.gate.is_closed() {
            0
        } else {
            self.shared.gate.in_use()
        }
    }

    pub fn state(&self) -> TrackerState {
        if self.shared.gate.is_closed() {
            TrackerState::Drained
        } else if self.shared.breaker.is_open() {
            TrackerState::CircuitOpen
        } else {
            TrackerState::Accepting
        }
    }

    pub fn stats(&self) -> TrackerStats {
        TrackerStats {
            capacity: self.capacity(),
            error_threshold: self.error_threshold(),
            successes: self.success_count(),
            errors: self.error_count(),
            in_flight: self.in_flight(),
            state: self.state(),
        }
    }

    pub fn handler(&self) -> &H {
        &self.shared.handler
    }

    fn refuse(&self, err: AdmissionError, context: &H::Context) -> AdmissionError {
        tracing::warn!(
            reason = err.reason(),
            error_count = self.error_count(),
            success_count = self.success_count(),
            context = ?context,
            "Write refused: {}",
            err
        );
        metrics::record_refused(err.reason());
        err
    }
}

impl<H: CompletionHandler> Clone for WriteTracker<H> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            interrupt: self.interrupt.clone(),
        }
    }
}

impl<H: CompletionHandler> Shared<H> {
    fn successes(&self) -> u64 {
        self.successes.load(Ordering::Acquire)
    }

    /// Record one outcome. The permit is released last so a drain never
    /// returns while a notification is still running.
    fn complete(
        &self,
        outcome: Result<H::Output, H::Error>,
        context: H::Context,
        permit: AdmissionPermit,
    ) {
        match outcome {
            Ok(output) => {
                let successes = self.successes.fetch_add(1, Ordering::AcqRel) + 1;
                tracing::trace!(success_count = successes, context = ?context, "Write succeeded");
                metrics::record_outcome("success");
                self.handler.on_success(output, context);
            }
            Err(error) => {
                let record = self.breaker.record_failure();
                tracing::warn!(
                    error_count = record.count,
                    success_count = self.successes(),
                    error = %error,
                    context = ?context,
                    "Write failed"
                );
                metrics::record_outcome("failure");
                self.handler.on_failure(error, context);

                if record.tripped {
                    tracing::error!(
                        error_count = record.count,
                        error_threshold = self.breaker.threshold(),
                        success_count = self.successes(),
                        "Error threshold reached, refusing new writes"
                    );
                    metrics::record_circuit_opened();
                    self.handler.on_threshold_exceeded();
                }
            }
        }

        self.release(permit);
    }

    /// The write task ended without an outcome (panic or runtime shutdown).
    fn abandon(&self, join_error: JoinError, context: H::Context, permit: AdmissionPermit) {
        tracing::error!(
            error = %join_error,
            error_count = self.breaker.failures(),
            success_count = self.successes(),
            context = ?context,
            "Write ended without an outcome"
        );
        metrics::record_outcome("abandoned");
        self.release(permit);
    }

    fn release(&self, permit: AdmissionPermit) {
        drop(permit);
        if !self.gate.is_closed() {
            metrics::record_in_flight(self.gate.in_use());
        }
    }
}
