//! Error-threshold circuit breaker.
//!
//! # States
//! - Closed: failures below threshold, new writes are admitted
//! - Open: failures reached threshold, new writes fail fast
//!
//! A threshold of 0 starts Open and never reports a trip.
//!
//! # State Transitions
//! ```text
//! Closed → Open: failure_count >= threshold
//! ```
//!
//! # Design Decisions
//! - One breaker per tracker, shared by every completion task
//! - No half-open state and no recovery timer: a batch that failed stays failed
//! - The trip is detected on the post-increment value, so exactly one
//!   failure observes the crossing

use std::sync::atomic::{AtomicU64, Ordering};

/// Result of recording one failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureRecord {
    /// Failure count including this failure.
    pub count: u64,
    /// True only for the failure that moved the breaker to Open.
    pub tripped: bool,
}

/// Counts failures and opens once they reach a fixed threshold.
#[derive(Debug)]
pub struct CircuitBreaker {
    threshold: u64,
    failures: AtomicU64,
}

impl CircuitBreaker {
    /// Create a closed breaker that opens after `threshold` failures.
    pub fn new(threshold: u64) -> Self {
        Self {
            threshold,
            failures: AtomicU64::new(0),
        }
    }

    /// Record a failure and report whether it tripped the breaker.
    pub fn record_failure(&self) -> FailureRecord {
        let count = self.failures.fetch_add(1, Ordering::AcqRel) + 1;
        FailureRecord {
            count,
            tripped: count == self.threshold,
        }
    }

    /// Best-effort check; may race with concurrent failures.
    pub fn is_open(&self) -> bool {
        self.threshold <= self.failures()
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Acquire)
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }
}
