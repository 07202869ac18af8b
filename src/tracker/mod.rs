//! Bounded in-flight write tracking.
//!
//! # Data Flow
//! ```text
//! submit(write, context)
//!     → circuit_breaker (fail fast once errors >= threshold)
//!     → admission.rs (wait for one of `capacity` permits)
//!     → spawned observer awaits the write
//!         → counters updated
//!         → CompletionHandler notified (success / failure / threshold)
//!         → permit released
//!
//! drain()
//!     → admission.rs (reclaim all permits, close gate)
//!     → Ok(stats) or ThresholdExceeded
//! ```
//!
//! # Design Decisions
//! - Permit is an RAII guard held by the observer task for the write's whole
//!   duration, never across a lock
//! - Outcomes are reported through the handler and counters, never as errors
//!   from `submit`
//! - A tracker is drained once, at the end of its submission phase

pub mod admission;
pub mod error;
pub mod handler;
pub mod stats;
pub mod write_tracker;

pub use error::{AdmissionError, DrainError, TrackerError};
pub use handler::CompletionHandler;
pub use stats::{TrackerState, TrackerStats};
pub use write_tracker::WriteTracker;
