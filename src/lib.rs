//! Bounded tracking of in-flight asynchronous writes.
//!
//! A [`WriteTracker`] admits at most `capacity` concurrent writes, counts
//! their outcomes, stops admitting work once failures reach a threshold, and
//! offers a drain barrier that waits for everything still in flight.

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod simulation;
pub mod tracker;

pub use config::schema::AppConfig;
pub use lifecycle::{Shutdown, ShutdownSignal};
pub use tracker::{
    AdmissionError, CompletionHandler, DrainError, TrackerError, TrackerState, TrackerStats,
    WriteTracker,
};
