//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Write completes with an error:
//!     → circuit_breaker.rs (count failure, open circuit if threshold reached)
//!     → tracker refuses new admissions while open
//! ```
//!
//! # Design Decisions
//! - Failed writes are never retried here; the caller decides what to do
//! - Circuit breaker prevents piling more work onto a failing store

pub mod circuit_breaker;

pub use circuit_breaker::{CircuitBreaker, FailureRecord};
