//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     trigger() → every ShutdownSignal fires
//!              → blocked submit/drain calls return Interrupted
//!
//! Signals (signals.rs):
//!     SIGINT → Shutdown::trigger()
//! ```
//!
//! # Design Decisions
//! - Watch channel, not broadcast: late subscribers still observe the signal
//! - Interruption never cancels writes that were already admitted

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownSignal};
