//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Tracker and driver produce:
//!     → logging.rs (structured log events, one per failure/refusal)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stderr via tracing-subscriber fmt layer
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Every failed write is logged with its context token for correlation
//! - Metrics are cheap (atomic increments) and disabled unless exported

pub mod logging;
pub mod metrics;
