//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → TrackerConfig handed to WriteTracker::new
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; capacity and threshold are fixed for
//!   the lifetime of a tracker
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::AppConfig;
pub use schema::ObservabilityConfig;
pub use schema::SimulationConfig;
pub use schema::TrackerConfig;
