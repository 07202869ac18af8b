//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the tracker
//! and its driver. All types derive Serde traits for deserialization from
//! config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Admission and error-threshold settings.
    pub tracker: TrackerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Synthetic workload used by the driver binary.
    pub simulation: SimulationConfig,
}

/// Tracker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Maximum concurrently outstanding writes (backpressure).
    pub capacity: usize,

    /// Number of failed writes that opens the circuit. 0 starts it open.
    pub error_threshold: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            capacity: 500,
            error_threshold: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Simulated write workload.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of synthetic records when no input file is given.
    pub records: usize,

    /// Probability in `0.0..=1.0` that a write fails.
    pub failure_rate: f64,

    /// Lower bound of simulated write latency.
    pub min_latency_ms: u64,

    /// Upper bound of simulated write latency.
    pub max_latency_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            records: 1000,
            failure_rate: 0.0,
            min_latency_ms: 1,
            max_latency_ms: 20,
        }
    }
}
