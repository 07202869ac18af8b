//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (capacity > 0, rates within 0..=1)
//! - Check related fields agree (latency bounds, metrics address)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use tokio::sync::Semaphore;

use crate::config::schema::{AppConfig, ObservabilityConfig, SimulationConfig, TrackerConfig};

/// A single semantic problem with a configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate the whole configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_tracker(&config.tracker, &mut errors);
    check_observability(&config.observability, &mut errors);
    check_simulation(&config.simulation, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate only the tracker section.
pub fn validate_tracker_config(config: &TrackerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_tracker(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_tracker(config: &TrackerConfig, errors: &mut Vec<ValidationError>) {
    if config.capacity == 0 {
        errors.push(ValidationError::new("tracker.capacity", "must be greater than 0"));
    }
    // Drain acquires every permit in one `acquire_many(u32)` call.
    let max = Semaphore::MAX_PERMITS.min(u32::MAX as usize);
    if config.capacity > max {
        errors.push(ValidationError::new(
            "tracker.capacity",
            format!("must not exceed {}", max),
        ));
    }
}

fn check_observability(config: &ObservabilityConfig, errors: &mut Vec<ValidationError>) {
    const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
    if !LEVELS.contains(&config.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.log_level),
        ));
    }
    if config.metrics_enabled && config.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.metrics_address),
        ));
    }
}

fn check_simulation(config: &SimulationConfig, errors: &mut Vec<ValidationError>) {
    if !(0.0..=1.0).contains(&config.failure_rate) {
        errors.push(ValidationError::new(
            "simulation.failure_rate",
            "must be between 0.0 and 1.0",
        ));
    }
    if config.min_latency_ms > config.max_latency_ms {
        errors.push(ValidationError::new(
            "simulation.max_latency_ms",
            "must be greater than or equal to min_latency_ms",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn reports_every_error() {
        let mut config = AppConfig::default();
        config.tracker.capacity = 0;
        config.tracker.error_threshold = 0;
        config.simulation.failure_rate = 1.5;
        config.simulation.min_latency_ms = 50;
        config.simulation.max_latency_ms = 10;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "tracker.capacity",
                "simulation.failure_rate",
                "simulation.max_latency_ms",
            ]
        );
    }

    #[test]
    fn zero_error_threshold_is_accepted() {
        let mut config = AppConfig::default();
        config.tracker.error_threshold = 0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn metrics_address_checked_only_when_enabled() {
        let mut config = AppConfig::default();
        config.observability.metrics_address = "not-an-address".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "observability.metrics_address");
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut config = AppConfig::default();
        config.observability.log_level = "verbose".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("verbose"));
    }
}
