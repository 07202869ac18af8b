//! Tracker error definitions.

use thiserror::Error;

use crate::config::validation::ValidationError;

/// Why a write was not admitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    /// Failed writes already reached the threshold.
    #[error("circuit open: {errors} errors reached threshold of {threshold}")]
    CircuitOpen { errors: u64, threshold: u64 },

    /// The interrupt signal fired while waiting for a permit.
    #[error("interrupted while waiting for a permit")]
    Interrupted,

    /// The tracker was drained and admits no more work.
    #[error("tracker already drained")]
    Drained,
}

impl AdmissionError {
    /// Short label used for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            AdmissionError::CircuitOpen { .. } => "circuit_open",
            AdmissionError::Interrupted => "interrupted",
            AdmissionError::Drained => "drained",
        }
    }
}

/// Why a drain did not confirm a clean end state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrainError {
    /// All writes finished, but too many of them failed.
    #[error("batch failed: {errors} errors reached threshold of {threshold}")]
    ThresholdExceeded { errors: u64, threshold: u64 },

    /// The interrupt signal fired before every permit was reclaimed.
    #[error("interrupted while waiting for in-flight writes")]
    Interrupted,

    /// A previous drain already reclaimed the permits.
    #[error("tracker already drained")]
    AlreadyDrained,
}

/// Errors constructing a tracker.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("invalid tracker config: {}", join(.0))]
    InvalidConfig(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AdmissionError::CircuitOpen {
            errors: 3,
            threshold: 3,
        };
        assert_eq!(err.to_string(), "circuit open: 3 errors reached threshold of 3");
        assert_eq!(err.reason(), "circuit_open");

        let err = DrainError::ThresholdExceeded {
            errors: 12,
            threshold: 10,
        };
        assert!(err.to_string().contains("12"));
    }
}
