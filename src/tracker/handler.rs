//! Completion handler trait.

use std::fmt;

/// Receives the outcome of every admitted write.
///
/// Methods are called from runtime worker threads, concurrently with each
/// other and with `submit`/`drain`. A write's permit is released only after
/// its notification returns, so implementations must not block.
pub trait CompletionHandler: Send + Sync + 'static {
    /// Value produced by a successful write.
    type Output: Send + 'static;
    /// Error produced by a failed write.
    type Error: fmt::Display + Send + 'static;
    /// Caller data attached to each write for correlation.
    type Context: fmt::Debug + Send + 'static;

    fn on_success(&self, output: Self::Output, context: Self::Context);

    fn on_failure(&self, error: Self::Error, context: Self::Context);

    /// Called once, on the failure that brings the error count to the threshold.
    fn on_threshold_exceeded(&self);
}
