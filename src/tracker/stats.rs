//! Tracker state and counter snapshots.

use serde::Serialize;

/// Lifecycle of a tracker.
///
/// ```text
/// Accepting → CircuitOpen   (a failure brings errors to the threshold)
/// Accepting | CircuitOpen → Drained   (drain reclaimed every permit)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerState {
    /// Errors below threshold; writes are admitted or wait for a permit.
    Accepting,
    /// Errors reached threshold; submissions fail fast.
    CircuitOpen,
    /// Every permit reclaimed; terminal.
    Drained,
}

impl std::fmt::Display for TrackerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TrackerState::Accepting => "accepting",
            TrackerState::CircuitOpen => "circuit_open",
            TrackerState::Drained => "drained",
        };
        f.write_str(s)
    }
}

/// Point-in-time view of a tracker's counters.
///
/// Counters are read independently and may be slightly stale relative to
/// completions still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackerStats {
    pub capacity: u32,
    pub error_threshold: u64,
    pub successes: u64,
    pub errors: u64,
    pub in_flight: usize,
    pub state: TrackerState,
}

impl TrackerStats {
    /// Writes that reached a terminal outcome.
    pub fn completed(&self) -> u64 {
        self.successes + self.errors
    }
}
