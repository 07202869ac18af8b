//! Admission gate with backpressure.
//!
//! # Responsibilities
//! - Enforce the capacity limit via a fair semaphore
//! - Hand out permits that are held for a write's whole lifetime
//! - Reclaim every permit for the drain barrier
//!
//! # Design Decisions
//! - tokio's semaphore queues waiters FIFO, including `acquire_many`, so
//!   older callers are never starved and drain waits behind earlier submits
//! - The interrupt signal is polled first so an already fired signal wins
//!   even when a permit is free

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::lifecycle::ShutdownSignal;

/// Error type for gate operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateError {
    /// The interrupt signal fired while waiting.
    Interrupted,
    /// The gate was closed by a completed drain.
    Closed,
}

/// A bounded gate that limits concurrently outstanding writes.
///
/// When every permit is taken, new admissions wait until a write completes.
#[derive(Debug)]
pub struct AdmissionGate {
    permits: Arc<Semaphore>,
    capacity: u32,
}

impl AdmissionGate {
    pub fn new(capacity: u32) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(capacity as usize)),
            capacity,
        }
    }

    /// Wait for one permit.
    ///
    /// Returns a permit that must be held until the write completes.
    pub async fn acquire(&self, mut interrupt: ShutdownSignal) -> Result<AdmissionPermit, GateError> {
        tokio::select! {
            biased;
            _ = interrupt.triggered() => Err(GateError::Interrupted),
            permit = Arc::clone(&self.permits).acquire_owned() => {
                let permit = permit.map_err(|_| GateError::Closed)?;
                tracing::trace!(
                    available_permits = self.permits.available_permits(),
                    "Permit acquired"
                );
                Ok(AdmissionPermit { _permit: permit })
            }
        }
    }

    /// Wait for every permit, then keep them and close the gate.
    ///
    /// Once this returns `Ok`, all later acquisitions fail with
    /// [`GateError::Closed`].
    pub async fn acquire_all(&self, mut interrupt: ShutdownSignal) -> Result<(), GateError> {
        tokio::select! {
            biased;
            _ = interrupt.triggered() => Err(GateError::Interrupted),
            permits = self.permits.acquire_many(self.capacity) => {
                let permits = permits.map_err(|_| GateError::Closed)?;
                permits.forget();
                self.permits.close();
                Ok(())
            }
        }
    }

    /// Permits currently free.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Permits currently held by writes (or reclaimed by drain).
    pub fn in_use(&self) -> usize {
        self.capacity as usize - self.available()
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn is_closed(&self) -> bool {
        self.permits.is_closed()
    }
}

/// A permit representing one admitted write.
///
/// When dropped, the slot is released back to the gate. This keeps the
/// capacity accounting intact even if a completion handler panics.
#[derive(Debug)]
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Shutdown;
    use std::time::Duration;

    #[tokio::test]
    async fn permits_are_bounded() {
        let gate = AdmissionGate::new(2);
        let a = gate.acquire(ShutdownSignal::never()).await.unwrap();
        let _b = gate.acquire(ShutdownSignal::never()).await.unwrap();
        assert_eq!(gate.available(), 0);
        assert_eq!(gate.in_use(), 2);

        let blocked = tokio::time::timeout(
            Duration::from_millis(20),
            gate.acquire(ShutdownSignal::never()),
        )
        .await;
        assert!(blocked.is_err());
        assert_eq!(gate.available(), 0);

        drop(a);
        assert_eq!(gate.available(), 1);
    }

    #[tokio::test]
    async fn interrupt_wins_over_free_permit() {
        let gate = AdmissionGate::new(1);
        let shutdown = Shutdown::new();
        shutdown.trigger();

        let result = gate.acquire(shutdown.subscribe()).await;
        assert_eq!(result.unwrap_err(), GateError::Interrupted);
        assert_eq!(gate.available(), 1);
    }

    #[tokio::test]
    async fn acquire_all_closes_gate() {
        let gate = AdmissionGate::new(3);
        gate.acquire_all(ShutdownSignal::never()).await.unwrap();

        assert!(gate.is_closed());
        assert_eq!(gate.in_use(), 3);
        let err = gate.acquire(ShutdownSignal::never()).await.unwrap_err();
        assert_eq!(err, GateError::Closed);
        let err = gate.acquire_all(ShutdownSignal::never()).await.unwrap_err();
        assert_eq!(err, GateError::Closed);
    }

    #[tokio::test]
    async fn acquire_all_waits_for_outstanding_permits() {
        let gate = Arc::new(AdmissionGate::new(2));
        let held = gate.acquire(ShutdownSignal::never()).await.unwrap();

        let barrier = {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move { gate.acquire_all(ShutdownSignal::never()).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!barrier.is_finished());

        drop(held);
        let result = tokio::time::timeout(Duration::from_secs(1), barrier)
            .await
            .expect("barrier should complete")
            .unwrap();
        assert!(result.is_ok());
    }
}
