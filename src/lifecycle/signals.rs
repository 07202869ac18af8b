//! OS signal handling.
//!
//! Ctrl-C (SIGINT) triggers the shared [`Shutdown`], which interrupts any
//! task blocked waiting for admission or drain. In-flight writes keep running.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::lifecycle::Shutdown;

/// Spawn a task that triggers `shutdown` on the first Ctrl-C.
pub fn spawn_ctrl_c_handler(shutdown: Arc<Shutdown>) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::warn!("Interrupt received, stopping admission of new writes");
                shutdown.trigger();
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            }
        }
    })
}
