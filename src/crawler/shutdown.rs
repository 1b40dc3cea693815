//! Interrupt handling
//!
//! Ctrl+C asks the crawl loop to stop before its next URL, so the page in
//! flight finishes and the final checkpoint and index still get written.
//! Further interrupts only repeat the request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop flag checked by the crawl loop
#[derive(Debug, Clone, Default)]
pub struct ShutdownController {
    requested: Arc<AtomicBool>,
}

impl ShutdownController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a graceful stop
    pub fn trigger(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Spawns the Ctrl+C listener; must be called inside a Tokio runtime
    pub fn listen_for_ctrl_c(&self) -> tokio::task::JoinHandle<()> {
        let controller = self.clone();

        tokio::spawn(async move {
            loop {
                if tokio::signal::ctrl_c().await.is_err() {
                    tracing::warn!("Unable to listen for Ctrl+C; interrupts will not be graceful");
                    return;
                }

                if controller.is_requested() {
                    tracing::warn!("Stop already requested, still finishing current page");
                } else {
                    tracing::warn!("Interrupt received, finishing current page and saving state");
                }
                controller.trigger();
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_is_shared_between_clones() {
        let controller = ShutdownController::new();
        let observer = controller.clone();

        assert!(!observer.is_requested());
        controller.trigger();
        assert!(observer.is_requested());
    }

    #[test]
    fn test_repeated_trigger_keeps_stop_requested() {
        let controller = ShutdownController::new();
        controller.trigger();
        controller.trigger();
        assert!(controller.is_requested());
    }

    #[tokio::test]
    async fn test_listener_does_not_request_stop_on_its_own() {
        let controller = ShutdownController::new();
        let listener = controller.listen_for_ctrl_c();
        tokio::task::yield_now().await;

        assert!(!controller.is_requested());
        listener.abort();
        assert!(listener.await.unwrap_err().is_cancelled());
    }
}
