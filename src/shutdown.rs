use tokio::sync::watch;
use tracing::{info, warn};

/// Graceful shutdown coordinator for long-running commands.
///
/// Background tasks hold a receiver and stop once it reads `true`.
pub struct ShutdownCoordinator {
    sender: watch::Sender<bool>,
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }

    pub fn trigger(&self) {
        info!("Initiating graceful shutdown");
        self.sender.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.sender.borrow()
    }

    /// Wait for Ctrl-C, then signal every subscriber
    pub async fn wait_for_ctrl_c(&self) {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl-C"),
            Err(e) => warn!(error = %e, "Could not listen for Ctrl-C, shutting down"),
        }
        self.trigger();
    }
}
