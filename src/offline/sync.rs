use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

use super::queue::OfflineQueue;

/// Background task that drains the queue whenever the endpoint is reachable.
///
/// Connectivity is probed every `interval`. Each probe that finds the
/// endpoint reachable while entries are pending triggers a drain, so both
/// the offline-to-online transition and leftovers from a partial drain are
/// picked up.
pub struct SyncWorker {
    queue: Arc<OfflineQueue>,
    interval: Duration,
}

impl SyncWorker {
    pub fn new(queue: Arc<OfflineQueue>, interval: Duration) -> Self {
        Self { queue, interval }
    }

    /// Run until `shutdown` flips to true (or its sender is dropped)
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(interval_secs = self.interval.as_secs(), "Sync worker started");
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut was_online: Option<bool> = None;

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let online = self.queue.is_online().await;
                    match (was_online, online) {
                        (Some(false), true) => info!("Connectivity restored"),
                        (Some(true), false) | (None, false) => warn!("Submission endpoint unreachable"),
                        _ => {}
                    }
                    was_online = Some(online);
                    if online {
                        self.sync_once().await;
                    }
                }
            }
        }

        info!("Sync worker stopped");
    }

    async fn sync_once(&self) {
        match self.queue.list_pending().await {
            Ok(pending) if pending.is_empty() => {}
            Ok(_) => {
                if let Err(e) = self.queue.drain().await {
                    error!(error = %e, "Sync pass failed");
                }
            }
            Err(e) => error!(error = %e, "Could not read pending submissions"),
        }
    }
}
