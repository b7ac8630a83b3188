use anyhow::Result;

use super::AppContext;
use crate::offline::SyncWorker;
use crate::shutdown::ShutdownCoordinator;

pub struct SyncCommand {
    pub watch: bool,
}

impl SyncCommand {
    pub fn new(watch: bool) -> Self {
        Self { watch }
    }

    pub async fn execute(&self, context: &AppContext) -> Result<()> {
        if self.watch {
            return self.watch_until_interrupted(context).await;
        }

        if !context.queue.is_online().await {
            let pending = context.queue.list_pending().await?;
            println!("📡 Offline: {} submission(s) will sync when you're back online.", pending.len());
            return Ok(());
        }

        let report = context.queue.drain().await?;
        if report.attempted() == 0 {
            println!("📭 Nothing to sync");
            return Ok(());
        }
        println!("📤 Delivered {} submission(s)", report.delivered.len());
        for failed in &report.failed {
            println!("   ❌ {}: {}", failed.id, failed.reason);
        }
        Ok(())
    }

    async fn watch_until_interrupted(&self, context: &AppContext) -> Result<()> {
        let coordinator = ShutdownCoordinator::new();
        let worker = SyncWorker::new(context.queue.clone(), context.config.submission.sync_interval());
        let handle = tokio::spawn(worker.run(coordinator.subscribe()));

        println!("🔄 Watching for connectivity. Press Ctrl-C to stop.");
        coordinator.wait_for_ctrl_c().await;
        handle.await?;

        let pending = context.queue.list_pending().await?;
        println!("👋 Sync stopped with {} submission(s) pending", pending.len());
        Ok(())
    }
}
