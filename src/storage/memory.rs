use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Snapshot, StateStore, StoreError};

/// In-process state slot, used by tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    slot: Mutex<Option<Snapshot>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_empty(&self) -> bool {
        self.slot.lock().await.is_none()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn load_snapshot(&self) -> Snapshot {
        self.slot.lock().await.clone().unwrap_or_else(Snapshot::empty)
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let mut slot = self.slot.lock().await;
        if let Some(stored) = slot.as_ref() {
            if snapshot.revision <= stored.revision {
                return Err(StoreError::StaleRevision {
                    attempted: snapshot.revision,
                    stored: stored.revision,
                });
            }
        }
        *slot = Some(snapshot.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.slot.lock().await = None;
        Ok(())
    }
}
