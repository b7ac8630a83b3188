// Persistent state store
//
// Holds the single orientation state slot. Loads never fail: a missing or
// unreadable slot degrades to the default state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::orientation::OrientationState;

pub mod file;
pub mod memory;

pub use file::FileStateStore;
pub use memory::MemoryStateStore;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Stale write rejected: revision {attempted} is not newer than stored revision {stored}")]
    StaleRevision { attempted: u64, stored: u64 },

    #[error("Revision counter exhausted at {0}")]
    RevisionExhausted(u64),

    #[error("Storage task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

/// What actually sits in the storage slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub schema_version: u32,
    pub revision: u64,
    pub saved_at: DateTime<Utc>,
    pub saved_by: String,
    pub state: OrientationState,
}

impl Snapshot {
    pub fn new(revision: u64, state: OrientationState) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            revision,
            saved_at: Utc::now(),
            saved_by: hostname::get()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
            state,
        }
    }

    /// The snapshot used when nothing usable is stored
    pub fn empty() -> Self {
        Self::new(0, OrientationState::default())
    }

    /// Wrap `state` as the snapshot that follows this one
    pub fn successor(&self, state: OrientationState) -> Result<Self, StoreError> {
        let revision = self
            .revision
            .checked_add(1)
            .ok_or(StoreError::RevisionExhausted(self.revision))?;
        Ok(Self::new(revision, state))
    }

    /// Parse stored bytes, returning `None` for anything that is not a valid snapshot
    pub fn parse(contents: &str) -> Option<Self> {
        let snapshot: Snapshot = match serde_json::from_str(contents) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "Stored orientation state is unreadable, using defaults");
                return None;
            }
        };
        if snapshot.schema_version != SCHEMA_VERSION {
            tracing::warn!(
                found = snapshot.schema_version,
                expected = SCHEMA_VERSION,
                "Stored orientation state has unknown schema version, using defaults"
            );
            return None;
        }
        // nothing could ever be saved after it
        if snapshot.revision == u64::MAX {
            tracing::warn!("Stored orientation state has an exhausted revision counter, using defaults");
            return None;
        }
        if let Err(reason) = snapshot.state.check_invariants() {
            tracing::warn!(reason = %reason, "Stored orientation state is inconsistent, using defaults");
            return None;
        }
        Some(snapshot)
    }
}

#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the stored snapshot, or an empty one if absent or corrupt
    async fn load_snapshot(&self) -> Snapshot;

    /// Persist a whole snapshot. Rejects revisions not newer than what is stored.
    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError>;

    /// Remove all persisted state
    async fn clear(&self) -> Result<(), StoreError>;

    async fn load(&self) -> OrientationState {
        self.load_snapshot().await.state
    }
}
