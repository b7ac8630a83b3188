use async_trait::async_trait;
use fd_lock::RwLock;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{Snapshot, StateStore, StoreError};

/// File-backed state slot.
///
/// Writes go to a temporary file that is renamed over the slot while holding
/// an exclusive lock on a sibling `.lock` file, so readers only ever see a
/// whole snapshot and concurrent writers are serialized.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(".lock");
        path.with_file_name(name)
    }

    fn temp_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        path.with_file_name(name)
    }

    fn open_lock_file(path: &Path) -> Result<File, StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(Self::lock_path(path))?;
        Ok(lock_file)
    }

    fn read_slot(path: &Path) -> Option<Snapshot> {
        match fs::read_to_string(path) {
            Ok(contents) => Snapshot::parse(&contents),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(file = ?path, error = %e, "Failed to read orientation state, using defaults");
                None
            }
        }
    }

    fn save_blocking(path: &Path, snapshot: &Snapshot) -> Result<(), StoreError> {
        let mut lock = RwLock::new(Self::open_lock_file(path)?);
        let _guard = lock.write()?;

        if let Some(stored) = Self::read_slot(path) {
            if snapshot.revision <= stored.revision {
                return Err(StoreError::StaleRevision {
                    attempted: snapshot.revision,
                    stored: stored.revision,
                });
            }
        }

        let serialized = serde_json::to_string_pretty(snapshot)?;
        let temp_file = Self::temp_path(path);
        fs::write(&temp_file, serialized)?;
        fs::rename(&temp_file, path)?;
        Ok(())
    }

    fn clear_blocking(path: &Path) -> Result<(), StoreError> {
        let mut lock = RwLock::new(Self::open_lock_file(path)?);
        let _guard = lock.write()?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn load_snapshot(&self) -> Snapshot {
        let path = self.path.clone();
        match tokio::task::spawn_blocking(move || Self::read_slot(&path)).await {
            Ok(Some(snapshot)) => {
                debug!(
                    file = ?self.path,
                    revision = snapshot.revision,
                    step = %snapshot.state.current_step,
                    "Orientation state loaded"
                );
                snapshot
            }
            Ok(None) => Snapshot::empty(),
            Err(e) => {
                tracing::warn!(error = %e, "State load task failed, using defaults");
                Snapshot::empty()
            }
        }
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let path = self.path.clone();
        let to_write = snapshot.clone();
        tokio::task::spawn_blocking(move || Self::save_blocking(&path, &to_write)).await??;
        debug!(
            file = ?self.path,
            revision = snapshot.revision,
            step = %snapshot.state.current_step,
            "Orientation state saved"
        );
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || Self::clear_blocking(&path)).await??;
        info!(file = ?self.path, "Orientation state cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::{OrientationState, Step};
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileStateStore {
        FileStateStore::new(dir.path().join("nested").join("orientation-state.json"))
    }

    #[tokio::test]
    async fn test_missing_slot_loads_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        let snapshot = store.load_snapshot().await;
        assert_eq!(snapshot.revision, 0);
        assert_eq!(snapshot.state, OrientationState::default());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips_state() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        let state = OrientationState {
            session_id: Some("session_1_abcdefghi".to_string()),
            video_progress: 42.5,
            current_step: Step::Video,
            ..OrientationState::default()
        };

        store.save(&Snapshot::new(1, state.clone())).await.unwrap();

        assert_eq!(store.load().await, state);
        assert!(!FileStateStore::temp_path(store.path()).exists());
    }

    #[tokio::test]
    async fn test_stale_revision_cannot_overwrite_newer_state() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        let newer = OrientationState {
            current_step: Step::Quiz,
            ..OrientationState::default()
        };
        store.save(&Snapshot::new(5, newer.clone())).await.unwrap();

        let result = store.save(&Snapshot::new(4, OrientationState::default())).await;
        assert!(matches!(result, Err(StoreError::StaleRevision { attempted: 4, stored: 5 })));
        assert_eq!(store.load().await, newer);
    }

    #[tokio::test]
    async fn test_corrupt_slot_degrades_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        store.save(&Snapshot::new(1, OrientationState::default())).await.unwrap();
        std::fs::write(store.path(), b"{\"truncated\": ").unwrap();

        assert_eq!(store.load().await, OrientationState::default());
        // a corrupt slot does not block the next write
        store.save(&Snapshot::new(1, OrientationState::default())).await.unwrap();
    }

    #[tokio::test]
    async fn test_exhausted_revision_is_replaced_on_next_save() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        let stuck = OrientationState {
            current_step: Step::Quiz,
            ..OrientationState::default()
        };
        store.save(&Snapshot::new(u64::MAX, stuck)).await.unwrap();

        let snapshot = store.load_snapshot().await;
        assert_eq!(snapshot.revision, 0);
        assert_eq!(snapshot.state, OrientationState::default());
        store.save(&Snapshot::new(1, OrientationState::default())).await.unwrap();
        assert_eq!(store.load_snapshot().await.revision, 1);
    }

    #[tokio::test]
    async fn test_clear_removes_slot() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        store.save(&Snapshot::new(1, OrientationState::default())).await.unwrap();
        store.clear().await.unwrap();
        assert!(!store.path().exists());
        // clearing twice is fine
        store.clear().await.unwrap();
    }
}
