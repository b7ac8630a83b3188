use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::types::PendingSubmission;
use super::QueueError;

/// Durable mapping from submission id to pending submission
#[async_trait]
pub trait QueueStore: Send + Sync {
    async fn put(&self, submission: &PendingSubmission) -> Result<(), QueueError>;
    async fn list(&self) -> Result<Vec<PendingSubmission>, QueueError>;
    async fn delete(&self, id: &str) -> Result<(), QueueError>;
}

fn validate_id(id: &str) -> Result<(), QueueError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(QueueError::InvalidId(id.to_string()))
    }
}

/// One JSON file per pending submission
#[derive(Debug, Clone)]
pub struct FileQueueStore {
    directory: PathBuf,
}

impl FileQueueStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn entry_path(&self, id: &str) -> PathBuf {
        self.directory.join(format!("{id}.json"))
    }
}

#[async_trait]
impl QueueStore for FileQueueStore {
    async fn put(&self, submission: &PendingSubmission) -> Result<(), QueueError> {
        validate_id(&submission.id)?;
        fs::create_dir_all(&self.directory).await?;

        let path = self.entry_path(&submission.id);
        let temp_file = self.directory.join(format!("{}.json.tmp", submission.id));
        fs::write(&temp_file, serde_json::to_vec_pretty(submission)?).await?;
        fs::rename(&temp_file, &path).await?;

        debug!(submission_id = %submission.id, file = ?path, "Pending submission stored");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<PendingSubmission>, QueueError> {
        let mut entries = match fs::read_dir(&self.directory).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut pending = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let contents = match fs::read(&path).await {
                Ok(contents) => contents,
                // removed by a concurrent drain between listing and reading
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            match serde_json::from_slice::<PendingSubmission>(&contents) {
                Ok(submission) => pending.push(submission),
                Err(e) => {
                    warn!(file = ?path, error = %e, "Skipping unreadable pending submission");
                }
            }
        }
        Ok(pending)
    }

    async fn delete(&self, id: &str) -> Result<(), QueueError> {
        validate_id(id)?;
        match fs::remove_file(self.entry_path(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process queue store for tests
#[derive(Debug, Default)]
pub struct MemoryQueueStore {
    entries: Mutex<HashMap<String, PendingSubmission>>,
}

impl MemoryQueueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QueueStore for MemoryQueueStore {
    async fn put(&self, submission: &PendingSubmission) -> Result<(), QueueError> {
        validate_id(&submission.id)?;
        self.entries
            .lock()
            .await
            .insert(submission.id.clone(), submission.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<PendingSubmission>, QueueError> {
        Ok(self.entries.lock().await.values().cloned().collect())
    }

    async fn delete(&self, id: &str) -> Result<(), QueueError> {
        self.entries.lock().await.remove(id);
        Ok(())
    }
}
