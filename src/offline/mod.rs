// Offline submission queue: payloads that could not be delivered are kept
// on disk and replayed when connectivity returns.

use thiserror::Error;

pub mod queue;
pub mod store;
pub mod sync;
pub mod types;

pub use queue::{DrainReport, FailedDelivery, OfflineQueue, SubmitOutcome};
pub use store::{FileQueueStore, MemoryQueueStore, QueueStore};
pub use sync::SyncWorker;
pub use types::{
    OrientationSubmission, PendingSubmission, QuizSubmission, SubmissionKind, SubmissionPayload,
};

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid submission id: {0:?}")]
    InvalidId(String),
}
