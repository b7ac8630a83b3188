// Safety Orientation Library - worker onboarding flow with offline sync
// This exposes the core components for testing and integration

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod http;
pub mod offline;
pub mod orientation;
pub mod quiz;
pub mod shutdown;
pub mod storage;
pub mod telemetry;
pub mod video;

// Re-export key types for easy access
pub use config::{config, OrientationConfig};
pub use http::{DeliveryError, HttpSubmissionClient, SubmissionClient};
pub use offline::{OfflineQueue, PendingSubmission, QueueError, SubmissionPayload, SyncWorker};
pub use orientation::{
    GuardDecision, OrientationSession, OrientationState, SessionError, Step, TransitionError,
    WorkerInfo, WorkerStatus,
};
pub use quiz::{Attempt, AttemptResult, Question};
pub use shutdown::ShutdownCoordinator;
pub use storage::{FileStateStore, StateStore, StoreError};
pub use telemetry::{create_session_span, generate_correlation_id, init_telemetry};
pub use video::WatchTracker;
