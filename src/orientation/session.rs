use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info};

use super::guard::{self, GuardDecision};
use super::state_machine::{self, TransitionError};
use super::types::{OrientationState, Step, WorkerInfo};
use crate::quiz::AttemptResult;
use crate::storage::{Snapshot, StateStore, StoreError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("Failed to persist orientation state: {0}")]
    Store(#[from] StoreError),
}

/// Owner of one worker's orientation state.
///
/// Screens receive a reference to the session instead of reaching for a
/// global. Each operation computes the next state, saves it, and only then
/// makes it visible through [`current`](Self::current) and the update
/// channel. The state lock is held across the save, so a later action can
/// never be persisted before an earlier one.
pub struct OrientationSession {
    store: Arc<dyn StateStore>,
    current: Mutex<Snapshot>,
    updates: watch::Sender<OrientationState>,
}

impl OrientationSession {
    /// Resume from whatever the store holds (defaults if nothing usable)
    pub async fn open(store: Arc<dyn StateStore>) -> Self {
        let snapshot = store.load_snapshot().await;
        info!(
            session_id = ?snapshot.state.session_id,
            step = %snapshot.state.current_step,
            revision = snapshot.revision,
            "Orientation session opened"
        );
        let (updates, _) = watch::channel(snapshot.state.clone());
        Self {
            store,
            current: Mutex::new(snapshot),
            updates,
        }
    }

    pub async fn current(&self) -> OrientationState {
        self.current.lock().await.state.clone()
    }

    /// Receive every state that has been successfully persisted
    pub fn subscribe(&self) -> watch::Receiver<OrientationState> {
        self.updates.subscribe()
    }

    /// Run the step guard against the current state
    pub async fn enter(&self, step: Step) -> GuardDecision {
        let decision = guard::evaluate(&self.current.lock().await.state, step);
        if let GuardDecision::Redirect(to) = decision {
            debug!(requested = %step, redirect = %to, "Step guard redirected");
        }
        decision
    }

    async fn apply<F>(&self, operation: &'static str, transition: F) -> Result<OrientationState, SessionError>
    where
        F: FnOnce(&OrientationState) -> Result<OrientationState, TransitionError>,
    {
        let mut current = self.current.lock().await;
        let next = transition(&current.state)?;
        let snapshot = current.successor(next)?;
        self.store.save(&snapshot).await?;

        debug!(
            operation,
            revision = snapshot.revision,
            step = %snapshot.state.current_step,
            "Orientation transition applied"
        );
        self.updates.send_replace(snapshot.state.clone());
        let state = snapshot.state.clone();
        *current = snapshot;
        Ok(state)
    }

    pub async fn begin_session(&self) -> Result<OrientationState, SessionError> {
        let state = self
            .apply("begin_session", |s| Ok(state_machine::begin_session(s)))
            .await?;
        info!(session_id = ?state.session_id, "Orientation session started");
        Ok(state)
    }

    pub async fn record_worker_info(&self, info: WorkerInfo) -> Result<OrientationState, SessionError> {
        self.apply("record_worker_info", |s| state_machine::record_worker_info(s, info))
            .await
    }

    pub async fn record_video_progress(&self, percent: f64) -> Result<OrientationState, SessionError> {
        self.apply("record_video_progress", |s| {
            Ok(state_machine::record_video_progress(s, percent))
        })
        .await
    }

    pub async fn complete_video(&self) -> Result<OrientationState, SessionError> {
        let state = self
            .apply("complete_video", |s| Ok(state_machine::complete_video(s)))
            .await?;
        info!(session_id = ?state.session_id, "Orientation video completed");
        Ok(state)
    }

    pub async fn start_quiz_attempt(&self) -> Result<OrientationState, SessionError> {
        self.apply("start_quiz_attempt", |s| Ok(state_machine::start_quiz_attempt(s)))
            .await
    }

    pub async fn record_quiz_pass(&self) -> Result<OrientationState, SessionError> {
        let state = self.apply("record_quiz_pass", state_machine::record_quiz_pass).await?;
        info!(
            session_id = ?state.session_id,
            attempts = state.quiz_attempts,
            "Quiz passed"
        );
        Ok(state)
    }

    /// Apply the outcome of a finished attempt. A failed attempt changes nothing.
    pub async fn record_quiz_result(&self, result: &AttemptResult) -> Result<OrientationState, SessionError> {
        if result.passed {
            self.record_quiz_pass().await
        } else {
            info!(score = result.score, total = result.total, "Quiz attempt failed");
            Ok(self.current().await)
        }
    }

    pub async fn sign_acknowledgment(&self, signature: &str) -> Result<OrientationState, SessionError> {
        let state = self
            .apply("sign_acknowledgment", |s| state_machine::sign_acknowledgment(s, signature))
            .await?;
        info!(session_id = ?state.session_id, "Acknowledgment signed");
        Ok(state)
    }

    pub async fn set_step(&self, step: Step) -> Result<OrientationState, SessionError> {
        self.apply("set_step", |s| Ok(state_machine::set_step(s, step))).await
    }

    /// Restore defaults and purge the storage slot
    pub async fn reset(&self) -> Result<OrientationState, SessionError> {
        let mut current = self.current.lock().await;
        self.store.clear().await?;
        let previous = current.state.session_id.clone();
        // the revision counter is not rewound, so a save racing the reset
        // from another handle on the slot is still ordered after it
        current.state = state_machine::reset();
        self.updates.send_replace(current.state.clone());
        info!(previous_session = ?previous, "Orientation reset");
        Ok(current.state.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::types::WorkerStatus;
    use crate::storage::MemoryStateStore;

    fn sample_info() -> WorkerInfo {
        WorkerInfo {
            full_name: "John Smith".to_string(),
            hire_date: "2026-01-28".to_string(),
            supervisor_name: "Mike Johnson".to_string(),
            site_id: "milestone".to_string(),
            status_type: WorkerStatus::NewToPosition,
            emergency_contact_name: "Mary Smith".to_string(),
            emergency_contact_phone: "555-0111".to_string(),
            emergency_contact_relationship: "Spouse".to_string(),
        }
    }

    #[tokio::test]
    async fn test_every_transition_is_persisted_before_it_is_visible() {
        let store = Arc::new(MemoryStateStore::new());
        let session = OrientationSession::open(store.clone()).await;

        session.begin_session().await.unwrap();
        let state = session.record_worker_info(sample_info()).await.unwrap();

        assert_eq!(store.load().await, state);
        assert_eq!(session.current().await, state);
        assert_eq!(store.load_snapshot().await.revision, 2);
    }

    #[tokio::test]
    async fn test_rejected_transition_leaves_store_untouched() {
        let store = Arc::new(MemoryStateStore::new());
        let session = OrientationSession::open(store.clone()).await;

        let err = session.record_quiz_pass().await.unwrap_err();
        assert!(matches!(err, SessionError::Transition(TransitionError::PreconditionViolated { .. })));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let session = OrientationSession::open(Arc::new(MemoryStateStore::new())).await;
        let mut updates = session.subscribe();

        session.complete_video().await.unwrap();

        updates.changed().await.unwrap();
        assert!(updates.borrow().video_completed);
    }

    #[tokio::test]
    async fn test_reopened_session_resumes_from_last_transition() {
        let store = Arc::new(MemoryStateStore::new());
        {
            let session = OrientationSession::open(store.clone()).await;
            session.record_worker_info(sample_info()).await.unwrap();
            session.set_step(Step::Video).await.unwrap();
            session.record_video_progress(35.0).await.unwrap();
        }

        let resumed = OrientationSession::open(store).await;
        let state = resumed.current().await;
        assert_eq!(state.current_step, Step::Video);
        assert_eq!(state.video_progress, 35.0);
        assert_eq!(resumed.enter(Step::Quiz).await, GuardDecision::Redirect(Step::Video));
    }

    #[tokio::test]
    async fn test_exhausted_revision_is_an_error_not_a_panic() {
        let store = Arc::new(MemoryStateStore::new());
        store.save(&Snapshot::new(u64::MAX, OrientationState::default())).await.unwrap();
        let session = OrientationSession::open(store.clone()).await;

        let err = session.begin_session().await.unwrap_err();
        assert!(matches!(err, SessionError::Store(StoreError::RevisionExhausted(u64::MAX))));
        assert_eq!(session.current().await, OrientationState::default());
    }

    #[tokio::test]
    async fn test_reset_purges_store_and_allows_new_session() {
        let store = Arc::new(MemoryStateStore::new());
        let session = OrientationSession::open(store.clone()).await;
        session.record_worker_info(sample_info()).await.unwrap();
        session.complete_video().await.unwrap();

        let state = session.reset().await.unwrap();
        assert_eq!(state, OrientationState::default());
        assert!(store.is_empty().await);

        // the next save still succeeds after the purge
        session.record_worker_info(sample_info()).await.unwrap();
        assert!(store.load().await.worker_info.is_some());
    }
}
