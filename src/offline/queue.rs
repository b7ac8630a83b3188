use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::store::QueueStore;
use super::types::{PendingSubmission, SubmissionPayload};
use super::QueueError;
use crate::http::SubmissionClient;

/// Result of an immediate submission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Delivered(String),
    Queued(String),
}

impl SubmitOutcome {
    pub fn id(&self) -> &str {
        match self {
            SubmitOutcome::Delivered(id) | SubmitOutcome::Queued(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDelivery {
    pub id: String,
    pub reason: String,
}

/// What one pass over the queue achieved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub delivered: Vec<String>,
    pub failed: Vec<FailedDelivery>,
}

impl DrainReport {
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }
}

/// Durable queue of submissions with at-least-once delivery.
///
/// An entry leaves the queue only after the endpoint confirmed it. Entries
/// that fail stay queued, untouched, for the next drain.
pub struct OfflineQueue {
    store: Arc<dyn QueueStore>,
    client: Arc<dyn SubmissionClient>,
    max_concurrent: usize,
    drain_lock: Mutex<()>,
}

impl OfflineQueue {
    pub fn new(
        store: Arc<dyn QueueStore>,
        client: Arc<dyn SubmissionClient>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            store,
            client,
            max_concurrent: max_concurrent.max(1),
            drain_lock: Mutex::new(()),
        }
    }

    /// Persist a payload for later delivery, returning its id
    pub async fn enqueue(&self, payload: SubmissionPayload) -> Result<String, QueueError> {
        let submission = PendingSubmission::new(payload);
        self.store.put(&submission).await?;
        info!(submission_id = %submission.id, kind = %submission.kind(), "Submission queued");
        Ok(submission.id)
    }

    pub async fn list_pending(&self) -> Result<Vec<PendingSubmission>, QueueError> {
        let mut pending = self.store.list().await?;
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(pending)
    }

    /// Removing an id that is not queued is a no-op
    pub async fn remove(&self, id: &str) -> Result<(), QueueError> {
        self.store.delete(id).await
    }

    pub async fn is_online(&self) -> bool {
        self.client.is_reachable().await
    }

    /// Persist a payload ahead of delivery and hand back the queued entry.
    ///
    /// Once this returns the payload is on the queue store; only a confirmed
    /// delivery removes it.
    pub async fn stage(&self, payload: SubmissionPayload) -> Result<PendingSubmission, QueueError> {
        let submission = PendingSubmission::new(payload);
        self.store.put(&submission).await?;
        debug!(submission_id = %submission.id, kind = %submission.kind(), "Submission staged");
        Ok(submission)
    }

    /// One delivery attempt for a staged entry, removing it when confirmed
    pub async fn deliver_staged(&self, submission: &PendingSubmission) -> SubmitOutcome {
        let id = submission.id.clone();
        if let Err(e) = self.client.deliver(submission).await {
            warn!(submission_id = %id, error = %e, "Delivery failed, keeping submission for later sync");
            return SubmitOutcome::Queued(id);
        }
        if let Err(e) = self.store.delete(&id).await {
            warn!(submission_id = %id, error = %e, "Delivered submission could not be removed");
            return SubmitOutcome::Queued(id);
        }
        info!(submission_id = %id, kind = %submission.kind(), "Submission delivered");
        SubmitOutcome::Delivered(id)
    }

    /// Stage the payload, then try to deliver it right away.
    ///
    /// The id is fixed before the first attempt so a delivery that reached
    /// the server but was not confirmed is replayed under the same
    /// idempotency key.
    pub async fn submit_or_enqueue(
        &self,
        payload: SubmissionPayload,
    ) -> Result<SubmitOutcome, QueueError> {
        let submission = self.stage(payload).await?;
        Ok(self.deliver_staged(&submission).await)
    }

    /// Deliver every queued entry, removing the ones the endpoint accepted.
    ///
    /// Only one drain runs at a time; a second caller waits for the first
    /// to finish and then sees what is left.
    #[instrument(skip(self))]
    pub async fn drain(&self) -> Result<DrainReport, QueueError> {
        let _guard = self.drain_lock.lock().await;

        let pending = self.list_pending().await?;
        if pending.is_empty() {
            debug!("No pending submissions to sync");
            return Ok(DrainReport::default());
        }
        info!(pending = pending.len(), "Syncing pending submissions");

        let outcomes: Vec<Result<String, FailedDelivery>> = stream::iter(pending)
            .map(|submission| self.deliver_one(submission))
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        let mut report = DrainReport::default();
        for outcome in outcomes {
            match outcome {
                Ok(id) => report.delivered.push(id),
                Err(failed) => report.failed.push(failed),
            }
        }
        report.delivered.sort();

        info!(
            delivered = report.delivered.len(),
            failed = report.failed.len(),
            "Sync pass finished"
        );
        Ok(report)
    }

    async fn deliver_one(&self, submission: PendingSubmission) -> Result<String, FailedDelivery> {
        if let Err(e) = self.client.deliver(&submission).await {
            warn!(submission_id = %submission.id, error = %e, "Pending submission not delivered");
            return Err(FailedDelivery {
                id: submission.id,
                reason: e.to_string(),
            });
        }
        if let Err(e) = self.store.delete(&submission.id).await {
            // delivered but still on disk: the next drain resends it
            warn!(submission_id = %submission.id, error = %e, "Delivered submission could not be removed");
            return Err(FailedDelivery {
                id: submission.id,
                reason: format!("delivered but not removed: {e}"),
            });
        }
        debug!(submission_id = %submission.id, "Pending submission delivered");
        Ok(submission.id)
    }
}
