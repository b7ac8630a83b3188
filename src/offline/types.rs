use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::orientation::state_machine::generate_id;
use crate::orientation::WorkerInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionKind {
    Orientation,
    Quiz,
}

impl SubmissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionKind::Orientation => "orientation",
            SubmissionKind::Quiz => "quiz",
        }
    }
}

impl fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A completed orientation, sent once the acknowledgment is signed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrientationSubmission {
    pub session_id: Option<String>,
    pub worker_info: WorkerInfo,
    pub quiz_attempts: u32,
    pub signature_data: String,
    pub completed_at: DateTime<Utc>,
}

/// The outcome of one quiz attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSubmission {
    pub session_id: Option<String>,
    pub attempt_number: u32,
    pub score: usize,
    pub total: usize,
    pub passed: bool,
    pub answered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum SubmissionPayload {
    Orientation(OrientationSubmission),
    Quiz(QuizSubmission),
}

impl SubmissionPayload {
    pub fn kind(&self) -> SubmissionKind {
        match self {
            SubmissionPayload::Orientation(_) => SubmissionKind::Orientation,
            SubmissionPayload::Quiz(_) => SubmissionKind::Quiz,
        }
    }
}

/// A payload awaiting confirmed delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSubmission {
    pub id: String,
    pub payload: SubmissionPayload,
    pub created_at: DateTime<Utc>,
}

impl PendingSubmission {
    /// Wrap a payload with a fresh `{kind}_{millis}_{suffix}` id
    pub fn new(payload: SubmissionPayload) -> Self {
        Self {
            id: generate_id(payload.kind().as_str()),
            payload,
            created_at: Utc::now(),
        }
    }

    pub fn kind(&self) -> SubmissionKind {
        self.payload.kind()
    }
}
