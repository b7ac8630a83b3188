use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{OrientationState, WorkerStatus};
use crate::offline::{OrientationSubmission, QuizSubmission};
use crate::quiz::AttemptResult;

/// What the completion screen shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionSummary {
    pub session_id: Option<String>,
    pub full_name: String,
    pub hire_date: String,
    pub supervisor_name: String,
    pub site_id: String,
    pub status_type: WorkerStatus,
    pub quiz_attempts: u32,
    pub completed_at: DateTime<Utc>,
}

pub const NEXT_STEPS: [&str; 4] = [
    "Complete your onboarding paperwork in SiteDocs",
    "Report to your supervisor for job site assignment",
    "Collect your required PPE",
    "Begin work safely!",
];

impl CompletionSummary {
    /// `None` unless every step of the flow has been completed
    pub fn from_state(state: &OrientationState, completed_at: DateTime<Utc>) -> Option<Self> {
        if !state.is_complete() {
            return None;
        }
        let info = state.worker_info.as_ref()?;
        Some(Self {
            session_id: state.session_id.clone(),
            full_name: info.full_name.clone(),
            hire_date: info.hire_date.clone(),
            supervisor_name: info.supervisor_name.clone(),
            site_id: info.site_id.clone(),
            status_type: info.status_type,
            quiz_attempts: state.quiz_attempts,
            completed_at,
        })
    }
}

/// Build the submission sent once the acknowledgment is signed
pub fn orientation_submission(
    state: &OrientationState,
    completed_at: DateTime<Utc>,
) -> Option<OrientationSubmission> {
    if !state.is_complete() {
        return None;
    }
    Some(OrientationSubmission {
        session_id: state.session_id.clone(),
        worker_info: state.worker_info.clone()?,
        quiz_attempts: state.quiz_attempts,
        signature_data: state.signature_data.as_ref()?.as_str().to_string(),
        completed_at,
    })
}

/// Build the submission recorded for a finished quiz attempt
pub fn quiz_submission(state: &OrientationState, result: &AttemptResult) -> QuizSubmission {
    QuizSubmission {
        session_id: state.session_id.clone(),
        attempt_number: result.attempt_number,
        score: result.score,
        total: result.total,
        passed: result.passed,
        answered_at: Utc::now(),
    }
}
