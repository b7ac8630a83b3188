// Orientation transitions
//
// Every operation is a pure function from the current state to the next
// one. Callers replace the whole state with the result and persist it, so a
// rejected transition leaves nothing half-applied.

use chrono::Utc;
use rand::Rng;
use thiserror::Error;

use super::types::{OrientationState, SignatureData, Step, WorkerInfo};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Worker info is incomplete: missing {fields:?}")]
    IncompleteWorkerInfo { fields: Vec<&'static str> },
    #[error("Worker info was already recorded for session {session_id:?}")]
    WorkerInfoAlreadyRecorded { session_id: Option<String> },
    #[error("Precondition violated for {operation}: {requirement}")]
    PreconditionViolated {
        operation: &'static str,
        requirement: &'static str,
    },
    #[error("Signature payload is empty")]
    EmptySignature,
    #[error("Acknowledgment has already been signed")]
    AlreadySigned,
}

const SESSION_SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a `{prefix}_{unix millis}_{9 base36 chars}` identifier
pub fn generate_id(prefix: &str) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..9)
        .map(|_| SESSION_SUFFIX_ALPHABET[rng.random_range(0..SESSION_SUFFIX_ALPHABET.len())] as char)
        .collect();
    format!("{}_{}_{}", prefix, Utc::now().timestamp_millis(), suffix)
}

pub fn generate_session_id() -> String {
    generate_id("session")
}

/// Start a new session id; nothing else changes
pub fn begin_session(state: &OrientationState) -> OrientationState {
    OrientationState {
        session_id: Some(generate_session_id()),
        ..state.clone()
    }
}

/// Store validated worker info. The current step is left to the caller.
pub fn record_worker_info(
    state: &OrientationState,
    info: WorkerInfo,
) -> Result<OrientationState, TransitionError> {
    let missing = info.missing_fields();
    if !missing.is_empty() {
        return Err(TransitionError::IncompleteWorkerInfo { fields: missing });
    }
    if state.worker_info.is_some() {
        return Err(TransitionError::WorkerInfoAlreadyRecorded {
            session_id: state.session_id.clone(),
        });
    }
    Ok(OrientationState {
        worker_info: Some(info),
        ..state.clone()
    })
}

/// Record a playback percentage, clamped to [0, 100].
///
/// Rewinding is accepted. Once the video is complete the progress stays at 100.
pub fn record_video_progress(state: &OrientationState, percent: f64) -> OrientationState {
    let video_progress = if state.video_completed {
        100.0
    } else if percent.is_nan() {
        state.video_progress
    } else {
        percent.clamp(0.0, 100.0)
    };
    OrientationState {
        video_progress,
        ..state.clone()
    }
}

pub fn complete_video(state: &OrientationState) -> OrientationState {
    OrientationState {
        video_completed: true,
        video_progress: 100.0,
        current_step: state.current_step.max(Step::Quiz),
        ..state.clone()
    }
}

/// Count one more quiz attempt; attempts are never rolled back
pub fn start_quiz_attempt(state: &OrientationState) -> OrientationState {
    OrientationState {
        quiz_attempts: state.quiz_attempts.saturating_add(1),
        ..state.clone()
    }
}

pub fn record_quiz_pass(state: &OrientationState) -> Result<OrientationState, TransitionError> {
    if !state.video_completed {
        return Err(TransitionError::PreconditionViolated {
            operation: "record_quiz_pass",
            requirement: "video must be completed",
        });
    }
    Ok(OrientationState {
        quiz_passed: true,
        current_step: state.current_step.max(Step::Acknowledgment),
        ..state.clone()
    })
}

pub fn sign_acknowledgment(
    state: &OrientationState,
    signature: &str,
) -> Result<OrientationState, TransitionError> {
    if !state.quiz_passed {
        return Err(TransitionError::PreconditionViolated {
            operation: "sign_acknowledgment",
            requirement: "quiz must be passed",
        });
    }
    if state.acknowledgment_signed {
        return Err(TransitionError::AlreadySigned);
    }
    let signature = SignatureData::new(signature).ok_or(TransitionError::EmptySignature)?;
    Ok(OrientationState {
        acknowledgment_signed: true,
        signature_data: Some(signature),
        current_step: Step::Complete,
        ..state.clone()
    })
}

/// Administrative step override used when resuming; admission is the guard's job
pub fn set_step(state: &OrientationState, step: Step) -> OrientationState {
    OrientationState {
        current_step: step,
        ..state.clone()
    }
}

pub fn reset() -> OrientationState {
    OrientationState::default()
}
