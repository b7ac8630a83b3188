//! End-to-end orientation flow against the file-backed state store

use safety_orientation::orientation::guard;
use safety_orientation::orientation::summary::orientation_submission;
use safety_orientation::orientation::{CompletionSummary, WorkerInfoForm};
use safety_orientation::quiz::{default_questions, shuffle, Attempt};
use safety_orientation::storage::{FileStateStore, StateStore};
use safety_orientation::{GuardDecision, OrientationSession, SessionError, Step, TransitionError};
use chrono::Utc;
use std::sync::Arc;
use tempfile::TempDir;

fn form() -> WorkerInfoForm {
    WorkerInfoForm {
        full_name: "Sarah Williams".to_string(),
        hire_date: "2026-01-27".to_string(),
        supervisor_name: "Mike Johnson".to_string(),
        site_id: "downtown-tower".to_string(),
        status_type: "under-25-returning".to_string(),
        emergency_contact_name: "Tom Williams".to_string(),
        emergency_contact_phone: "555-0134".to_string(),
        emergency_contact_relationship: "Brother".to_string(),
    }
}

async fn open(dir: &TempDir) -> OrientationSession {
    let store = Arc::new(FileStateStore::new(dir.path().join("orientation-state.json")));
    OrientationSession::open(store).await
}

/// Answer every question of an attempt, getting `wrong` of them wrong
fn run_attempt(number: u32, wrong: usize) -> safety_orientation::AttemptResult {
    let mut attempt = Attempt::new(number, shuffle(&default_questions()));
    attempt.begin();
    let mut answered = 0;
    while let Some(question) = attempt.current_question() {
        let answer = if answered < wrong {
            !question.correct_answer
        } else {
            question.correct_answer
        };
        attempt.answer(answer);
        answered += 1;
    }
    attempt.result().expect("attempt finished")
}

#[tokio::test]
async fn test_complete_flow_survives_restarts() {
    let dir = TempDir::new().unwrap();

    {
        let session = open(&dir).await;
        assert_eq!(session.enter(Step::Video).await, GuardDecision::Redirect(Step::Info));

        session.begin_session().await.unwrap();
        session
            .record_worker_info(form().validate().unwrap())
            .await
            .unwrap();
        session.set_step(Step::Video).await.unwrap();
        session.record_video_progress(40.0).await.unwrap();
    }

    // a reload resumes where the worker left off
    {
        let session = open(&dir).await;
        let state = session.current().await;
        assert_eq!(state.current_step, Step::Video);
        assert_eq!(state.video_progress, 40.0);
        assert_eq!(session.enter(Step::Quiz).await, GuardDecision::Redirect(Step::Video));

        session.complete_video().await.unwrap();
        assert!(session.enter(Step::Quiz).await.is_admitted());
    }

    let session = open(&dir).await;
    session.start_quiz_attempt().await.unwrap();
    let failed = run_attempt(1, 1);
    assert!(!failed.passed);
    assert_eq!(failed.score, 9);
    session.record_quiz_result(&failed).await.unwrap();
    assert_eq!(session.enter(Step::Acknowledgment).await, GuardDecision::Redirect(Step::Quiz));

    session.start_quiz_attempt().await.unwrap();
    let passed = run_attempt(2, 0);
    assert!(passed.passed);
    session.record_quiz_result(&passed).await.unwrap();

    let state = session
        .sign_acknowledgment("data:image/png;base64,iVBORw0KGgo=")
        .await
        .unwrap();
    assert_eq!(state.current_step, Step::Complete);
    assert_eq!(state.quiz_attempts, 2);
    assert_eq!(guard::furthest_admissible(&state), Step::Complete);

    let summary = CompletionSummary::from_state(&state, Utc::now()).unwrap();
    assert_eq!(summary.full_name, "Sarah Williams");
    assert_eq!(summary.quiz_attempts, 2);
    assert!(orientation_submission(&state, Utc::now()).is_some());

    let reopened = open(&dir).await.current().await;
    assert_eq!(reopened, state);
}

#[tokio::test]
async fn test_signing_twice_is_rejected() {
    let dir = TempDir::new().unwrap();
    let session = open(&dir).await;
    session.begin_session().await.unwrap();
    session.record_worker_info(form().validate().unwrap()).await.unwrap();
    session.complete_video().await.unwrap();
    session.start_quiz_attempt().await.unwrap();
    session.record_quiz_pass().await.unwrap();
    session.sign_acknowledgment("first").await.unwrap();

    let second = session.sign_acknowledgment("second").await;
    assert!(matches!(
        second,
        Err(SessionError::Transition(TransitionError::AlreadySigned))
    ));
    assert_eq!(
        session.current().await.signature_data.unwrap().as_str(),
        "first"
    );
}

#[tokio::test]
async fn test_reset_purges_saved_progress() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileStateStore::new(dir.path().join("orientation-state.json")));
    let session = OrientationSession::open(store.clone()).await;
    session.begin_session().await.unwrap();
    session.record_worker_info(form().validate().unwrap()).await.unwrap();
    session.complete_video().await.unwrap();

    let mut updates = session.subscribe();
    let state = session.reset().await.unwrap();
    assert_eq!(state, Default::default());
    assert!(updates.has_changed().unwrap());
    assert_eq!(store.load().await, Default::default());

    // the next worker starts from scratch
    let fresh = open(&dir).await;
    assert_eq!(fresh.enter(Step::Quiz).await, GuardDecision::Redirect(Step::Info));
    fresh.begin_session().await.unwrap();
    fresh.record_worker_info(form().validate().unwrap()).await.unwrap();
}

#[tokio::test]
async fn test_corrupt_state_file_loads_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("orientation-state.json"), b"{\"state\": 42").unwrap();

    let session = open(&dir).await;
    assert_eq!(session.current().await, Default::default());

    // and the next save replaces the corrupt file
    session.begin_session().await.unwrap();
    assert!(open(&dir).await.current().await.session_id.is_some());
}

#[tokio::test]
async fn test_exhausted_revision_counter_starts_over() {
    let dir = TempDir::new().unwrap();
    let slot = serde_json::json!({
        "schemaVersion": 1,
        "revision": u64::MAX,
        "savedAt": Utc::now(),
        "savedBy": "tablet-3",
        "state": serde_json::to_value(safety_orientation::OrientationState::default()).unwrap(),
    });
    std::fs::write(dir.path().join("orientation-state.json"), slot.to_string()).unwrap();

    let session = open(&dir).await;
    session.begin_session().await.unwrap();
    session.record_worker_info(form().validate().unwrap()).await.unwrap();

    let store = FileStateStore::new(dir.path().join("orientation-state.json"));
    let snapshot = store.load_snapshot().await;
    assert_eq!(snapshot.revision, 2);
    assert!(snapshot.state.worker_info.is_some());
}
