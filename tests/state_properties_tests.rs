//! Property tests over arbitrary sequences of orientation operations

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use safety_orientation::orientation::{guard, state_machine};
use safety_orientation::quiz::{default_questions, shuffle_with};
use safety_orientation::{OrientationState, Step, WorkerInfo, WorkerStatus};

#[derive(Debug, Clone)]
enum Op {
    Begin,
    RecordInfo,
    Progress(f64),
    CompleteVideo,
    StartAttempt,
    PassQuiz,
    Sign,
    SetStep(usize),
    Reset,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Begin),
        Just(Op::RecordInfo),
        (-50.0f64..150.0).prop_map(Op::Progress),
        Just(Op::CompleteVideo),
        Just(Op::StartAttempt),
        Just(Op::PassQuiz),
        Just(Op::Sign),
        (0usize..5).prop_map(Op::SetStep),
        Just(Op::Reset),
    ]
}

fn info() -> WorkerInfo {
    WorkerInfo {
        full_name: "Lisa Chen".to_string(),
        hire_date: "2026-02-02".to_string(),
        supervisor_name: "Mike Johnson".to_string(),
        site_id: "default".to_string(),
        status_type: WorkerStatus::AffectedByHazardChanges,
        emergency_contact_name: "Wei Chen".to_string(),
        emergency_contact_phone: "555-0190".to_string(),
        emergency_contact_relationship: "Parent".to_string(),
    }
}

/// Apply an operation the way the screens do: only after the guard admits
/// the step the operation belongs to
fn apply(state: &OrientationState, op: &Op) -> OrientationState {
    let admitted = |step| guard::evaluate(state, step).is_admitted();
    match op {
        Op::Begin => state_machine::begin_session(state),
        Op::RecordInfo => state_machine::record_worker_info(state, info()).unwrap_or_else(|_| state.clone()),
        Op::Progress(p) if admitted(Step::Video) => state_machine::record_video_progress(state, *p),
        Op::CompleteVideo if admitted(Step::Video) => state_machine::complete_video(state),
        Op::StartAttempt if admitted(Step::Quiz) => state_machine::start_quiz_attempt(state),
        Op::PassQuiz if admitted(Step::Quiz) => {
            state_machine::record_quiz_pass(state).unwrap_or_else(|_| state.clone())
        }
        Op::Sign if admitted(Step::Acknowledgment) => {
            state_machine::sign_acknowledgment(state, "signed").unwrap_or_else(|_| state.clone())
        }
        Op::SetStep(n) => state_machine::set_step(state, Step::ALL[*n]),
        Op::Reset => state_machine::reset(),
        _ => state.clone(),
    }
}

proptest! {
    #[test]
    fn guarded_operations_keep_the_completion_chain(ops in prop::collection::vec(op(), 0..60)) {
        let mut state = OrientationState::default();
        for op in &ops {
            state = apply(&state, op);
            prop_assert!(state.check_invariants().is_ok(), "{:?} after {:?}", state, op);
            prop_assert!((0.0..=100.0).contains(&state.video_progress));
            if state.acknowledgment_signed {
                prop_assert!(state.quiz_passed && state.video_completed && state.worker_info.is_some());
            }
        }
    }

    #[test]
    fn attempts_count_every_started_attempt(n in 0u32..40) {
        let mut state = state_machine::complete_video(&OrientationState {
            worker_info: Some(info()),
            ..OrientationState::default()
        });
        for _ in 0..n {
            state = state_machine::start_quiz_attempt(&state);
        }
        prop_assert_eq!(state.quiz_attempts, n);
    }

    #[test]
    fn shuffle_is_a_permutation(seed in any::<u64>()) {
        let questions = default_questions();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut ids: Vec<u32> = shuffle_with(&questions, &mut rng).iter().map(|q| q.id).collect();
        ids.sort_unstable();
        let expected: Vec<u32> = (1..=10).collect();
        prop_assert_eq!(ids, expected);
    }
}
