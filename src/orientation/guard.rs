use serde::{Deserialize, Serialize};

use super::types::{OrientationState, Step};

/// Result of checking whether a step screen may be entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuardDecision {
    Admit,
    Redirect(Step),
}

impl GuardDecision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, GuardDecision::Admit)
    }
}

/// Entry predicate for `target`.
///
/// Prerequisites are checked in flow order so the worker is sent to the
/// earliest missing step, not merely the one before `target`.
pub fn evaluate(state: &OrientationState, target: Step) -> GuardDecision {
    let prerequisites = [
        (Step::Video, state.worker_info.is_some(), Step::Info),
        (Step::Quiz, state.video_completed, Step::Video),
        (Step::Acknowledgment, state.quiz_passed, Step::Quiz),
        (Step::Complete, state.acknowledgment_signed, Step::Acknowledgment),
    ];

    prerequisites
        .into_iter()
        .take_while(|(gated_from, _, _)| *gated_from <= target)
        .find(|(_, satisfied, _)| !satisfied)
        .map(|(_, _, missing)| GuardDecision::Redirect(missing))
        .unwrap_or(GuardDecision::Admit)
}

/// The furthest step the worker may currently enter
pub fn furthest_admissible(state: &OrientationState) -> Step {
    Step::ALL
        .into_iter()
        .rev()
        .find(|step| evaluate(state, *step).is_admitted())
        .unwrap_or(Step::Info)
}
