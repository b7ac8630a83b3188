// Orientation flow: data model, pure transitions, step guard, and the
// session object that persists every transition.

pub mod acknowledgment;
pub mod guard;
pub mod session;
pub mod state_machine;
pub mod summary;
pub mod types;

pub use acknowledgment::{AcknowledgmentReview, SAFETY_TOPICS};
pub use guard::GuardDecision;
pub use session::{OrientationSession, SessionError};
pub use state_machine::TransitionError;
pub use summary::CompletionSummary;
pub use types::{
    FieldErrors, OrientationState, SignatureData, Step, WorkerInfo, WorkerInfoForm, WorkerStatus,
};
