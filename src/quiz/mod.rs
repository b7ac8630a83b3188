// Quiz: fixed question bank, per-attempt shuffle, and the attempt state machine

pub mod attempt;
pub mod bank;
pub mod shuffle;

pub use attempt::{AnswerFeedback, AnsweredQuestion, Attempt, AttemptPhase, AttemptResult, MissedQuestion};
pub use bank::{default_questions, Question};
pub use shuffle::{shuffle, shuffle_with};
