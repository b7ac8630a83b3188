// One run through the shuffled question set.
//
// intro -> answering -> results. A finished attempt is never reopened: a
// retry is a new `Attempt` with a fresh shuffle and a new attempt number.

use serde::{Deserialize, Serialize};
use statig::prelude::*;

use super::bank::Question;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizEvent {
    Begin,
    Answer(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptPhase {
    Intro,
    Answering,
    Results,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub question_id: u32,
    pub answer: bool,
    pub correct: bool,
}

/// Immediate feedback for one answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub question_id: u32,
    pub correct: bool,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissedQuestion {
    pub question_id: u32,
    pub question_text: String,
    pub correct_answer: bool,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptResult {
    pub attempt_number: u32,
    pub score: usize,
    pub total: usize,
    /// Only a perfect score passes
    pub passed: bool,
    pub missed: Vec<MissedQuestion>,
}

/// Context of the attempt state machine
#[derive(Debug)]
pub struct QuizAttempt {
    attempt_number: u32,
    questions: Vec<Question>,
    answers: Vec<AnsweredQuestion>,
    phase: AttemptPhase,
}

impl QuizAttempt {
    fn new(attempt_number: u32, questions: Vec<Question>) -> Self {
        Self {
            attempt_number,
            questions,
            answers: Vec::new(),
            phase: AttemptPhase::Intro,
        }
    }

    fn record_answer(&mut self, answer: bool) -> bool {
        let Some(question) = self.questions.get(self.answers.len()) else {
            return false;
        };
        let correct = answer == question.correct_answer;
        tracing::debug!(
            attempt = self.attempt_number,
            question_id = question.id,
            correct,
            "Quiz answer recorded"
        );
        self.answers.push(AnsweredQuestion {
            question_id: question.id,
            answer,
            correct,
        });
        true
    }

    fn all_answered(&self) -> bool {
        self.answers.len() >= self.questions.len()
    }
}

#[state_machine(initial = "State::intro()")]
impl QuizAttempt {
    #[state]
    fn intro(&mut self, event: &QuizEvent) -> Outcome<State> {
        match event {
            QuizEvent::Begin if !self.questions.is_empty() => {
                self.phase = AttemptPhase::Answering;
                tracing::info!(
                    attempt = self.attempt_number,
                    questions = self.questions.len(),
                    "Quiz attempt started"
                );
                Transition(State::answering())
            }
            _ => Handled,
        }
    }

    #[state]
    fn answering(&mut self, event: &QuizEvent) -> Outcome<State> {
        match event {
            QuizEvent::Answer(answer) => {
                self.record_answer(*answer);
                if self.all_answered() {
                    self.phase = AttemptPhase::Results;
                    Transition(State::results())
                } else {
                    Handled
                }
            }
            _ => Handled,
        }
    }

    #[state]
    fn results(&mut self, event: &QuizEvent) -> Outcome<State> {
        tracing::trace!(attempt = self.attempt_number, ?event, "Attempt already graded, event ignored");
        Handled
    }
}

/// Driver for a single quiz attempt
pub struct Attempt {
    machine: StateMachine<QuizAttempt>,
}

impl Attempt {
    /// `questions` should already be shuffled for this attempt
    pub fn new(attempt_number: u32, questions: Vec<Question>) -> Self {
        Self {
            machine: QuizAttempt::new(attempt_number, questions).state_machine(),
        }
    }

    pub fn begin(&mut self) {
        self.machine.handle(&QuizEvent::Begin);
    }

    pub fn phase(&self) -> AttemptPhase {
        self.machine.inner().phase
    }

    pub fn attempt_number(&self) -> u32 {
        self.machine.inner().attempt_number
    }

    pub fn total(&self) -> usize {
        self.machine.inner().questions.len()
    }

    /// Zero-based index of the question awaiting an answer
    pub fn position(&self) -> usize {
        self.machine.inner().answers.len()
    }

    pub fn current_question(&self) -> Option<&Question> {
        let context = self.machine.inner();
        if context.phase != AttemptPhase::Answering {
            return None;
        }
        context.questions.get(context.answers.len())
    }

    /// Answer the current question. Returns `None` outside the answering phase.
    pub fn answer(&mut self, answer: bool) -> Option<AnswerFeedback> {
        let question = self.current_question()?.clone();
        self.machine.handle(&QuizEvent::Answer(answer));
        let recorded = self.machine.inner().answers.last()?;
        Some(AnswerFeedback {
            question_id: question.id,
            correct: recorded.correct,
            explanation: question.explanation,
        })
    }

    pub fn answers(&self) -> &[AnsweredQuestion] {
        &self.machine.inner().answers
    }

    /// Grade the attempt once every question has been answered
    pub fn result(&self) -> Option<AttemptResult> {
        let context = self.machine.inner();
        if context.phase != AttemptPhase::Results {
            return None;
        }
        let missed: Vec<MissedQuestion> = context
            .answers
            .iter()
            .zip(&context.questions)
            .filter(|(answered, _)| !answered.correct)
            .map(|(_, question)| MissedQuestion {
                question_id: question.id,
                question_text: question.question_text.clone(),
                correct_answer: question.correct_answer,
                explanation: question.explanation.clone(),
            })
            .collect();
        let total = context.questions.len();
        let score = total - missed.len();
        Some(AttemptResult {
            attempt_number: context.attempt_number,
            score,
            total,
            passed: missed.is_empty() && total > 0,
            missed,
        })
    }
}
