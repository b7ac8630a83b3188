use anyhow::{Context, Result};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use super::{admit, command_hint, AppContext};
use crate::offline::{SubmissionPayload, SubmitOutcome};
use crate::orientation::summary::quiz_submission;
use crate::orientation::Step;
use crate::quiz::{default_questions, shuffle, Attempt, AttemptResult};

pub struct QuizCommand;

impl QuizCommand {
    pub fn new() -> Self {
        Self
    }

    pub async fn execute(&self, context: &AppContext) -> Result<()> {
        let input = BufReader::new(tokio::io::stdin());
        self.run(context, input).await
    }

    /// Run attempts until one passes or the input ends
    pub async fn run<R: AsyncBufRead + Unpin>(&self, context: &AppContext, input: R) -> Result<()> {
        if !admit(context, Step::Quiz).await {
            return Ok(());
        }
        if context.session.current().await.quiz_passed {
            println!("✅ You have already passed the quiz.");
            println!("   💡 {}", command_hint(Step::Acknowledgment));
            return Ok(());
        }

        let mut lines = input.lines();
        loop {
            let state = context.session.start_quiz_attempt().await?;
            let mut attempt = Attempt::new(state.quiz_attempts, shuffle(&default_questions()));
            println!("📝 Safety Quiz (attempt {})", attempt.attempt_number());
            println!("   Answer every question correctly to continue. Type 't' for true, 'f' for false.");
            attempt.begin();

            while let Some(question) = attempt.current_question() {
                println!();
                println!("Question {} of {}", attempt.position() + 1, attempt.total());
                println!("{}", question.question_text);
                let Some(answer) = prompt_true_false(&mut lines).await? else {
                    println!();
                    println!("⏸️  Quiz interrupted; this attempt was not completed.");
                    return Ok(());
                };
                if let Some(feedback) = attempt.answer(answer) {
                    if feedback.correct {
                        println!("✅ Correct");
                    } else {
                        println!("❌ Incorrect");
                    }
                }
            }

            let Some(result) = attempt.result() else {
                return Ok(());
            };
            self.submit(context, &result).await?;
            context.session.record_quiz_result(&result).await?;
            print_result(&result);

            if result.passed {
                println!("   💡 {}", command_hint(Step::Acknowledgment));
                return Ok(());
            }
            print!("🔁 Try again? [y/n] ");
            std::io::stdout().flush()?;
            match lines.next_line().await? {
                Some(line) if matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes" | "") => {}
                _ => return Ok(()),
            }
        }
    }

    /// Queue the result before it is recorded, so a pass is never kept
    /// without its submission
    async fn submit(&self, context: &AppContext, result: &AttemptResult) -> Result<()> {
        let state = context.session.current().await;
        let payload = SubmissionPayload::Quiz(quiz_submission(&state, result));
        let outcome = context
            .queue
            .submit_or_enqueue(payload)
            .await
            .context("Failed to save the quiz result for submission")?;
        if let SubmitOutcome::Queued(_) = outcome {
            println!("📡 Offline: quiz result saved and will sync when you're back online.");
        }
        Ok(())
    }
}

impl Default for QuizCommand {
    fn default() -> Self {
        Self::new()
    }
}

async fn prompt_true_false<R: AsyncBufRead + Unpin>(lines: &mut Lines<R>) -> Result<Option<bool>> {
    loop {
        print!("[t/f] > ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            return Ok(None);
        };
        match line.trim().to_ascii_lowercase().as_str() {
            "t" | "true" => return Ok(Some(true)),
            "f" | "false" => return Ok(Some(false)),
            _ => println!("Please answer 't' or 'f'."),
        }
    }
}

fn print_result(result: &AttemptResult) {
    println!();
    println!("📊 Score: {}/{}", result.score, result.total);
    if result.passed {
        println!("🎉 Perfect score! You passed the safety quiz.");
        return;
    }
    println!("You need 100% to pass. Review these before trying again:");
    for missed in &result.missed {
        println!();
        println!("❌ {}", missed.question_text);
        println!(
            "   Correct answer: {}",
            if missed.correct_answer { "True" } else { "False" }
        );
        println!("   {}", missed.explanation);
    }
    println!();
}
