use anyhow::Result;

use super::{progress_line, AppContext};
use crate::orientation::{guard, GuardDecision, Step};

pub struct StatusCommand;

impl StatusCommand {
    pub async fn execute(&self, context: &AppContext) -> Result<()> {
        let state = context.session.current().await;

        println!("🦺 ORIENTATION STATUS");
        println!("=====================");
        println!("{}", progress_line(&state));
        println!();
        println!(
            "   Session:         {}",
            state.session_id.as_deref().unwrap_or("(not started)")
        );
        match &state.worker_info {
            Some(info) => println!("   Worker:          {} / {}", info.full_name, info.status_type.label()),
            None => println!("   Worker:          (not recorded)"),
        }
        println!(
            "   Video:           {:.0}%{}",
            state.video_progress,
            if state.video_completed { " (complete)" } else { "" }
        );
        println!(
            "   Quiz:            {} after {} attempt(s)",
            if state.quiz_passed { "passed" } else { "not passed" },
            state.quiz_attempts
        );
        println!(
            "   Acknowledgment:  {}",
            if state.acknowledgment_signed { "signed" } else { "not signed" }
        );
        println!();

        println!("🔒 STEP ACCESS:");
        for step in Step::ALL {
            match guard::evaluate(&state, step) {
                GuardDecision::Admit => println!("   🟢 {:<15} open", step.as_str()),
                GuardDecision::Redirect(to) => {
                    println!("   🔴 {:<15} redirects to {to}", step.as_str())
                }
            }
        }
        println!();

        match context.queue.list_pending().await {
            Ok(pending) if pending.is_empty() => println!("📭 No submissions waiting to sync"),
            Ok(pending) => println!("📬 {} submission(s) waiting to sync", pending.len()),
            Err(e) => println!("❌ Failed to read pending submissions: {e}"),
        }
        Ok(())
    }
}
