use anyhow::Result;
use chrono::Utc;

use super::{admit, AppContext};
use crate::orientation::summary::NEXT_STEPS;
use crate::orientation::{CompletionSummary, Step};

pub struct SummaryCommand;

impl SummaryCommand {
    pub async fn execute(&self, context: &AppContext) -> Result<()> {
        if !admit(context, Step::Complete).await {
            return Ok(());
        }
        let state = context.session.current().await;
        let Some(summary) = CompletionSummary::from_state(&state, Utc::now()) else {
            return Ok(());
        };

        println!("🎉 Orientation Complete!");
        println!("You have successfully completed the safety orientation.");
        println!();
        println!("   Name:          {}", summary.full_name);
        println!("   Hire date:     {}", summary.hire_date);
        println!("   Supervisor:    {}", summary.supervisor_name);
        println!("   Site:          {}", summary.site_id);
        println!("   Status:        {}", summary.status_type.label());
        println!("   Quiz attempts: {}", summary.quiz_attempts);
        if let Some(session_id) = &summary.session_id {
            println!("   Reference:     {session_id}");
        }
        println!();
        println!("Next steps:");
        for (n, step) in NEXT_STEPS.iter().enumerate() {
            println!("   {}. {step}", n + 1);
        }
        Ok(())
    }
}
