use anyhow::{anyhow, Result};
use chrono::Utc;

use super::AppContext;
use crate::dashboard::{
    filter, record_from_state, CompletionRecord, CompletionSource, DashboardSummary,
    HttpCompletionSource, MockCompletionSource, StatusFilter,
};

pub struct DashboardCommand {
    pub search: String,
    pub status: String,
    pub remote: bool,
}

impl DashboardCommand {
    pub async fn execute(&self, context: &AppContext) -> Result<()> {
        let status: StatusFilter = self.status.parse().map_err(|e: String| anyhow!(e))?;

        let mut records = if self.remote {
            HttpCompletionSource::new(&context.config.submission)?
                .records()
                .await?
        } else {
            MockCompletionSource.records().await?
        };
        let state = context.session.current().await;
        if let Some(local) = record_from_state(&state, state.is_complete().then(Utc::now)) {
            if !records.iter().any(|r| r.id == local.id) {
                records.push(local);
            }
        }

        let summary = DashboardSummary::of(&records);
        println!("🛡️  ORIENTATION DASHBOARD");
        println!("=========================");
        println!(
            "   Total: {}   ✅ Completed: {}   ⏳ In progress: {}",
            summary.total, summary.completed, summary.in_progress
        );
        println!();

        let shown = filter(&records, &self.search, status);
        if shown.is_empty() {
            println!("No orientations found");
            return Ok(());
        }
        println!(
            "{:<20} {:<12} {:<16} {:<20} {:>8}  {:<17} {}",
            "Worker", "Hire date", "Supervisor", "Site", "Attempts", "Completed", "Status"
        );
        for record in shown {
            print_row(record);
        }
        Ok(())
    }
}

fn print_row(record: &CompletionRecord) {
    println!(
        "{:<20} {:<12} {:<16} {:<20} {:>8}  {:<17} {}",
        record.worker_name,
        record.hire_date,
        record.supervisor,
        record.site,
        record.quiz_attempts,
        record.completed_at.as_deref().unwrap_or("-"),
        record.status
    );
}
