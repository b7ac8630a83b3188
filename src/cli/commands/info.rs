use anyhow::{bail, Result};
use tracing::info;

use super::{command_hint, AppContext};
use crate::orientation::{Step, WorkerInfoForm};

pub struct InfoCommand {
    pub form: WorkerInfoForm,
}

impl InfoCommand {
    pub fn new(form: WorkerInfoForm) -> Self {
        Self { form }
    }

    pub async fn execute(&self, context: &AppContext) -> Result<()> {
        let worker_info = match self.form.validate() {
            Ok(worker_info) => worker_info,
            Err(errors) => {
                println!("❌ Please correct the following:");
                for (field, message) in &errors.0 {
                    println!("   • {field}: {message}");
                }
                bail!("worker information is incomplete");
            }
        };

        let current = context.session.current().await;
        if current.worker_info.is_some() {
            println!("⚠️  Worker information is already on file for this orientation.");
            println!("   💡 Run 'safety-orientation reset' to start over for a different worker.");
            bail!("worker information already recorded");
        }

        if current.session_id.is_none() {
            context.session.begin_session().await?;
        }
        let state = context.session.record_worker_info(worker_info).await?;
        let state = context.session.set_step(state.current_step.max(Step::Video)).await?;
        info!(session_id = ?state.session_id, "Worker information recorded");

        println!("✅ Thanks, {}! Your information has been saved.", self.form.full_name.trim());
        println!("   💡 {}", command_hint(Step::Video));
        Ok(())
    }
}
