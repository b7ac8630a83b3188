use anyhow::Result;

use super::{command_hint, AppContext};
use crate::orientation::Step;

pub struct ResetCommand;

impl ResetCommand {
    /// Pending submissions are kept; they belong to work already done
    pub async fn execute(&self, context: &AppContext) -> Result<()> {
        context.session.reset().await?;
        println!("🔄 Orientation progress cleared.");
        println!("   💡 {}", command_hint(Step::Info));
        Ok(())
    }
}
