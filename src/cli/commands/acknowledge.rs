use anyhow::{bail, Context, Result};
use chrono::Utc;
use std::path::PathBuf;
use tracing::warn;

use super::{admit, command_hint, AppContext};
use crate::offline::{SubmissionPayload, SubmitOutcome};
use crate::orientation::state_machine;
use crate::orientation::summary::orientation_submission;
use crate::orientation::{AcknowledgmentReview, Step, SAFETY_TOPICS};

pub enum SignatureSource {
    Inline(String),
    File(PathBuf),
}

pub struct AcknowledgeCommand {
    pub confirm: bool,
    pub signature: SignatureSource,
}

impl AcknowledgeCommand {
    pub fn new(confirm: bool, signature: SignatureSource) -> Self {
        Self { confirm, signature }
    }

    pub async fn execute(&self, context: &AppContext) -> Result<()> {
        if !admit(context, Step::Acknowledgment).await {
            return Ok(());
        }

        println!("📋 Safety Orientation Acknowledgment");
        println!("I confirm I have been trained on and understand:");
        for topic in SAFETY_TOPICS {
            println!("   • {topic}");
        }
        println!();

        // the full list is printed above, so it has been shown to the end
        let mut review = AcknowledgmentReview::new();
        review.mark_read();
        if self.confirm {
            review.confirm();
        }
        if !review.can_sign() {
            println!("⚠️  Re-run with --confirm once you have read and understood every topic.");
            bail!("acknowledgment not confirmed");
        }

        let signature = match &self.signature {
            SignatureSource::Inline(text) => text.clone(),
            SignatureSource::File(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read signature from {}", path.display()))?,
        };
        match sign_and_submit(context, signature.trim()).await? {
            SubmitOutcome::Delivered(_) => println!("📤 Orientation submitted."),
            SubmitOutcome::Queued(_) => {
                println!("📡 Offline: your orientation was saved and will sync when you're back online.")
            }
        }

        println!("✅ Acknowledgment signed.");
        println!("   💡 {}", command_hint(Step::Complete));
        Ok(())
    }
}

/// Sign the acknowledgment with its submission already queued.
///
/// The payload is staged before the signature is persisted: if staging fails
/// nothing is signed and the worker can retry, and once signed the payload
/// stays queued until the endpoint confirms it.
async fn sign_and_submit(context: &AppContext, signature: &str) -> Result<SubmitOutcome> {
    let signed = state_machine::sign_acknowledgment(&context.session.current().await, signature)?;
    let payload = orientation_submission(&signed, Utc::now())
        .context("Signed orientation is missing details needed for submission")?;
    let staged = context
        .queue
        .stage(SubmissionPayload::Orientation(payload))
        .await
        .context("Failed to save the orientation submission; the acknowledgment was not signed")?;

    if let Err(e) = context.session.sign_acknowledgment(signature).await {
        if let Err(remove_err) = context.queue.remove(&staged.id).await {
            warn!(submission_id = %staged.id, error = %remove_err, "Unsigned submission left in queue");
        }
        return Err(e.into());
    }
    Ok(context.queue.deliver_staged(&staged).await)
}
