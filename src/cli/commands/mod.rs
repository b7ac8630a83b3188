use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::OrientationConfig;
use crate::http::HttpSubmissionClient;
use crate::offline::{FileQueueStore, OfflineQueue};
use crate::orientation::{guard, GuardDecision, OrientationSession, OrientationState, Step};
use crate::storage::FileStateStore;

pub mod acknowledge;
pub mod dashboard;
pub mod info;
pub mod quiz;
pub mod reset;
pub mod status;
pub mod summary;
pub mod sync;
pub mod video;

/// Everything a command needs, wired from configuration
pub struct AppContext {
    pub config: OrientationConfig,
    pub session: OrientationSession,
    pub queue: Arc<OfflineQueue>,
}

impl AppContext {
    pub async fn open(config: OrientationConfig) -> Result<Self> {
        let store = Arc::new(FileStateStore::new(config.storage.state_path()));
        let session = OrientationSession::open(store).await;

        let client = HttpSubmissionClient::new(&config.submission)
            .context("Failed to build submission client")?;
        let queue = Arc::new(OfflineQueue::new(
            Arc::new(FileQueueStore::new(config.storage.queue_path())),
            Arc::new(client),
            config.submission.max_concurrent_deliveries,
        ));

        Ok(Self {
            config,
            session,
            queue,
        })
    }
}

/// Check the guard for `step`. A redirect is printed and reported as `false`.
pub async fn admit(context: &AppContext, step: Step) -> bool {
    match context.session.enter(step).await {
        GuardDecision::Admit => true,
        GuardDecision::Redirect(to) => {
            println!("↩️  Redirecting to {to}");
            println!("   💡 {}", command_hint(to));
            false
        }
    }
}

pub fn command_hint(step: Step) -> &'static str {
    match step {
        Step::Info => "Enter your details with: safety-orientation info --help",
        Step::Video => "Report video playback with: safety-orientation video --position <seconds> | --ended",
        Step::Quiz => "Take the quiz with: safety-orientation quiz",
        Step::Acknowledgment => "Sign off with: safety-orientation acknowledge --confirm --signature <text>",
        Step::Complete => "See your summary with: safety-orientation summary",
    }
}

/// Progress indicator: one marker per step, the current one highlighted
pub fn progress_line(state: &OrientationState) -> String {
    Step::ALL
        .iter()
        .map(|step| {
            let marker = if *step < state.current_step {
                "✅"
            } else if *step == state.current_step {
                "▶️"
            } else {
                "⬜"
            };
            format!("{marker} {}. {}", step.number(), step.label())
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Default command: where the worker is and what to do next
pub async fn show_next_action(context: &AppContext) -> Result<()> {
    let state = context.session.current().await;
    let next = match guard::evaluate(&state, state.current_step) {
        GuardDecision::Admit => state.current_step,
        GuardDecision::Redirect(to) => to,
    };

    println!("🦺 Safety Orientation");
    println!();
    println!("{}", progress_line(&state));
    println!();
    match &state.worker_info {
        Some(info) => println!("👷 {} ({})", info.full_name, info.status_type.label()),
        None => println!("👷 No worker information recorded yet"),
    }
    println!("💡 {}", command_hint(next));
    Ok(())
}
