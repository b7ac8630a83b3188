use anyhow::Result;

use super::{admit, command_hint, AppContext};
use crate::orientation::Step;
use crate::video::{PlaybackUpdate, WatchTracker};

pub enum VideoEvent {
    Position(f64),
    Ended,
}

pub struct VideoCommand {
    pub event: VideoEvent,
}

impl VideoCommand {
    pub fn new(event: VideoEvent) -> Self {
        Self { event }
    }

    pub async fn execute(&self, context: &AppContext) -> Result<()> {
        if !admit(context, Step::Video).await {
            return Ok(());
        }

        let state = context.session.current().await;
        let video = &context.config.video;
        let mut tracker = WatchTracker::resume(
            video.duration_seconds,
            video.seek_tolerance_seconds,
            state.video_progress,
            state.video_completed,
        );

        let update = match self.event {
            VideoEvent::Ended => tracker.ended(),
            VideoEvent::Position(requested) => {
                let allowed = tracker.seek(requested);
                if allowed < requested {
                    println!(
                        "⏪ Skipping ahead is not allowed on the first viewing; resuming at {allowed:.0}s"
                    );
                }
                tracker.time_update(allowed)
            }
        };

        match update {
            PlaybackUpdate::Progress(percent) => {
                context.session.record_video_progress(percent).await?;
                println!("🎬 Video progress: {percent:.0}%");
            }
            PlaybackUpdate::Ended => {
                context.session.complete_video().await?;
                println!("✅ Safety video complete!");
                println!("   💡 {}", command_hint(Step::Quiz));
            }
        }
        Ok(())
    }
}
