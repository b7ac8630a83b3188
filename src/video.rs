/// Playback tracker for the orientation video.
///
/// Until the video has been watched to the end once, seeking is limited to
/// the furthest point already reached plus a small tolerance; anything
/// further is pulled back. After one full viewing the worker may seek freely.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchTracker {
    duration: f64,
    seek_tolerance: f64,
    position: f64,
    max_watched: f64,
    watched_once: bool,
}

/// What the player should do after a time update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackUpdate {
    Progress(f64),
    Ended,
}

pub const DEFAULT_SEEK_TOLERANCE_SECONDS: f64 = 2.0;

impl WatchTracker {
    pub fn new(duration: f64, seek_tolerance: f64) -> Self {
        Self {
            duration: duration.max(0.0),
            seek_tolerance: seek_tolerance.max(0.0),
            position: 0.0,
            max_watched: 0.0,
            watched_once: false,
        }
    }

    /// Rebuild a tracker from persisted progress so a reload does not unlock skipping
    pub fn resume(duration: f64, seek_tolerance: f64, progress_percent: f64, completed: bool) -> Self {
        let mut tracker = Self::new(duration, seek_tolerance);
        let reached = tracker.duration * progress_percent.clamp(0.0, 100.0) / 100.0;
        tracker.position = reached;
        tracker.max_watched = reached;
        tracker.watched_once = completed;
        tracker
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn max_watched(&self) -> f64 {
        self.max_watched
    }

    pub fn watched_once(&self) -> bool {
        self.watched_once
    }

    pub fn progress_percent(&self) -> f64 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (self.position / self.duration * 100.0).clamp(0.0, 100.0)
    }

    /// Request a jump to `target`; returns the position actually allowed
    pub fn seek(&mut self, target: f64) -> f64 {
        let target = target.clamp(0.0, self.duration);
        let allowed = if !self.watched_once && target > self.max_watched + self.seek_tolerance {
            tracing::debug!(target, max_watched = self.max_watched, "Seek ahead blocked");
            self.max_watched
        } else {
            target
        };
        self.position = allowed;
        allowed
    }

    /// Regular playback advanced to `time`
    pub fn time_update(&mut self, time: f64) -> PlaybackUpdate {
        let time = time.clamp(0.0, self.duration);
        self.position = time;
        if time > self.max_watched {
            self.max_watched = time;
        }
        if self.duration > 0.0 && time >= self.duration {
            return self.ended();
        }
        PlaybackUpdate::Progress(self.progress_percent())
    }

    pub fn ended(&mut self) -> PlaybackUpdate {
        self.position = self.duration;
        self.max_watched = self.duration;
        self.watched_once = true;
        PlaybackUpdate::Ended
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_updates_report_progress() {
        let mut tracker = WatchTracker::new(200.0, DEFAULT_SEEK_TOLERANCE_SECONDS);
        assert_eq!(tracker.time_update(50.0), PlaybackUpdate::Progress(25.0));
        assert_eq!(tracker.max_watched(), 50.0);
    }

    #[test]
    fn test_seek_ahead_is_pulled_back_on_first_viewing() {
        let mut tracker = WatchTracker::new(200.0, DEFAULT_SEEK_TOLERANCE_SECONDS);
        tracker.time_update(30.0);

        assert_eq!(tracker.seek(31.5), 31.5);
        assert_eq!(tracker.seek(120.0), 30.0);
        // rewinding is always allowed
        assert_eq!(tracker.seek(5.0), 5.0);
        assert_eq!(tracker.max_watched(), 30.0);
    }

    #[test]
    fn test_free_seeking_after_watching_once() {
        let mut tracker = WatchTracker::new(60.0, DEFAULT_SEEK_TOLERANCE_SECONDS);
        assert_eq!(tracker.time_update(60.0), PlaybackUpdate::Ended);
        assert!(tracker.watched_once());
        assert_eq!(tracker.seek(10.0), 10.0);
        assert_eq!(tracker.seek(55.0), 55.0);
    }

    #[test]
    fn test_resume_restores_reached_position() {
        let mut tracker = WatchTracker::resume(600.0, 2.0, 50.0, false);
        assert_eq!(tracker.max_watched(), 300.0);
        assert_eq!(tracker.seek(400.0), 300.0);

        let mut finished = WatchTracker::resume(600.0, 2.0, 100.0, true);
        assert_eq!(finished.seek(590.0), 590.0);
    }
}
