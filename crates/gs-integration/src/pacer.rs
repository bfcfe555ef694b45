//! Frame pacing
//!
//! The UI repaints on its own schedule; the pacer tells it how many emulated
//! frames are owed at each repaint so the game runs at the configured rate.

use gs_core::FpsTarget;
use std::time::{Duration, Instant};

/// Frames run per repaint when there is no rate limit
const UNLIMITED_BATCH: u32 = 4;

/// Catch-up limit after a stall (window drag, debugger break)
const MAX_CATCH_UP: u32 = 4;

/// Deadline-based frame pacer
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Option<Duration>,
    next_deadline: Option<Instant>,
}

impl FramePacer {
    pub fn new(target: FpsTarget) -> Self {
        Self {
            interval: target.frame_interval(),
            next_deadline: None,
        }
    }

    pub fn set_target(&mut self, target: FpsTarget) {
        self.interval = target.frame_interval();
        self.next_deadline = None;
    }

    /// Forget the schedule, e.g. after a pause
    pub fn reset(&mut self) {
        self.next_deadline = None;
    }

    /// Number of frames to emulate now
    pub fn frames_due(&mut self, now: Instant) -> u32 {
        let Some(interval) = self.interval else {
            return UNLIMITED_BATCH;
        };

        let Some(mut deadline) = self.next_deadline else {
            self.next_deadline = Some(now + interval);
            return 1;
        };

        let mut due = 0;
        while deadline <= now && due < MAX_CATCH_UP {
            deadline += interval;
            due += 1;
        }
        if deadline <= now {
            tracing::debug!("Frame pacer fell behind, resyncing");
            deadline = now + interval;
        }
        self.next_deadline = Some(deadline);
        due
    }

    /// How long the UI may sleep before the next frame is due
    pub fn time_until_next(&self, now: Instant) -> Duration {
        match (self.interval, self.next_deadline) {
            (Some(_), Some(deadline)) => deadline.saturating_duration_since(now),
            _ => Duration::ZERO,
        }
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new(FpsTarget::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_call_runs_one_frame() {
        let mut pacer = FramePacer::new(FpsTarget::Fps(60));
        let start = Instant::now();
        assert_eq!(pacer.frames_due(start), 1);
        assert_eq!(pacer.frames_due(start), 0);
        assert!(pacer.time_until_next(start) > Duration::ZERO);
    }

    #[test]
    fn test_frames_follow_target_rate() {
        let mut pacer = FramePacer::new(FpsTarget::Fps(30));
        let start = Instant::now();
        pacer.frames_due(start);

        let interval = Duration::from_secs_f64(1.0 / 30.0);
        let mut total = 0;
        for step in 1..=6 {
            total += pacer.frames_due(start + interval * step + Duration::from_micros(10));
        }
        assert_eq!(total, 6);
    }

    #[test]
    fn test_catch_up_is_bounded() {
        let mut pacer = FramePacer::new(FpsTarget::Fps(60));
        let start = Instant::now();
        pacer.frames_due(start);

        let later = start + Duration::from_secs(2);
        assert_eq!(pacer.frames_due(later), MAX_CATCH_UP);
        assert_eq!(pacer.frames_due(later), 0);
    }

    #[test]
    fn test_unlimited_runs_batches() {
        let mut pacer = FramePacer::new(FpsTarget::Unlimited);
        let now = Instant::now();
        assert_eq!(pacer.frames_due(now), UNLIMITED_BATCH);
        assert_eq!(pacer.time_until_next(now), Duration::ZERO);
    }

    #[test]
    fn test_retarget_restarts_schedule() {
        let mut pacer = FramePacer::new(FpsTarget::Fps(15));
        let start = Instant::now();
        pacer.frames_due(start);
        assert_eq!(pacer.frames_due(start), 0);

        pacer.set_target(FpsTarget::Fps(120));
        assert_eq!(pacer.frames_due(start), 1);
    }
}
