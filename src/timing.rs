//! Frame pacing: converts a target frame rate into tick-by-tick due-ness.
//!
//! Each sketch owns one [`FramePacer`]. The scheduler offers every host
//! tick to every sketch; the pacer decides which of those opportunities
//! become frames, and keeps the realized frames-per-second measurement.

use log::warn;

/// Milliseconds, as reported by the host clock.
pub type Millis = u64;

/// Decides when a sketch's next frame is due.
///
/// The pacer converts a frames-per-second target into a minimum interval
/// between frames. When a frame fires late, the fire point snaps forward by
/// whole multiples of the interval instead of re-basing at the current
/// time, so a brief stall does not permanently shift the frame phase
/// (catch-up snapping).
#[derive(Debug, Clone)]
pub struct FramePacer {
    /// Minimum milliseconds between frames, always > 0.
    interval: f64,
    /// Timestamp the last frame fired at, snapped to the frame phase.
    last_fire: f64,
    /// Frames fired since the current wall-clock second began.
    frames: u32,
    /// Frame count of the previous full second.
    realized_fps: u32,
    /// Which wall-clock second `frames` is counting.
    second_mark: u64,
}

const FALLBACK_FPS: f64 = 30.0;

impl FramePacer {
    /// Creates a pacer targeting `fps`, based at `now`.
    pub fn new(fps: f64, now: Millis) -> Self {
        let mut pacer = Self {
            interval: 1000.0 / FALLBACK_FPS,
            last_fire: now as f64,
            frames: 0,
            realized_fps: 0,
            second_mark: now / 1000,
        };
        pacer.set_rate(fps);
        pacer
    }

    /// Retargets the pacer to `fps` immediately.
    ///
    /// In-flight elapsed time is not rescaled; the new interval simply
    /// applies from the last fire point onward. Non-positive rates are
    /// rejected with a warning and the previous target is kept.
    pub fn set_rate(&mut self, fps: f64) {
        if fps > 0.0 && fps.is_finite() {
            self.interval = 1000.0 / fps;
        } else {
            warn!("frame rate must be positive, keeping {:.1} fps", 1000.0 / self.interval);
        }
    }

    /// Re-bases pacing at `now`, as if a frame had just fired.
    pub fn reset(&mut self, now: Millis) {
        self.last_fire = now as f64;
    }

    /// Returns true when a frame is due, advancing the fire point.
    ///
    /// The fire point advances by `elapsed - (elapsed % interval)`, i.e. by
    /// whole intervals only. Also feeds the realized-FPS counter: every
    /// wall-clock second the count is snapshotted and reset.
    pub fn is_due(&mut self, now: Millis) -> bool {
        let elapsed = now as f64 - self.last_fire;
        if elapsed < self.interval {
            return false;
        }

        self.frames += 1;
        let second = now / 1000;
        if second != self.second_mark {
            self.realized_fps = self.frames;
            self.frames = 0;
            self.second_mark = second;
        }

        self.last_fire = now as f64 - (elapsed % self.interval);
        true
    }

    /// Frames fired during the previous full second.
    ///
    /// Reads 0 until the first second of frames has completed.
    pub fn realized_fps(&self) -> u32 {
        self.realized_fps
    }

    /// The current minimum inter-frame interval in milliseconds.
    pub fn interval_ms(&self) -> f64 {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Runs the pacer over a 1ms-resolution clock, returning fire times.
    fn fires(pacer: &mut FramePacer, from: Millis, to: Millis) -> Vec<Millis> {
        (from..=to).filter(|&t| pacer.is_due(t)).collect()
    }

    #[test]
    fn fires_at_the_target_rate() {
        let mut pacer = FramePacer::new(50.0, 0);
        let fired = fires(&mut pacer, 1, 1000);
        assert_eq!(fired.len(), 50);
    }

    #[test]
    fn never_fires_twice_within_one_interval() {
        let mut pacer = FramePacer::new(25.0, 0);
        let fired = fires(&mut pacer, 1, 2000);
        for pair in fired.windows(2) {
            assert!(pair[1] - pair[0] >= 40, "fired {}ms apart", pair[1] - pair[0]);
        }
    }

    #[test]
    fn stall_does_not_shift_the_frame_phase() {
        let mut pacer = FramePacer::new(100.0, 0);
        let before = fires(&mut pacer, 1, 100);
        assert!(before.iter().all(|t| t % 10 == 0));

        // The host stalls for a while, then ticks resume.
        assert!(pacer.is_due(237));
        let after = fires(&mut pacer, 238, 300);

        // Catch-up snapping keeps later fires on the original 10ms grid, so
        // the drift versus an uninterrupted clock stays under one interval.
        assert_eq!(after, vec![240, 250, 260, 270, 280, 290, 300]);
    }

    #[test]
    fn realized_fps_snapshots_once_per_second() {
        let mut pacer = FramePacer::new(40.0, 0);
        assert_eq!(pacer.realized_fps(), 0);

        fires(&mut pacer, 1, 1000);
        assert_eq!(pacer.realized_fps(), 40);

        fires(&mut pacer, 1001, 2000);
        assert_eq!(pacer.realized_fps(), 40);
    }

    #[test]
    fn retarget_applies_immediately() {
        let mut pacer = FramePacer::new(10.0, 0);
        assert!(pacer.is_due(100));

        pacer.set_rate(2.0);
        assert!(!pacer.is_due(400));
        assert!(pacer.is_due(600));
    }

    #[test]
    fn rejects_non_positive_rates() {
        let mut pacer = FramePacer::new(10.0, 0);
        pacer.set_rate(0.0);
        assert_eq!(pacer.interval_ms(), 100.0);
        pacer.set_rate(-5.0);
        assert_eq!(pacer.interval_ms(), 100.0);
    }
}
