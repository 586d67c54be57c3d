use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Tick {
    pub should_sweep: bool,

    /// Whole frames that elapsed since the previous tick. More than one means
    /// the loop fell behind; the skipped frames are folded into one sweep.
    pub frames_elapsed: u32,
}

/// Paces the indicator sweep at a fixed rate
#[derive(Debug)]
pub struct FrameClock {
    fps: f32,
    frame_count: u64,
    dropped_frames: u64,
    last_tick: Instant,
    accumulator: Duration,
    intervals: VecDeque<Duration>,
    max_intervals: usize,
}

impl FrameClock {
    pub fn new(fps: f32) -> Self {
        Self::with_start(fps, Instant::now())
    }

    pub fn with_start(fps: f32, now: Instant) -> Self {
        Self {
            fps: fps.max(1.0),
            frame_count: 0,
            dropped_frames: 0,
            last_tick: now,
            accumulator: Duration::ZERO,
            intervals: VecDeque::new(),
            max_intervals: 90,
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Frames that elapsed without a sweep of their own
    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.fps)
    }

    pub fn next_deadline(&self) -> Instant {
        let remaining = self
            .frame_duration()
            .checked_sub(self.accumulator)
            .unwrap_or_default();
        self.last_tick + remaining
    }

    /// Sweeps per second over the recent window
    pub fn average_fps(&self) -> f32 {
        if self.intervals.is_empty() {
            return 0.0;
        }

        let sum: Duration = self.intervals.iter().copied().sum();
        let avg = sum / self.intervals.len() as u32;

        if avg.is_zero() {
            return 0.0;
        }

        1.0 / avg.as_secs_f32()
    }

    pub fn tick(&mut self, now: Instant) -> Tick {
        let elapsed = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        self.accumulator += elapsed;

        let frame_duration = self.frame_duration();
        let mut frames = 0u32;

        while self.accumulator >= frame_duration {
            self.accumulator -= frame_duration;
            frames += 1;
        }

        if frames == 0 {
            return Tick::default();
        }

        self.frame_count += 1;
        self.dropped_frames += u64::from(frames - 1);
        self.record_interval(elapsed);

        Tick {
            should_sweep: true,
            frames_elapsed: frames,
        }
    }

    fn record_interval(&mut self, interval: Duration) {
        self.intervals.push_back(interval);
        if self.intervals.len() > self.max_intervals {
            self.intervals.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweeps_on_full_interval() {
        let start = Instant::now();
        let mut clock = FrameClock::with_start(60.0, start);

        let half = start + clock.frame_duration() / 2;
        assert_eq!(clock.tick(half), Tick::default());

        let full = half + clock.frame_duration() / 2;
        let tick = clock.tick(full);
        assert!(tick.should_sweep);
        assert_eq!(tick.frames_elapsed, 1);
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn test_lagging_frames_fold_into_one_sweep() {
        let start = Instant::now();
        let mut clock = FrameClock::with_start(30.0, start);
        let now = start + clock.frame_duration() * 3;

        let tick = clock.tick(now);
        assert!(tick.should_sweep);
        assert_eq!(tick.frames_elapsed, 3);
        assert_eq!(clock.frame_count(), 1);
        assert_eq!(clock.dropped_frames(), 2);
    }

    #[test]
    fn test_next_deadline_accounts_for_partial_frame() {
        let start = Instant::now();
        let mut clock = FrameClock::with_start(10.0, start);
        assert_eq!(clock.next_deadline(), start + clock.frame_duration());

        let partial = start + Duration::from_millis(40);
        clock.tick(partial);
        let remaining = clock.frame_duration() - Duration::from_millis(40);
        assert_eq!(clock.next_deadline(), partial + remaining);
    }

    #[test]
    fn test_rate_is_clamped() {
        let clock = FrameClock::new(0.0);
        assert_eq!(clock.fps(), 1.0);
        assert_eq!(clock.average_fps(), 0.0);
    }
}
