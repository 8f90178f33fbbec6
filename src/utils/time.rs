//! Frame clock.
//!
//! The [`Clock`] is read exactly once per frame and yields both the absolute
//! scene time (for oscillators) and the frame delta (for phase timers and
//! movement). Where the time comes from is a [`TimeSource`], so tests can
//! substitute [`ManualTime`] and step virtual time deterministically.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use web_time::Instant;

/// A monotonic time source. Returned values never decrease.
pub trait TimeSource {
    /// Time elapsed since an arbitrary, fixed origin.
    fn now(&self) -> Duration;
}

/// Wall-clock monotonic time backed by `Instant`.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicTime {
    origin: Instant,
}

impl MonotonicTime {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Virtual time that only moves when told to.
///
/// Clones share the same underlying counter, so a test can keep one handle
/// and give another to the [`Clock`].
#[derive(Debug, Clone, Default)]
pub struct ManualTime {
    now: Rc<Cell<Duration>>,
}

impl ManualTime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward by `step`.
    pub fn advance(&self, step: Duration) {
        self.now.set(self.now.get() + step);
    }

    /// Moves time forward by `seconds` (negative or NaN values are ignored).
    pub fn advance_secs(&self, seconds: f32) {
        if let Ok(step) = Duration::try_from_secs_f32(seconds) {
            self.advance(step);
        }
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Per-frame timing information.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    /// Total elapsed time since the clock was created (in seconds).
    pub time: f32,
    /// Delta time since the previous tick (in seconds).
    pub dt: f32,
    /// Number of ticks so far, including this one.
    pub frame_count: u64,
}

/// Process-wide frame clock. Created once at scene start, never reset.
pub struct Clock {
    source: Box<dyn TimeSource>,
    start: Duration,
    last_update: Duration,
    /// Time since last tick
    pub delta: Duration,
    /// Total elapsed time since creation
    pub elapsed: Duration,
    /// Total number of ticks
    pub frame_count: u64,
}

impl Clock {
    /// Creates a clock whose zero is the source's current time.
    pub fn new(source: impl TimeSource + 'static) -> Self {
        let now = source.now();
        Self {
            source: Box::new(source),
            start: now,
            last_update: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Reads the source once and returns this frame's timing.
    pub fn tick(&mut self) -> FrameState {
        // A misbehaving source must not make time run backwards.
        let now = self.source.now().max(self.last_update);
        self.delta = now - self.last_update;
        self.elapsed = now - self.start;
        self.last_update = now;
        self.frame_count += 1;

        FrameState {
            time: self.elapsed.as_secs_f32(),
            dt: self.delta.as_secs_f32(),
            frame_count: self.frame_count,
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(MonotonicTime::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_reports_time_and_delta() {
        let time = ManualTime::new();
        let mut clock = Clock::new(time.clone());

        time.advance(Duration::from_millis(250));
        let first = clock.tick();
        assert!((first.dt - 0.25).abs() < 1e-6);
        assert!((first.time - 0.25).abs() < 1e-6);
        assert_eq!(first.frame_count, 1);

        time.advance(Duration::from_millis(500));
        let second = clock.tick();
        assert!((second.dt - 0.5).abs() < 1e-6);
        assert!((second.time - 0.75).abs() < 1e-6);
        assert_eq!(second.frame_count, 2);
    }

    #[test]
    fn tick_without_progress_has_zero_delta() {
        let time = ManualTime::new();
        let mut clock = Clock::new(time.clone());
        clock.tick();
        let frame = clock.tick();
        assert_eq!(frame.dt, 0.0);
    }

    #[test]
    fn negative_advance_is_ignored() {
        let time = ManualTime::new();
        time.advance_secs(1.0);
        time.advance_secs(-3.0);
        assert_eq!(time.now(), Duration::from_secs(1));
    }
}
