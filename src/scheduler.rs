//! Frame scheduling.
//!
//! The driver never decides when a frame happens; a [`FrameScheduler`] does.
//! In a window that is the event loop's redraw request. In tests it is a
//! [`VirtualScheduler`] that steps a [`ManualTime`] by a fixed amount before
//! every frame, so runs are exactly reproducible.

use std::time::Duration;

use crate::utils::time::ManualTime;

/// Decides when the next frame runs.
pub trait FrameScheduler {
    /// Waits until the next frame is due. Returns `false` once the schedule
    /// is exhausted and no further frames should run.
    fn next_frame(&mut self) -> bool;
}

/// Fixed-step virtual time for deterministic runs.
#[derive(Debug, Clone)]
pub struct VirtualScheduler {
    time: ManualTime,
    step: Duration,
    remaining: u64,
    frames_run: u64,
}

impl VirtualScheduler {
    /// Runs `frames` frames, advancing `time` by `step` before each one.
    #[must_use]
    pub fn new(time: ManualTime, step: Duration, frames: u64) -> Self {
        Self {
            time,
            step,
            remaining: frames,
            frames_run: 0,
        }
    }

    /// Same as [`new`](Self::new) with a step of `1 / fps` seconds.
    #[must_use]
    pub fn at_fps(time: ManualTime, fps: u32, frames: u64) -> Self {
        let step = Duration::from_secs(1) / fps.max(1);
        Self::new(time, step, frames)
    }

    #[must_use]
    pub fn step(&self) -> Duration {
        self.step
    }

    #[must_use]
    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }

    /// Queues `frames` more frames.
    pub fn extend(&mut self, frames: u64) {
        self.remaining += frames;
    }
}

impl FrameScheduler for VirtualScheduler {
    fn next_frame(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.frames_run += 1;
        self.time.advance(self.step);
        true
    }
}
