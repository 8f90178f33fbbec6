//! Utility Module
//!
//! - [`time`]: frame clock and injectable time sources
//! - [`FpsCounter`]: frame rate measurement
//! - [`math`]: frame-rate independent easing and heading helpers

pub mod fps_counter;
pub mod math;
pub mod time;

pub use fps_counter::FpsCounter;
pub use time::{Clock, FrameState, ManualTime, MonotonicTime, TimeSource};
