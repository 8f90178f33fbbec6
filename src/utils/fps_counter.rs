/// Averages frame deltas into a frames-per-second figure once per second.
///
/// Fed from [`FrameState::dt`](crate::utils::time::FrameState) rather than
/// reading a clock of its own, so it works under virtual time too.
pub struct FpsCounter {
    frame_count: u32,
    accumulated_time: f32,
    pub current_fps: f32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsCounter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            accumulated_time: 0.0,
            current_fps: 0.0,
        }
    }

    /// Records one frame. Returns the new average when a full second has
    /// accumulated.
    pub fn update(&mut self, dt: f32) -> Option<f32> {
        self.frame_count += 1;
        self.accumulated_time += dt.max(0.0);

        if self.accumulated_time >= 1.0 {
            self.current_fps = self.frame_count as f32 / self.accumulated_time;
            self.frame_count = 0;
            self.accumulated_time = 0.0;
            return Some(self.current_fps);
        }
        None
    }
}
