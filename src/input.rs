use glam::Vec2;

/// Input state handed to the controllers each frame.
///
/// This is a plain value: whoever owns the window writes into it, and the
/// frame update passes a shared reference to the controllers that care
/// (currently only the camera rig).
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Input {
    /// Cursor position in window pixels.
    pub cursor_position: Vec2,
    /// Window size in pixels.
    pub screen_size: Vec2,
    /// Whether the cursor is inside the window.
    pub cursor_inside: bool,
}

impl Input {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.screen_size = Vec2::new(width as f32, height as f32);
    }

    pub fn handle_cursor_move(&mut self, x: f64, y: f64) {
        self.cursor_position = Vec2::new(x as f32, y as f32);
        self.cursor_inside = true;
    }

    pub fn handle_cursor_left(&mut self) {
        self.cursor_inside = false;
    }

    /// Cursor position mapped to `[-1, 1]` on both axes, +Y up, with the
    /// window centre at zero. Zero when the cursor is outside or the window
    /// has no area.
    #[must_use]
    pub fn pointer(&self) -> Vec2 {
        if !self.cursor_inside || self.screen_size.x <= 0.0 || self.screen_size.y <= 0.0 {
            return Vec2::ZERO;
        }
        let uv = self.cursor_position / self.screen_size;
        Vec2::new(uv.x * 2.0 - 1.0, 1.0 - uv.y * 2.0).clamp(Vec2::NEG_ONE, Vec2::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_is_centered_and_y_up() {
        let mut input = Input::new();
        input.handle_resize(800, 600);

        input.handle_cursor_move(400.0, 300.0);
        assert!(input.pointer().length() < 1e-6);

        input.handle_cursor_move(800.0, 0.0);
        assert!((input.pointer() - Vec2::new(1.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn pointer_zero_when_outside_or_unsized() {
        let mut input = Input::new();
        input.handle_cursor_move(10.0, 10.0);
        assert_eq!(input.pointer(), Vec2::ZERO);

        input.handle_resize(100, 100);
        input.handle_cursor_left();
        assert_eq!(input.pointer(), Vec2::ZERO);
    }
}
