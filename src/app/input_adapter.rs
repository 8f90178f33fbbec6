//! Winit input adapter
//!
//! Translates the winit events the scene cares about into [`Input`].

use winit::event::WindowEvent;

use crate::input::Input;

/// Feeds one winit window event into `input`.
pub fn process_window_event(input: &mut Input, event: &WindowEvent) {
    match event {
        WindowEvent::CursorMoved { position, .. } => {
            input.handle_cursor_move(position.x, position.y);
        }

        WindowEvent::CursorLeft { .. } => {
            input.handle_cursor_left();
        }

        WindowEvent::Resized(size) => {
            input.handle_resize(size.width, size.height);
        }

        _ => {}
    }
}
