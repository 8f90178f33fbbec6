//! Winit Application Runner
//!
//! Opens a window, builds a [`WgpuSurface`] on it and drives a
//! [`HeroAnimation`] from the event loop: one frame per `RedrawRequested`,
//! with the next redraw requested as the frame finishes.
//!
//! If the GPU surface cannot be created the window stays open but nothing
//! is built or drawn.
//!
//! # Example
//!
//! ```rust,ignore
//! use hero_scene::app::App;
//!
//! fn main() -> hero_scene::errors::Result<()> {
//!     App::new().with_title("Robotics Club").run()
//! }
//! ```

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::driver::HeroAnimation;
use crate::errors::Result;
use crate::render::WgpuSurface;
use crate::settings::HeroSettings;
use crate::utils::time::MonotonicTime;

pub mod input_adapter;

/// Application builder.
pub struct App {
    title: String,
    settings: HeroSettings,
    width: f64,
    height: f64,
}

impl App {
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: "Hero Scene".into(),
            settings: HeroSettings::default(),
            width: 1280.0,
            height: 720.0,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: HeroSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Initial window size in logical pixels.
    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Runs the event loop until the window is closed.
    pub fn run(self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut runner = AppRunner::new(self);
        event_loop.run_app(&mut runner)?;
        Ok(())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

struct AppRunner {
    app: App,
    window: Option<Arc<Window>>,
    animation: Option<HeroAnimation<WgpuSurface>>,
}

impl AppRunner {
    fn new(app: App) -> Self {
        Self {
            app,
            window: None,
            animation: None,
        }
    }
}

impl ApplicationHandler for AppRunner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title(&self.app.title)
            .with_inner_size(winit::dpi::LogicalSize::new(self.app.width, self.app.height));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        log::info!("Initializing Renderer Backend...");

        let size = window.inner_size();
        let surface = match pollster::block_on(WgpuSurface::new(
            window.clone(),
            size.width,
            size.height,
            &self.app.settings.render,
        )) {
            Ok(surface) => Some(surface),
            Err(e) => {
                log::error!("Renderer unavailable: {e}");
                None
            }
        };

        self.animation = HeroAnimation::start(
            surface,
            size.width,
            size.height,
            &self.app.settings,
            MonotonicTime::new(),
        );

        if self.animation.is_some() {
            window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if let WindowEvent::CloseRequested = event {
            event_loop.exit();
            return;
        }

        let Some(animation) = &mut self.animation else {
            return;
        };

        input_adapter::process_window_event(animation.input_mut(), &event);

        match event {
            WindowEvent::Resized(size) => {
                animation.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                animation.frame();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.animation.is_some()
            && let Some(window) = &self.window
        {
            window.request_redraw();
        }
    }
}
