//! The per-frame driver.
//!
//! [`HeroAnimation`] owns the scene, the clock and the render surface, and
//! runs one frame at a time in a fixed order:
//!
//! 1. read time and delta from the clock
//! 2. particles
//! 3. arm
//! 4. cars
//! 5. camera
//! 6. one draw of the whole scene
//!
//! Everything happens on the calling thread; a frame always finishes before
//! the next one (or a resize) can start.

use crate::builder::{HeroScene, SceneBuilder};
use crate::input::Input;
use crate::render::{RenderFrame, RenderSurface};
use crate::scene::{Camera, Scene};
use crate::scheduler::FrameScheduler;
use crate::settings::HeroSettings;
use crate::utils::fps_counter::FpsCounter;
use crate::utils::time::{Clock, FrameState, TimeSource};

pub struct HeroAnimation<S: RenderSurface> {
    surface: S,
    hero: HeroScene,
    clock: Clock,
    input: Input,
    fps: FpsCounter,
    last_frame: Option<FrameState>,
}

impl<S: RenderSurface> HeroAnimation<S> {
    /// Builds the scene onto `surface`.
    ///
    /// Without a surface nothing is built and `None` is returned: the
    /// animation is simply absent.
    pub fn start(
        surface: Option<S>,
        width: u32,
        height: u32,
        settings: &HeroSettings,
        time: impl TimeSource + 'static,
    ) -> Option<Self> {
        let Some(mut surface) = surface else {
            log::warn!("No render surface available, hero animation disabled");
            return None;
        };

        if surface.size() != (width, height) && width > 0 && height > 0 {
            surface.resize(width, height);
        }

        let hero = SceneBuilder::new(settings).viewport(width, height).build();

        let mut input = Input::new();
        input.handle_resize(width, height);

        Some(Self {
            surface,
            hero,
            clock: Clock::new(time),
            input,
            fps: FpsCounter::new(),
            last_frame: None,
        })
    }

    /// Runs one complete frame and returns its timing.
    pub fn frame(&mut self) -> FrameState {
        let frame = self.clock.tick();
        let hero = &mut self.hero;

        hero.particles.update(&mut hero.registry, frame.time);
        hero.arm.update(&mut hero.scene, &frame);
        for car in &mut hero.cars {
            car.update(&mut hero.scene, &frame);
        }
        hero.camera_rig
            .update(&mut hero.camera, &self.input, frame.time, frame.dt);

        hero.scene.update_matrix_world();
        let render_frame = RenderFrame::extract(&hero.scene, &hero.camera, &hero.registry);
        self.surface.draw(&render_frame);

        if let Some(fps) = self.fps.update(frame.dt) {
            log::debug!("FPS: {fps:.1}");
        }

        self.last_frame = Some(frame);
        frame
    }

    /// Runs frames for as long as `scheduler` hands them out.
    pub fn run(&mut self, scheduler: &mut impl FrameScheduler) {
        while scheduler.next_frame() {
            self.frame();
        }
    }

    /// Applies a new viewport size: camera projection and surface only.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("Ignoring zero-sized viewport ({width}x{height})");
            return;
        }
        log::debug!("Viewport resized to {width}x{height}");

        self.hero.camera.set_aspect(width as f32 / height as f32);
        self.surface.resize(width, height);
        self.input.handle_resize(width, height);
    }

    #[inline]
    pub fn input_mut(&mut self) -> &mut Input {
        &mut self.input
    }

    #[inline]
    #[must_use]
    pub fn input(&self) -> &Input {
        &self.input
    }

    #[inline]
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[inline]
    #[must_use]
    pub fn hero(&self) -> &HeroScene {
        &self.hero
    }

    #[inline]
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.hero.scene
    }

    #[inline]
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.hero.camera
    }

    /// Timing of the most recent frame, if any has run.
    #[inline]
    #[must_use]
    pub fn last_frame(&self) -> Option<&FrameState> {
        self.last_frame.as_ref()
    }
}
