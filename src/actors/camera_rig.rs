//! The orbiting camera.
//!
//! The camera circles the scene slowly and leans toward the pointer. Both
//! motions are eased with [`frame_blend`], so the result does not depend on
//! the frame rate.

use glam::{Vec2, Vec3};

use crate::input::Input;
use crate::scene::camera::Camera;
use crate::settings::CameraSettings;
use crate::utils::math::frame_blend;

/// Slow orbit around the scene.
///
/// The camera chases a point moving on a horizontal circle, offset by the
/// pointer for a little parallax, and always looks at `look_at`.
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub radius: f32,
    pub height: f32,
    /// Angular speed of the orbit target in rad/s.
    pub speed: f32,
    pub look_at: Vec3,
    /// Chase rate, fraction per 60 Hz frame.
    pub damping_factor: f32,
    /// World units the target moves at full pointer deflection.
    pub parallax: f32,
}

impl CameraRig {
    #[must_use]
    pub fn new(settings: &CameraSettings) -> Self {
        Self {
            radius: settings.orbit_radius,
            height: settings.orbit_height,
            speed: settings.orbit_speed,
            look_at: Vec3::from_array(settings.look_at),
            damping_factor: settings.smoothing,
            parallax: settings.parallax,
        }
    }

    /// Point on the orbit at scene time `time`, before pointer parallax.
    #[must_use]
    pub fn orbit_point(&self, time: f32) -> Vec3 {
        let theta = time * self.speed;
        Vec3::new(theta.sin() * self.radius, self.height, theta.cos() * self.radius)
    }

    /// Orbit point shifted by the pointer: x moves it sideways, y up.
    #[must_use]
    pub fn target_position(&self, time: f32, pointer: Vec2) -> Vec3 {
        self.orbit_point(time) + Vec3::new(pointer.x, pointer.y, 0.0) * self.parallax
    }

    pub fn update(&self, camera: &mut Camera, input: &Input, time: f32, dt: f32) {
        let target = self.target_position(time, input.pointer());
        let blend = frame_blend(self.damping_factor, dt);

        camera.transform.position += (target - camera.transform.position) * blend;
        camera.look_at(self.look_at);
        camera.update_view_projection();
    }
}
