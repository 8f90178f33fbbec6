//! Small scalar helpers shared by the motion controllers.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// Reference frame rate the per-frame smoothing constants were tuned at.
pub const REFERENCE_FPS: f32 = 60.0;

/// Converts a "fraction per 60 Hz frame" easing rate into the fraction to
/// apply for a frame lasting `dt` seconds.
///
/// `rate` is clamped to `[0, 1]`; a zero or negative `dt` yields `0`.
#[inline]
#[must_use]
pub fn frame_blend(rate: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return 0.0;
    }
    let retention = (1.0 - rate.clamp(0.0, 1.0)).powf(dt * REFERENCE_FPS);
    1.0 - retention
}

/// Wraps an angle into `(-PI, PI]`.
#[inline]
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Moves `current` toward `target` along the shortest arc by `blend`.
#[inline]
#[must_use]
pub fn approach_angle(current: f32, target: f32, blend: f32) -> f32 {
    current + wrap_angle(target - current) * blend
}

/// Yaw (rotation about +Y) that makes +Z point from `from` toward `to`
/// in the horizontal plane.
///
/// Returns `None` when the two points coincide horizontally.
#[inline]
#[must_use]
pub fn heading_towards(from: Vec3, to: Vec3) -> Option<f32> {
    let dx = to.x - from.x;
    let dz = to.z - from.z;
    if dx * dx + dz * dz <= f32::EPSILON {
        return None;
    }
    Some(dx.atan2(dz))
}

/// Unit horizontal forward vector for a yaw angle.
#[inline]
#[must_use]
pub fn forward_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}
