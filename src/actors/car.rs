//! Patrolling toy cars.
//!
//! Each car drives a closed four-corner [`PatrolPath`] forever. On reaching a
//! corner it snaps exactly onto it and turns on the spot to face the next
//! one, which gives the cars their "robotic" square turns.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Quat, Vec3};

use crate::scene::{NodeHandle, Scene};
use crate::utils::math::{forward_from_yaw, heading_towards};
use crate::utils::time::FrameState;

/// Corners per patrol loop.
pub const WAYPOINT_COUNT: usize = 4;

/// Relative slack on one frame's travel when testing for arrival, so a car
/// that lands on a corner after exactly `distance / step` frames snaps on
/// that frame despite float rounding. Kept well below one step so a car
/// never snaps a frame early, however small the step.
pub const SNAP_TOLERANCE: f32 = 1e-3;

/// Wheel rotation in radians per unit of distance travelled.
pub const WHEEL_SPIN_PER_UNIT: f32 = 5.0;

pub const BOB_AMPLITUDE: f32 = 0.05;
pub const BOB_FREQUENCY: f32 = 5.0;

/// Wheel mount points in car space (forward is +Z).
pub const WHEEL_OFFSETS: [Vec3; 4] = [
    Vec3::new(-0.4, -0.3, 0.8),
    Vec3::new(0.4, -0.3, 0.8),
    Vec3::new(-0.4, -0.3, -0.8),
    Vec3::new(0.4, -0.3, -0.8),
];

/// A closed loop of exactly four waypoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatrolPath {
    waypoints: [Vec3; WAYPOINT_COUNT],
}

impl PatrolPath {
    #[must_use]
    pub fn new(waypoints: [Vec3; WAYPOINT_COUNT]) -> Self {
        Self { waypoints }
    }

    /// Axis-aligned square around `center`, corners in counter-clockwise
    /// order when seen from above, starting at the (-x, -z) corner.
    #[must_use]
    pub fn square(center: Vec3, half_size: f32) -> Self {
        let h = half_size.abs();
        Self::new([
            center + Vec3::new(-h, 0.0, -h),
            center + Vec3::new(-h, 0.0, h),
            center + Vec3::new(h, 0.0, h),
            center + Vec3::new(h, 0.0, -h),
        ])
    }

    /// The waypoint at `index`, wrapping modulo the loop length.
    #[inline]
    #[must_use]
    pub fn waypoint(&self, index: usize) -> Vec3 {
        self.waypoints[index % WAYPOINT_COUNT]
    }

    #[inline]
    #[must_use]
    pub fn waypoints(&self) -> &[Vec3; WAYPOINT_COUNT] {
        &self.waypoints
    }

    /// Horizontal axis-aligned bounds `(min, max)` of the loop.
    #[must_use]
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.waypoints
            .iter()
            .fold((Vec3::INFINITY, Vec3::NEG_INFINITY), |(lo, hi), &p| {
                (lo.min(p), hi.max(p))
            })
    }
}

/// Per-car motion state. Only [`CarMotion::step`] mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct CarMotion {
    pub path: PatrolPath,
    target_index: usize,
    /// Travel speed in units per second.
    pub speed: f32,
    /// Position on the path, before the cosmetic bob is added.
    position: Vec3,
    yaw: f32,
    wheel_spin: f32,
    /// Phase offset of the bob so cars do not bounce in unison.
    pub bob_phase: f32,
}

impl CarMotion {
    /// Places the car on the path's first waypoint, facing the second.
    #[must_use]
    pub fn new(path: PatrolPath, speed: f32, bob_phase: f32) -> Self {
        let start = path.waypoint(0);
        let yaw = heading_towards(start, path.waypoint(1)).unwrap_or(0.0);
        Self {
            path,
            target_index: 1,
            speed,
            position: start,
            yaw,
            wheel_spin: 0.0,
            bob_phase,
        }
    }

    /// Index of the waypoint currently driven toward. Always in `0..4`.
    #[inline]
    #[must_use]
    pub fn target_index(&self) -> usize {
        self.target_index
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.path.waypoint(self.target_index)
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[inline]
    #[must_use]
    pub fn wheel_spin(&self) -> f32 {
        self.wheel_spin
    }

    /// Distance covered in a frame lasting `dt` seconds.
    #[inline]
    #[must_use]
    pub fn travel(&self, dt: f32) -> f32 {
        self.speed * dt.max(0.0)
    }

    /// Advances one frame. Returns `true` when a waypoint was reached.
    pub fn step(&mut self, dt: f32) -> bool {
        let travel = self.travel(dt);
        let target = self.target();
        let distance = self.position.distance(target);

        let reached = distance <= travel * (1.0 + SNAP_TOLERANCE);
        if reached {
            self.position = target;
            self.target_index = (self.target_index + 1) % WAYPOINT_COUNT;
            // Coincident waypoints keep the previous heading.
            if let Some(yaw) = heading_towards(self.position, self.target()) {
                self.yaw = yaw;
            }
        } else {
            // Re-aim at the current target; on a straight leg this is the
            // heading already held, and it absorbs any accumulated drift.
            if let Some(yaw) = heading_towards(self.position, target) {
                self.yaw = yaw;
            }
            self.position += forward_from_yaw(self.yaw) * travel;
        }

        self.wheel_spin = (self.wheel_spin - travel * WHEEL_SPIN_PER_UNIT) % TAU;
        reached
    }

    /// Vertical bob at scene time `time`, bounded by [`BOB_AMPLITUDE`].
    #[inline]
    #[must_use]
    pub fn bob_offset(&self, time: f32) -> f32 {
        (time * BOB_FREQUENCY + self.bob_phase).sin() * BOB_AMPLITUDE
    }
}

/// A car actor: body node, four wheel nodes and its motion state.
#[derive(Debug, Clone)]
pub struct RobotCar {
    pub root: NodeHandle,
    pub wheels: [NodeHandle; 4],
    pub motion: CarMotion,
}

impl RobotCar {
    /// Local rotation of a wheel: cylinder axis laid onto the X axle, then
    /// spun about it.
    #[must_use]
    pub fn wheel_rotation(spin: f32) -> Quat {
        Quat::from_rotation_x(spin) * Quat::from_rotation_z(FRAC_PI_2)
    }

    /// Runs the patrol controller for one frame and writes the pose into
    /// the scene.
    pub fn update(&mut self, scene: &mut Scene, frame: &FrameState) {
        if self.motion.step(frame.dt) {
            log::trace!(
                "Car {:?} reached a corner, heading for waypoint {}",
                self.root,
                self.motion.target_index()
            );
        }

        if let Some(transform) = scene.transform_mut(self.root) {
            transform.position = self.motion.position() + Vec3::Y * self.motion.bob_offset(frame.time);
            transform.set_yaw(self.motion.yaw());
        }

        let wheel_rotation = Self::wheel_rotation(self.motion.wheel_spin());
        for &wheel in &self.wheels {
            if let Some(transform) = scene.transform_mut(wheel) {
                transform.rotation = wheel_rotation;
            }
        }
    }
}
