//! The robotic arm.
//!
//! A five-phase work cycle picks a target point every frame; a smoothed base
//! yaw and a planar two-bone IK solve then turn that point into joint angles.
//!
//! Node layout (every pivot is the parent of the next):
//!
//! ```text
//! base (yaw, bob) ── lower pivot (shoulder) ── upper pivot (elbow) ── gripper ── jaw x2
//! ```

use std::f32::consts::PI;

use glam::{Quat, Vec3};

use crate::scene::{NodeHandle, Scene};
use crate::utils::math::{approach_angle, frame_blend, heading_towards, wrap_angle};
use crate::utils::time::FrameState;

/// Lower and upper segment lengths.
pub const SEGMENT_LENGTH: f32 = 2.0;

/// Shoulder pivot height above the base origin.
pub const SHOULDER_HEIGHT: f32 = 0.25;

/// Targets closer than this (horizontally) are not solved.
pub const MIN_REACH: f32 = 0.1;

pub const BASE_BOB_AMPLITUDE: f32 = 0.1;
pub const BASE_BOB_FREQUENCY: f32 = 0.8;

/// Base yaw easing, fraction per 60 Hz frame.
pub const YAW_SMOOTHING: f32 = 0.02;
/// Gripper aperture easing, fraction per 60 Hz frame.
pub const GRIPPER_SMOOTHING: f32 = 0.1;

pub const GRIPPER_OPEN: f32 = 0.2;
pub const GRIPPER_CLOSED: f32 = 0.0;
/// Jaw distance from the gripper centre when fully closed.
pub const JAW_OFFSET: f32 = 0.15;
pub const JAW_HEIGHT: f32 = 0.3;

/// One step of the arm's work cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArmPhase {
    Scanning,
    Reaching,
    Grasping,
    Transporting,
    Placing,
}

impl ArmPhase {
    pub const ALL: [ArmPhase; 5] = [
        ArmPhase::Scanning,
        ArmPhase::Reaching,
        ArmPhase::Grasping,
        ArmPhase::Transporting,
        ArmPhase::Placing,
    ];

    /// The phase that follows this one; `Placing` wraps to `Scanning`.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            ArmPhase::Scanning => ArmPhase::Reaching,
            ArmPhase::Reaching => ArmPhase::Grasping,
            ArmPhase::Grasping => ArmPhase::Transporting,
            ArmPhase::Transporting => ArmPhase::Placing,
            ArmPhase::Placing => ArmPhase::Scanning,
        }
    }

    /// Dwell time in seconds before moving to [`next`](Self::next).
    #[must_use]
    pub const fn duration(self) -> f32 {
        match self {
            ArmPhase::Scanning => 3.0,
            ArmPhase::Reaching => 1.5,
            ArmPhase::Grasping => 1.0,
            ArmPhase::Transporting => 2.0,
            ArmPhase::Placing => 1.0,
        }
    }

    #[must_use]
    pub const fn gripper_open(self) -> bool {
        matches!(self, ArmPhase::Scanning | ArmPhase::Placing)
    }

    #[must_use]
    pub const fn gripper_aperture(self) -> f32 {
        if self.gripper_open() {
            GRIPPER_OPEN
        } else {
            GRIPPER_CLOSED
        }
    }

    /// End-effector goal for this phase, relative to the arm's home point.
    ///
    /// Scanning sweeps a slow Lissajous loop; the other phases hold fixed
    /// pick and place points.
    #[must_use]
    pub fn target_offset(self, time: f32) -> Vec3 {
        match self {
            ArmPhase::Scanning => Vec3::new(
                3.0 * (time * 0.3).sin(),
                1.5 + (time * 0.5).sin(),
                3.0 * (time * 0.3).cos(),
            ),
            ArmPhase::Reaching => Vec3::new(-2.5, -1.0, -2.5),
            ArmPhase::Grasping => Vec3::new(-2.5, 1.5, -2.5),
            ArmPhase::Transporting => Vec3::new(2.5, 1.0, 2.5),
            ArmPhase::Placing => Vec3::new(2.5, -0.5, 2.5),
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ArmPhase::Scanning => "scanning",
            ArmPhase::Reaching => "reaching",
            ArmPhase::Grasping => "grasping",
            ArmPhase::Transporting => "transporting",
            ArmPhase::Placing => "placing",
        }
    }
}

impl std::fmt::Display for ArmPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Phase bookkeeping. Only [`ArmMotion::advance`] mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct ArmMotion {
    phase: ArmPhase,
    phase_time: f32,
    target_position: Vec3,
    home: Vec3,
}

impl ArmMotion {
    #[must_use]
    pub fn new(home: Vec3) -> Self {
        let phase = ArmPhase::Scanning;
        Self {
            phase,
            phase_time: 0.0,
            target_position: home + phase.target_offset(0.0),
            home,
        }
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> ArmPhase {
        self.phase
    }

    /// Seconds spent in the current phase.
    #[inline]
    #[must_use]
    pub fn phase_time(&self) -> f32 {
        self.phase_time
    }

    #[inline]
    #[must_use]
    pub fn target_position(&self) -> Vec3 {
        self.target_position
    }

    #[inline]
    #[must_use]
    pub fn home(&self) -> Vec3 {
        self.home
    }

    /// Accumulates `frame.dt` and recomputes the target.
    ///
    /// At most one transition happens per call however large the delta is.
    /// Returns the new phase when one was entered.
    pub fn advance(&mut self, frame: &FrameState) -> Option<ArmPhase> {
        self.phase_time += frame.dt.max(0.0);

        let mut entered = None;
        if self.phase_time > self.phase.duration() {
            self.phase = self.phase.next();
            self.phase_time = 0.0;
            entered = Some(self.phase);
        }

        self.target_position = self.home + self.phase.target_offset(frame.time);
        entered
    }
}

/// Joint angles produced by [`solve_two_bone_ik`], in radians.
///
/// Both are pitches about the local X axis; zero means the segment points
/// straight up, positive tilts it toward local +Z.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IkSolution {
    /// Lower segment relative to the base.
    pub shoulder: f32,
    /// Upper segment relative to the lower one.
    pub elbow: f32,
}

/// Planar two-bone IK toward a point `reach` ahead of and `height` above the
/// shoulder.
///
/// Returns `None` unless `reach` lies strictly inside `(MIN_REACH, l1 + l2)`.
/// Points past full extension are met with a straight arm aimed at them.
#[must_use]
pub fn solve_two_bone_ik(l1: f32, l2: f32, reach: f32, height: f32) -> Option<IkSolution> {
    if !(reach.is_finite() && height.is_finite()) || l1 <= 0.0 || l2 <= 0.0 {
        return None;
    }
    if reach <= MIN_REACH || reach >= l1 + l2 {
        return None;
    }

    let distance = reach.hypot(height);

    // Interior angle at the elbow, then the bend away from straight.
    let cos_elbow = ((l1 * l1 + l2 * l2 - distance * distance) / (2.0 * l1 * l2)).clamp(-1.0, 1.0);
    let elbow = PI - cos_elbow.acos();

    // Angle between the lower segment and the shoulder-to-target line.
    let cos_offset = ((l1 * l1 + distance * distance - l2 * l2) / (2.0 * l1 * distance)).clamp(-1.0, 1.0);
    let offset = cos_offset.acos();

    // Direction to the target measured from vertical; elbow-up keeps the
    // lower segment more upright than that line.
    let aim = reach.atan2(height);

    Some(IkSolution {
        shoulder: aim - offset,
        elbow,
    })
}

/// Last applied joint values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ArmPose {
    pub base_yaw: f32,
    pub ik: IkSolution,
    pub aperture: f32,
}

/// Scene nodes making up the arm.
#[derive(Debug, Clone, Copy)]
pub struct ArmNodes {
    pub base: NodeHandle,
    pub lower: NodeHandle,
    pub upper: NodeHandle,
    pub gripper: NodeHandle,
    pub jaws: [NodeHandle; 2],
}

#[derive(Debug, Clone)]
pub struct RoboticArm {
    pub nodes: ArmNodes,
    pub motion: ArmMotion,
    pose: ArmPose,
}

impl RoboticArm {
    /// `home` is where the base stands. The arm starts scanning, facing +Z,
    /// with its gripper open.
    #[must_use]
    pub fn new(nodes: ArmNodes, home: Vec3) -> Self {
        Self {
            nodes,
            motion: ArmMotion::new(home),
            pose: ArmPose {
                aperture: GRIPPER_OPEN,
                ..Default::default()
            },
        }
    }

    #[inline]
    #[must_use]
    pub fn pose(&self) -> &ArmPose {
        &self.pose
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> ArmPhase {
        self.motion.phase()
    }

    pub fn update(&mut self, scene: &mut Scene, frame: &FrameState) {
        if let Some(phase) = self.motion.advance(frame) {
            log::debug!("Arm entered phase '{phase}' at t={:.2}s", frame.time);
        }
        let target = self.motion.target_position();
        self.drive_towards(scene, frame, target);
    }

    /// Poses the arm toward `target` for one frame.
    ///
    /// When the target is outside the solvable range the IK angles from the
    /// previous frame are kept.
    pub fn drive_towards(&mut self, scene: &mut Scene, frame: &FrameState, target: Vec3) {
        let base_position = self.motion.home()
            + Vec3::Y * ((frame.time * BASE_BOB_FREQUENCY).sin() * BASE_BOB_AMPLITUDE);

        if let Some(desired) = heading_towards(base_position, target) {
            let blend = frame_blend(YAW_SMOOTHING, frame.dt);
            self.pose.base_yaw = wrap_angle(approach_angle(self.pose.base_yaw, desired, blend));
        }

        let shoulder = base_position + Vec3::Y * SHOULDER_HEIGHT;
        let offset = target - shoulder;
        let reach = offset.x.hypot(offset.z);
        if let Some(ik) = solve_two_bone_ik(SEGMENT_LENGTH, SEGMENT_LENGTH, reach, offset.y) {
            self.pose.ik = ik;
        }

        let aperture_goal = self.motion.phase().gripper_aperture();
        self.pose.aperture += (aperture_goal - self.pose.aperture) * frame_blend(GRIPPER_SMOOTHING, frame.dt);

        // Sideways sway on top of the solved pitch.
        let phase_time = self.motion.phase_time();
        let lower_sway = (frame.time * 1.5 + phase_time).sin() * 0.05;
        let upper_sway = (frame.time * 2.0 + phase_time).sin() * 0.03;

        if let Some(transform) = scene.transform_mut(self.nodes.base) {
            transform.position = base_position;
            transform.set_yaw(self.pose.base_yaw);
        }
        if let Some(transform) = scene.transform_mut(self.nodes.lower) {
            transform.rotation =
                Quat::from_rotation_x(self.pose.ik.shoulder) * Quat::from_rotation_z(lower_sway);
        }
        if let Some(transform) = scene.transform_mut(self.nodes.upper) {
            transform.rotation =
                Quat::from_rotation_x(self.pose.ik.elbow) * Quat::from_rotation_z(upper_sway);
        }

        let jaw_x = JAW_OFFSET + self.pose.aperture;
        for (jaw, side) in self.nodes.jaws.into_iter().zip([-1.0_f32, 1.0]) {
            if let Some(transform) = scene.transform_mut(jaw) {
                transform.position = Vec3::new(side * jaw_x, JAW_HEIGHT, 0.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn end_effector(l1: f32, l2: f32, ik: IkSolution) -> (f32, f32) {
        let a = ik.shoulder;
        let b = ik.shoulder + ik.elbow;
        (l1 * a.sin() + l2 * b.sin(), l1 * a.cos() + l2 * b.cos())
    }

    #[test]
    fn phases_cycle_back_to_scanning() {
        let mut phase = ArmPhase::Scanning;
        for expected in ArmPhase::ALL.iter().cycle().skip(1).take(10) {
            phase = phase.next();
            assert_eq!(phase, *expected);
        }
    }

    #[test]
    fn ik_reaches_target_inside_range() {
        let ik = solve_two_bone_ik(2.0, 2.0, 2.5, 1.0).unwrap();
        let (reach, height) = end_effector(2.0, 2.0, ik);
        assert!((reach - 2.5).abs() < 1e-4, "reach {reach}");
        assert!((height - 1.0).abs() < 1e-4, "height {height}");
    }

    #[test]
    fn ik_is_elbow_up() {
        let ik = solve_two_bone_ik(2.0, 2.0, 3.0, 0.0).unwrap();
        // The lower segment leans less than the line to the target.
        assert!(ik.shoulder < std::f32::consts::FRAC_PI_2);
        assert!(ik.elbow > 0.0);
    }

    #[test]
    fn ik_rejects_reach_outside_range() {
        assert!(solve_two_bone_ik(2.0, 2.0, 0.05, 1.0).is_none());
        assert!(solve_two_bone_ik(2.0, 2.0, 0.1, 1.0).is_none());
        assert!(solve_two_bone_ik(2.0, 2.0, 4.0, 0.0).is_none());
        assert!(solve_two_bone_ik(2.0, 2.0, f32::NAN, 0.0).is_none());
    }

    #[test]
    fn ik_clamps_unreachable_distance() {
        // Horizontally in range but too far overall: straight arm.
        let ik = solve_two_bone_ik(2.0, 2.0, 3.5, 3.0).unwrap();
        assert!(ik.elbow.abs() < 1e-3);
        assert!(ik.shoulder.is_finite());
    }

    #[test]
    fn phase_targets_are_reachable() {
        let home = Vec3::new(20.0, -8.0, 20.0);
        for phase in ArmPhase::ALL {
            for step in 0..50 {
                let t = step as f32 * 0.7;
                let target = home + phase.target_offset(t);
                let shoulder = home + Vec3::Y * SHOULDER_HEIGHT;
                let d = target - shoulder;
                let reach = d.x.hypot(d.z);
                assert!(reach > MIN_REACH && reach < 2.0 * SEGMENT_LENGTH, "{phase} at {t}");
            }
        }
    }
}
