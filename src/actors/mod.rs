//! Animated actors and their per-frame controllers.
//!
//! Each controller owns only its motion state plus the handles of the nodes
//! it drives; the nodes themselves live in the [`Scene`](crate::scene::Scene).

pub mod arm;
pub mod camera_rig;
pub mod car;
pub mod particles;

pub use arm::{ArmMotion, ArmNodes, ArmPhase, ArmPose, IkSolution, RoboticArm, solve_two_bone_ik};
pub use camera_rig::CameraRig;
pub use car::{CarMotion, PatrolPath, RobotCar};
pub use particles::{ParticleField, ParticleLayout};
