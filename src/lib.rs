#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Decorative animated 3D scene: four toy cars patrolling square routes, a
//! robotic arm cycling through a pick-and-place routine, and a field of
//! drifting particles, all drawn as glowing outlines.
//!
//! The crate splits into a CPU side that runs anywhere ([`scene`],
//! [`resources`], [`actors`], [`driver`]) and a GPU side ([`render`],
//! [`app`]) that draws it with wgpu into a winit window.

pub mod actors;
#[cfg(feature = "winit")]
pub mod app;
pub mod builder;
pub mod driver;
pub mod errors;
pub mod input;
pub mod render;
pub mod resources;
pub mod scene;
pub mod scheduler;
pub mod settings;
pub mod utils;

pub use actors::{ArmPhase, CameraRig, CarMotion, ParticleField, PatrolPath, RoboticArm, RobotCar};
#[cfg(feature = "winit")]
pub use app::App;
pub use builder::{HeroScene, SceneBuilder};
pub use driver::HeroAnimation;
pub use errors::{HeroError, Result};
pub use input::Input;
pub use render::{HeadlessSurface, RenderFrame, RenderSurface, WgpuSurface};
pub use resources::{Geometry, Material, Mesh, ResourceRegistry};
pub use scene::{Camera, Node, NodeHandle, Scene, Transform};
pub use scheduler::{FrameScheduler, VirtualScheduler};
pub use settings::HeroSettings;
pub use utils::{Clock, FrameState, ManualTime, MonotonicTime, TimeSource};
