//! Scene graph module
//!
//! Hierarchy and components of the hero scene:
//! - [`Node`]: a scene node with parent/child links and a transform
//! - [`Transform`]: local TRS with cached matrices
//! - [`Scene`]: the node container and its mesh components
//! - [`Camera`]: perspective camera
//! - [`transform_system`]: composes local transforms into world matrices

pub mod camera;
pub mod node;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod transform;
pub mod transform_system;

pub use camera::Camera;
pub use node::Node;
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct MeshKey;
}
