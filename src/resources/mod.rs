//! Render resource definitions
//!
//! CPU-side data that does not depend on a GPU implementation:
//! - Geometry: line/point vertex data
//! - Material: unlit color/opacity
//! - Mesh: geometry + material handles attached to a node
//! - ResourceRegistry: the one place shared resources are allocated
//! - primitives: edge-outline shape generators

pub mod geometry;
pub mod material;
pub mod mesh;
pub mod primitives;
pub mod registry;

pub use geometry::{BoundingBox, Geometry, Topology};
pub use material::Material;
pub use mesh::Mesh;
pub use registry::ResourceRegistry;

use slotmap::new_key_type;

new_key_type! {
    pub struct GeometryHandle;
    pub struct MaterialHandle;
}
