use crate::resources::{GeometryHandle, MaterialHandle};
use crate::scene::NodeHandle;

/// Mesh component: which shared geometry to draw with which shared material.
///
/// A mesh holds handles only. Many meshes may point at the same geometry
/// and material (every wheel in the scene draws the one wheel geometry).
#[derive(Debug, Clone)]
pub struct Mesh {
    pub geometry: GeometryHandle,
    pub material: MaterialHandle,

    /// Owning scene node, filled in by [`Scene::set_mesh`](crate::scene::Scene::set_mesh).
    pub node: Option<NodeHandle>,

    pub visible: bool,
}

impl Mesh {
    #[must_use]
    pub fn new(geometry: GeometryHandle, material: MaterialHandle) -> Self {
        Self {
            geometry,
            material,
            node: None,
            visible: true,
        }
    }
}
