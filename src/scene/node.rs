use std::borrow::Cow;

use glam::{Affine3A, Vec3};
use smallvec::SmallVec;

use crate::scene::transform::Transform;
use crate::scene::{MeshKey, NodeHandle};

/// A scene node: hierarchy links, a local transform and an optional mesh.
///
/// Nodes only hold what the frame update touches every frame. The mesh is a
/// key into [`Scene::meshes`](crate::scene::Scene::meshes), which in turn
/// points at shared geometry/material resources.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: Cow<'static, str>,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: SmallVec<[NodeHandle; 4]>,

    pub transform: Transform,

    pub visible: bool,

    pub mesh: Option<MeshKey>,
}

impl Node {
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: Cow::Borrowed("Node"),
            parent: None,
            children: SmallVec::new(),
            transform: Transform::new(),
            visible: true,
            mesh: None,
        }
    }

    #[must_use]
    pub fn with_name(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            ..Self::new()
        }
    }

    #[must_use]
    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// World matrix as of the last transform system pass.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}
