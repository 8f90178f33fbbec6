use glam::{Affine3A, Vec3};
use slotmap::SlotMap;

use crate::resources::mesh::Mesh;
use crate::scene::node::Node;
use crate::scene::transform::Transform;
use crate::scene::transform_system;
use crate::scene::{MeshKey, NodeHandle};

/// Scene graph container.
///
/// Pure data: the node tree plus mesh components. Geometry and materials live
/// in the [`ResourceRegistry`](crate::resources::ResourceRegistry) and are only
/// referenced from here by handle.
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    pub meshes: SlotMap<MeshKey, Mesh>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            meshes: SlotMap::with_key(),
        }
    }

    /// Adds a node at the root of the scene.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Adds a node as the last child of `parent`.
    ///
    /// If `parent` does not exist the node becomes a root.
    pub fn add_to_parent(&mut self, child: Node, parent: NodeHandle) -> NodeHandle {
        let handle = self.nodes.insert(child);
        if self.nodes.contains_key(parent) {
            self.link(handle, parent);
        } else {
            self.root_nodes.push(handle);
        }
        handle
    }

    /// Moves `child` under `parent`, detaching it from its current parent.
    ///
    /// Attaching a node to itself or to one of its descendants is refused.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent
            || !self.nodes.contains_key(child)
            || !self.nodes.contains_key(parent)
            || self.is_ancestor(child, parent)
        {
            log::warn!("Refusing to attach node {child:?} under {parent:?}");
            return;
        }

        self.detach(child);
        self.root_nodes.retain(|&h| h != child);
        self.link(child, parent);
    }

    /// Detaches `handle` from its parent and makes it a root.
    pub fn detach(&mut self, handle: NodeHandle) {
        let Some(parent) = self.nodes.get(handle).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.retain(|c| *c != handle);
        }
        if let Some(n) = self.nodes.get_mut(handle) {
            n.parent = None;
            n.transform.mark_dirty();
        }
        self.root_nodes.push(handle);
    }

    fn link(&mut self, child: NodeHandle, parent: NodeHandle) {
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
            c.transform.mark_dirty();
        }
    }

    /// Whether `ancestor` appears on the parent chain of `node`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = self.nodes.get(node).and_then(|n| n.parent);
        while let Some(handle) = current {
            if handle == ancestor {
                return true;
            }
            current = self.nodes.get(handle).and_then(|n| n.parent);
        }
        false
    }

    /// Attaches a mesh component to a node, replacing any previous one.
    pub fn set_mesh(&mut self, node: NodeHandle, mut mesh: Mesh) -> Option<MeshKey> {
        let target = self.nodes.get_mut(node)?;
        if let Some(old) = target.mesh.take() {
            self.meshes.remove(old);
        }
        mesh.node = Some(node);
        let key = self.meshes.insert(mesh);
        if let Some(target) = self.nodes.get_mut(node) {
            target.mesh = Some(key);
        }
        Some(key)
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    /// Shortcut for controllers that only touch a node's local transform.
    #[inline]
    pub fn transform_mut(&mut self, handle: NodeHandle) -> Option<&mut Transform> {
        self.nodes.get_mut(handle).map(|n| &mut n.transform)
    }

    #[inline]
    #[must_use]
    pub fn transform(&self, handle: NodeHandle) -> Option<&Transform> {
        self.nodes.get(handle).map(|n| &n.transform)
    }

    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NodeHandle> {
        self.nodes
            .iter()
            .find_map(|(handle, node)| (node.name == name).then_some(handle))
    }

    /// World position of a node as of the last [`update_matrix_world`](Self::update_matrix_world).
    #[must_use]
    pub fn world_position(&self, handle: NodeHandle) -> Option<Vec3> {
        self.nodes.get(handle).map(|n| n.transform.world_position())
    }

    /// Runs the transform system over the whole tree.
    pub fn update_matrix_world(&mut self) {
        transform_system::update_hierarchy(&mut self.nodes, &self.root_nodes);
    }

    /// Visits every visible mesh with its world matrix, parents before
    /// children. An invisible node hides its whole subtree.
    pub fn for_each_visible_mesh(&self, mut visit: impl FnMut(&Affine3A, &Mesh)) {
        let mut stack: Vec<NodeHandle> = self.root_nodes.iter().rev().copied().collect();
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            if let Some(mesh) = node.mesh.and_then(|key| self.meshes.get(key))
                && mesh.visible
            {
                visit(&node.transform.world_matrix, mesh);
            }
            stack.extend(node.children.iter().rev().copied());
        }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
