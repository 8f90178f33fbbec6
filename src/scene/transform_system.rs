//! Transform System
//!
//! Composes every node's local matrix with its parent's world matrix. This is
//! the single place where hierarchy is resolved: controllers only write local
//! TRS values, and world matrices are rebuilt here, parent before child,
//! right before a frame is drawn.
//!
//! The pass borrows only the node map and the root list, not the whole
//! [`Scene`](crate::scene::Scene), so callers can keep other scene fields
//! borrowed at the same time.

use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::node::Node;

/// Updates world matrices for every tree reachable from `roots`.
///
/// Uses an explicit stack rather than recursion. A node's world matrix is
/// recomputed when its own local matrix changed or any ancestor's did.
pub fn update_hierarchy(nodes: &mut SlotMap<NodeHandle, Node>, roots: &[NodeHandle]) {
    // (node, parent world matrix, parent changed)
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = Vec::with_capacity(64);

    for &root_handle in roots.iter().rev() {
        stack.push((root_handle, Affine3A::IDENTITY, false));
    }

    while let Some((node_handle, parent_world, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(node_handle) else {
            continue;
        };

        let local_changed = node.transform.update_local_matrix();
        let world_needs_update = local_changed || parent_changed;

        if world_needs_update {
            let new_world = parent_world * *node.transform.local_matrix();
            node.transform.set_world_matrix(new_world);
        }

        let current_world = node.transform.world_matrix;
        for &child_handle in node.children.iter().rev() {
            stack.push((child_handle, current_world, world_needs_update));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};
    use std::f32::consts::FRAC_PI_2;

    fn link(nodes: &mut SlotMap<NodeHandle, Node>, parent: NodeHandle, child: NodeHandle) {
        nodes[child].parent = Some(parent);
        nodes[parent].children.push(child);
    }

    #[test]
    fn test_hierarchy_update() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();

        let parent = nodes.insert(Node::new().at(Vec3::new(1.0, 0.0, 0.0)));
        let child = nodes.insert(Node::new().at(Vec3::new(0.0, 1.0, 0.0)));
        link(&mut nodes, parent, child);

        update_hierarchy(&mut nodes, &[parent]);

        let child_world_pos = nodes[child].transform.world_position();
        assert!((child_world_pos - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn rotation_composes_down_the_chain() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();

        let base = nodes.insert(Node::new());
        let segment = nodes.insert(Node::new().at(Vec3::new(0.0, 2.0, 0.0)));
        let tip = nodes.insert(Node::new().at(Vec3::new(0.0, 2.0, 0.0)));
        link(&mut nodes, base, segment);
        link(&mut nodes, segment, tip);

        nodes[base].transform.rotation = Quat::from_rotation_z(-FRAC_PI_2);
        update_hierarchy(&mut nodes, &[base]);

        // Rotating the base by -90 degrees about Z lays the chain along +X.
        let tip_pos = nodes[tip].transform.world_position();
        assert!((tip_pos - Vec3::new(4.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn parent_move_propagates_on_next_pass() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();
        let parent = nodes.insert(Node::new());
        let child = nodes.insert(Node::new().at(Vec3::X));
        link(&mut nodes, parent, child);

        update_hierarchy(&mut nodes, &[parent]);
        nodes[parent].transform.position = Vec3::new(0.0, 0.0, 5.0);
        update_hierarchy(&mut nodes, &[parent]);

        let pos = nodes[child].transform.world_position();
        assert!((pos - Vec3::new(1.0, 0.0, 5.0)).length() < 1e-5);
    }
}
