//! Scene Integration Tests
//!
//! Tests for:
//! - Scene: add nodes, attach/detach hierarchy, cycle refusal
//! - Mesh components and visibility
//! - Node queries: names, world positions

use glam::Vec3;
use hero_scene::resources::primitives::create_box_edges;
use hero_scene::resources::{Material, Mesh, ResourceRegistry};
use hero_scene::scene::node::Node;
use hero_scene::scene::scene::Scene;

fn new_scene_with_mesh() -> (Scene, Mesh) {
    let mut registry = ResourceRegistry::new();
    let geometry = registry.add_geometry(create_box_edges(1.0, 1.0, 1.0));
    let material = registry.add_material(Material::line("Test", 0xffffff, 1.0));
    (Scene::new(), Mesh::new(geometry, material))
}

fn count_visible(scene: &Scene) -> usize {
    let mut count = 0;
    scene.for_each_visible_mesh(|_, _| count += 1);
    count
}

// ============================================================================
// Node Creation
// ============================================================================

#[test]
fn scene_add_node_to_root() {
    let mut scene = Scene::new();
    let handle = scene.add_node(Node::with_name("Root"));
    assert!(scene.get_node(handle).is_some());
    assert!(scene.root_nodes.contains(&handle));
    assert_eq!(scene.node_count(), 1);
}

#[test]
fn scene_add_to_parent() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new());
    let child = scene.add_to_parent(Node::new(), parent);

    assert_eq!(scene.get_node(child).unwrap().parent(), Some(parent));
    assert_eq!(scene.get_node(parent).unwrap().children(), &[child]);
    assert!(!scene.root_nodes.contains(&child));
}

#[test]
fn scene_find_by_name() {
    let mut scene = Scene::new();
    let arm = scene.add_node(Node::with_name("ArmBase"));
    scene.add_node(Node::with_name("Car0"));

    assert_eq!(scene.find_by_name("ArmBase"), Some(arm));
    assert_eq!(scene.find_by_name("Nope"), None);
}

// ============================================================================
// Hierarchy
// ============================================================================

#[test]
fn scene_attach_removes_from_old_parent() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::new());
    let b = scene.add_node(Node::new());
    let child = scene.add_to_parent(Node::new(), a);

    scene.attach(child, b);

    assert!(scene.get_node(a).unwrap().children().is_empty());
    assert_eq!(scene.get_node(b).unwrap().children(), &[child]);
    assert_eq!(scene.get_node(child).unwrap().parent(), Some(b));
    assert!(!scene.root_nodes.contains(&child));
}

#[test]
fn scene_attach_to_self_is_noop() {
    let mut scene = Scene::new();
    let node = scene.add_node(Node::new());
    scene.attach(node, node);
    assert_eq!(scene.get_node(node).unwrap().parent(), None);
}

#[test]
fn scene_attach_refuses_cycles() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new());
    let child = scene.add_to_parent(Node::new(), root);
    let grandchild = scene.add_to_parent(Node::new(), child);

    scene.attach(root, grandchild);

    assert_eq!(scene.get_node(root).unwrap().parent(), None);
    assert!(scene.is_ancestor(root, grandchild));
    assert!(!scene.is_ancestor(grandchild, root));
}

#[test]
fn scene_detach_makes_root() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new().at(Vec3::new(10.0, 0.0, 0.0)));
    let child = scene.add_to_parent(Node::new().at(Vec3::new(1.0, 0.0, 0.0)), parent);
    scene.update_matrix_world();
    assert!((scene.world_position(child).unwrap().x - 11.0).abs() < 1e-5);

    scene.detach(child);
    scene.update_matrix_world();

    assert_eq!(scene.get_node(child).unwrap().parent(), None);
    assert!(scene.root_nodes.contains(&child));
    assert!(scene.get_node(parent).unwrap().children().is_empty());
    assert!((scene.world_position(child).unwrap() - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
}

#[test]
fn scene_attach_marks_child_dirty() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new().at(Vec3::new(10.0, 0.0, 0.0)));
    let child = scene.add_node(Node::new().at(Vec3::new(1.0, 0.0, 0.0)));
    scene.update_matrix_world();
    assert!((scene.world_position(child).unwrap().x - 1.0).abs() < 1e-5);

    scene.attach(child, parent);
    scene.update_matrix_world();

    assert!((scene.world_position(child).unwrap().x - 11.0).abs() < 1e-5);
}

// ============================================================================
// Meshes
// ============================================================================

#[test]
fn scene_set_mesh_replaces_previous() {
    let (mut scene, mesh) = new_scene_with_mesh();
    let node = scene.add_node(Node::new());

    let first = scene.set_mesh(node, mesh.clone()).unwrap();
    let second = scene.set_mesh(node, mesh).unwrap();

    assert_ne!(first, second);
    assert_eq!(scene.meshes.len(), 1);
    assert_eq!(scene.get_node(node).unwrap().mesh, Some(second));
}

#[test]
fn scene_invisible_node_hides_subtree() {
    let (mut scene, mesh) = new_scene_with_mesh();
    let parent = scene.add_node(Node::new());
    let child = scene.add_to_parent(Node::new(), parent);
    scene.set_mesh(parent, mesh.clone());
    scene.set_mesh(child, mesh);
    scene.update_matrix_world();
    assert_eq!(count_visible(&scene), 2);

    scene.get_node_mut(parent).unwrap().visible = false;
    assert_eq!(count_visible(&scene), 0);
}

#[test]
fn scene_visible_meshes_come_with_world_matrices() {
    let (mut scene, mesh) = new_scene_with_mesh();
    let parent = scene.add_node(Node::new().at(Vec3::new(0.0, 3.0, 0.0)));
    let child = scene.add_to_parent(Node::new().at(Vec3::new(0.0, 0.0, 2.0)), parent);
    scene.set_mesh(child, mesh);
    scene.update_matrix_world();

    let mut seen = Vec::new();
    scene.for_each_visible_mesh(|world, _| seen.push(Vec3::from(world.translation)));
    assert_eq!(seen.len(), 1);
    assert!((seen[0] - Vec3::new(0.0, 3.0, 2.0)).length() < 1e-5);
}
