//! Scene builder tests
//!
//! Tests for:
//! - Shared resource allocation (fixed counts, sharing between actors)
//! - Actor population and node naming
//! - Arm hierarchy
//! - Initial camera and seeded randomness

use glam::Vec3;
use hero_scene::builder::{
    ARM_HOME, CAR_COUNT, HeroScene, INITIAL_CAMERA_POSITION, LINE_OPACITY, MIN_CAR_SPEED,
    SceneBuilder,
};
use hero_scene::resources::Topology;
use hero_scene::settings::HeroSettings;

fn build(seed: u64, particles: usize) -> HeroScene {
    let mut settings = HeroSettings::default();
    settings.scene.seed = Some(seed);
    settings.scene.particle_count = particles;
    SceneBuilder::new(&settings).viewport(1920, 1080).build()
}

// ============================================================================
// Resources
// ============================================================================

#[test]
fn resource_counts_do_not_depend_on_particle_count() {
    for particles in [0, 10, 500] {
        let hero = build(1, particles);
        assert_eq!(hero.registry.geometry_count(), 8);
        assert_eq!(hero.registry.material_count(), 8);
        assert_eq!(hero.registry.geometry_allocations(), 8);
        assert_eq!(hero.registry.material_allocations(), 8);
    }
}

#[test]
fn frames_allocate_no_new_resources() {
    let mut hero = build(1, 40);
    for i in 0..60 {
        hero.particles.update(&mut hero.registry, i as f32 / 60.0);
    }
    assert_eq!(hero.registry.geometry_allocations(), 8);
    assert_eq!(hero.registry.material_allocations(), 8);
}

#[test]
fn cars_share_body_and_wheel_resources() {
    let hero = build(2, 10);

    let mut tints = Vec::new();
    for car in &hero.cars {
        let body = hero.scene.get_node(car.root).unwrap();
        let mesh = &hero.scene.meshes[body.mesh.unwrap()];
        assert_eq!(mesh.geometry, hero.shared.car_body);
        tints.push(mesh.material);

        for &wheel in &car.wheels {
            let node = hero.scene.get_node(wheel).unwrap();
            let mesh = &hero.scene.meshes[node.mesh.unwrap()];
            assert_eq!(mesh.geometry, hero.shared.wheel);
            assert_eq!(mesh.material, hero.shared.wheel_material);
        }
    }

    tints.sort_unstable();
    tints.dedup();
    assert_eq!(tints.len(), CAR_COUNT, "every car has its own tint");
}

#[test]
fn outlines_are_drawn_translucent() {
    let hero = build(2, 10);
    let shared = &hero.shared;
    let lines = shared.car_tints.iter().chain([&shared.accent, &shared.segment_material]);

    for &handle in lines {
        let material = hero.registry.material(handle).unwrap();
        assert_eq!(material.opacity, LINE_OPACITY, "{}", material.name);
        assert!(material.transparent);
    }
    assert_eq!(hero.registry.material(shared.wheel_material).unwrap().opacity, 0.6);
}

#[test]
fn particle_geometry_holds_one_point_per_particle() {
    let hero = build(3, 75);
    let geometry = hero.registry.geometry(hero.particles.geometry).unwrap();
    assert_eq!(geometry.topology(), Topology::PointList);
    assert_eq!(geometry.vertex_count(), 75);
    assert_eq!(hero.particles.len(), 75);
}

// ============================================================================
// Population
// ============================================================================

#[test]
fn scene_contains_named_actors() {
    let hero = build(4, 10);
    assert_eq!(hero.cars.len(), CAR_COUNT);

    for name in ["Grid", "Particles", "ArmBase", "ArmLower", "ArmUpper", "Gripper"] {
        assert!(hero.scene.find_by_name(name).is_some(), "missing {name}");
    }
    for i in 0..CAR_COUNT {
        assert_eq!(hero.scene.find_by_name(&format!("Car{i}")), Some(hero.cars[i].root));
        for w in 0..4 {
            assert!(hero.scene.find_by_name(&format!("Car{i}.Wheel{w}")).is_some());
        }
    }
}

#[test]
fn arm_hierarchy_is_chained() {
    let hero = build(5, 10);
    let nodes = hero.arm.nodes;
    let parent = |h| hero.scene.get_node(h).unwrap().parent();

    assert_eq!(parent(nodes.base), None);
    assert_eq!(parent(nodes.lower), Some(nodes.base));
    assert_eq!(parent(nodes.upper), Some(nodes.lower));
    assert_eq!(parent(nodes.gripper), Some(nodes.upper));
    for jaw in nodes.jaws {
        assert_eq!(parent(jaw), Some(nodes.gripper));
    }
}

#[test]
fn arm_stands_at_home_with_straight_segments() {
    let hero = build(6, 10);
    let nodes = hero.arm.nodes;

    assert_eq!(hero.scene.world_position(nodes.base), Some(ARM_HOME));
    let gripper = hero.scene.world_position(nodes.gripper).unwrap();
    assert!((gripper - (ARM_HOME + Vec3::new(0.0, 4.25, 0.0))).length() < 1e-5);
}

#[test]
fn every_mesh_is_drawn_once() {
    let hero = build(7, 10);
    // grid, particles, 6 arm parts, 4 cars with 4 wheels each
    assert_eq!(hero.scene.meshes.len(), 1 + 1 + 6 + CAR_COUNT * 5);
}

// ============================================================================
// Camera & Randomness
// ============================================================================

#[test]
fn camera_starts_at_rest_position() {
    let hero = build(8, 10);
    assert_eq!(hero.camera.position(), INITIAL_CAMERA_POSITION);
    assert!((hero.camera.aspect - 1920.0 / 1080.0).abs() < 1e-5);
}

#[test]
fn zero_viewport_falls_back_to_square_aspect() {
    let settings = HeroSettings::default();
    let hero = SceneBuilder::new(&settings).viewport(0, 600).build();
    assert_eq!(hero.camera.aspect, 1.0);
}

#[test]
fn same_seed_builds_same_scene() {
    let a = build(42, 50);
    let b = build(42, 50);

    assert_eq!(a.seed, 42);
    for (car_a, car_b) in a.cars.iter().zip(&b.cars) {
        assert_eq!(car_a.motion, car_b.motion);
    }
    assert_eq!(a.particles.rest_positions(), b.particles.rest_positions());
}

#[test]
fn car_speeds_stay_in_configured_range() {
    for seed in 0..20 {
        let hero = build(seed, 0);
        for car in &hero.cars {
            assert!((1.2..=3.0).contains(&car.motion.speed), "speed {}", car.motion.speed);
        }
    }
}

#[test]
fn reversed_speed_range_is_tolerated() {
    let mut settings = HeroSettings::default();
    settings.scene.seed = Some(1);
    settings.scene.car_speed_min = 3.0;
    settings.scene.car_speed_max = 1.0;

    let hero = SceneBuilder::new(&settings).build();
    for car in &hero.cars {
        assert!((1.0..=3.0).contains(&car.motion.speed));
    }
}

#[test]
fn non_positive_speeds_are_raised_to_the_minimum() {
    let mut settings = HeroSettings::default();
    settings.scene.seed = Some(1);
    settings.scene.car_speed_min = -3.0;
    settings.scene.car_speed_max = 0.0;

    let mut hero = SceneBuilder::new(&settings).build();
    for car in &mut hero.cars {
        assert_eq!(car.motion.speed, MIN_CAR_SPEED);

        let before = car.motion.position().distance(car.motion.target());
        for _ in 0..600 {
            car.motion.step(1.0 / 60.0);
        }
        let after = car.motion.position().distance(car.motion.target());
        assert!(after < before, "car drove away from its target");
    }
}
