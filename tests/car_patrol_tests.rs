//! Car Patrol Controller tests
//!
//! Tests for:
//! - Arrival timing and exact snapping onto waypoints
//! - Target index bounds and single-step advance
//! - Frame-rate independence
//! - Car actors driving their scene nodes (bob, wheels, heading)
//! - Patrol path layout in the built scene

use glam::Vec3;
use hero_scene::actors::car::{BOB_AMPLITUDE, CarMotion, PatrolPath, WAYPOINT_COUNT};
use hero_scene::builder::{PATROL_CENTERS, PATROL_HALF_SIZE, SceneBuilder};
use hero_scene::settings::HeroSettings;
use hero_scene::utils::math::forward_from_yaw;
use hero_scene::utils::time::FrameState;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-4;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

fn quadrant_path() -> PatrolPath {
    PatrolPath::square(PATROL_CENTERS[0], PATROL_HALF_SIZE)
}

fn seeded_settings(seed: u64) -> HeroSettings {
    let mut settings = HeroSettings::default();
    settings.scene.seed = Some(seed);
    settings
}

// ============================================================================
// Motion
// ============================================================================

#[test]
fn car_reaches_second_waypoint_after_distance_over_step_frames() {
    let path = quadrant_path();
    let speed = 2.0;
    let dt = 0.25;
    let mut car = CarMotion::new(path, speed, 0.0);

    let step = speed * dt;
    let frames = (path.waypoint(0).distance(path.waypoint(1)) / step).round() as usize;
    assert_eq!(frames, 20);

    for _ in 0..frames {
        car.step(dt);
    }

    assert_eq!(car.position(), path.waypoint(1));
    assert_eq!(car.target_index(), 2);
}

#[test]
fn tiny_steps_arrive_on_the_exact_frame() {
    let path = PatrolPath::new([
        Vec3::ZERO,
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(1.0, 0.0, 1.0),
        Vec3::new(1.0, 0.0, 0.0),
    ]);
    let mut car = CarMotion::new(path, 0.5, 0.0);
    let dt = 1.0 / 1024.0;

    // 1.0 unit at 1/2048 units per frame.
    for frame in 1..2048 {
        assert!(!car.step(dt), "snapped early on frame {frame}");
    }
    assert!(car.step(dt));

    assert_eq!(car.position(), path.waypoint(1));
    assert_eq!(car.target_index(), 2);
}

#[test]
fn car_does_not_arrive_early() {
    let path = quadrant_path();
    let mut car = CarMotion::new(path, 2.0, 0.0);

    for _ in 0..19 {
        assert!(!car.step(0.25));
    }
    assert_eq!(car.target_index(), 1);
}

#[test]
fn snapped_position_is_exactly_the_waypoint() {
    let path = quadrant_path();
    let mut car = CarMotion::new(path, 2.3, 0.0);

    let mut arrivals = 0;
    for _ in 0..5000 {
        let target = car.target_index();
        if car.step(1.0 / 60.0) {
            arrivals += 1;
            assert_eq!(car.position(), path.waypoint(target));
        }
    }
    // Perimeter 40 at 2.3 u/s over 83 s is several laps.
    assert!(arrivals >= 16, "only {arrivals} arrivals");
}

#[test]
fn target_index_advances_one_step_under_irregular_deltas() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut car = CarMotion::new(quadrant_path(), 3.0, 0.0);

    for _ in 0..10_000 {
        let dt = match rng.random_range(0..10) {
            0 => 0.0,
            1 => rng.random_range(1.0..20.0),
            _ => rng.random_range(0.001..0.1),
        };
        let before = car.target_index();
        let arrived = car.step(dt);
        let after = car.target_index();

        assert!(after < WAYPOINT_COUNT);
        if arrived {
            assert_eq!(after, (before + 1) % WAYPOINT_COUNT);
        } else {
            assert_eq!(after, before);
        }
    }
}

#[test]
fn car_faces_new_target_after_corner() {
    let path = quadrant_path();
    let mut car = CarMotion::new(path, 2.0, 0.0);
    for _ in 0..20 {
        car.step(0.25);
    }

    let expected = (path.waypoint(2) - path.waypoint(1)).normalize();
    assert!(vec3_approx(forward_from_yaw(car.yaw()), expected));
}

#[test]
fn travel_is_frame_rate_independent() {
    let path = quadrant_path();
    let mut fast = CarMotion::new(path, 2.0, 0.0);
    let mut slow = CarMotion::new(path, 2.0, 0.0);

    for _ in 0..120 {
        fast.step(1.0 / 120.0);
    }
    for _ in 0..30 {
        slow.step(1.0 / 30.0);
    }

    assert!(vec3_approx(fast.position(), slow.position()));
    assert!(vec3_approx(fast.position(), path.waypoint(0) + Vec3::Z * 2.0));
}

#[test]
fn car_stays_on_its_square() {
    let path = quadrant_path();
    let (min, max) = path.bounds();
    let mut car = CarMotion::new(path, 2.7, 0.0);

    for _ in 0..3000 {
        car.step(1.0 / 60.0);
        let p = car.position();
        assert!(p.x >= min.x - EPSILON && p.x <= max.x + EPSILON, "{p}");
        assert!(p.z >= min.z - EPSILON && p.z <= max.z + EPSILON, "{p}");
        assert_eq!(p.y, min.y);
    }
}

// ============================================================================
// Car actors in the scene
// ============================================================================

#[test]
fn car_update_writes_bob_and_heading_to_its_node() {
    let mut hero = SceneBuilder::new(&seeded_settings(1)).viewport(800, 600).build();

    let mut frame = FrameState {
        time: 0.0,
        dt: 1.0 / 60.0,
        frame_count: 0,
    };
    for i in 0..200 {
        frame.time = i as f32 / 60.0;
        frame.frame_count = i;
        for car in &mut hero.cars {
            car.update(&mut hero.scene, &frame);
        }

        for car in &hero.cars {
            let transform = hero.scene.transform(car.root).unwrap();
            let ground = car.motion.position();
            assert_eq!(transform.position.x, ground.x);
            assert_eq!(transform.position.z, ground.z);
            assert!((transform.position.y - ground.y).abs() <= BOB_AMPLITUDE + 1e-6);

            let facing = transform.rotation * Vec3::Z;
            assert!(vec3_approx(facing, forward_from_yaw(car.motion.yaw())));
        }
    }
}

#[test]
fn cars_bob_out_of_sync() {
    let hero = SceneBuilder::new(&seeded_settings(2)).build();
    let t = 0.3;
    let offsets: Vec<f32> = hero.cars.iter().map(|c| c.motion.bob_offset(t)).collect();
    for i in 0..offsets.len() {
        for j in (i + 1)..offsets.len() {
            assert!((offsets[i] - offsets[j]).abs() > 1e-4);
        }
    }
}

#[test]
fn wheels_spin_while_driving() {
    let mut hero = SceneBuilder::new(&seeded_settings(3)).build();
    let car = &mut hero.cars[0];
    let wheel = car.wheels[0];
    let before = hero.scene.transform(wheel).unwrap().rotation;

    let frame = FrameState {
        time: 0.1,
        dt: 0.1,
        frame_count: 1,
    };
    car.update(&mut hero.scene, &frame);

    let after = hero.scene.transform(wheel).unwrap().rotation;
    assert!(before.angle_between(after) > 1e-3);
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn patrol_squares_do_not_overlap() {
    let hero = SceneBuilder::new(&seeded_settings(4)).build();
    let bounds: Vec<(Vec3, Vec3)> = hero.cars.iter().map(|c| c.motion.path.bounds()).collect();

    for i in 0..bounds.len() {
        for j in (i + 1)..bounds.len() {
            let (a_min, a_max) = bounds[i];
            let (b_min, b_max) = bounds[j];
            let overlap_x = a_min.x <= b_max.x && b_min.x <= a_max.x;
            let overlap_z = a_min.z <= b_max.z && b_min.z <= a_max.z;
            assert!(!(overlap_x && overlap_z), "paths {i} and {j} overlap");
        }
    }
}

#[test]
fn cars_start_on_first_waypoint_facing_second() {
    let hero = SceneBuilder::new(&seeded_settings(5)).build();
    for car in &hero.cars {
        let path = car.motion.path;
        let transform = hero.scene.transform(car.root).unwrap();
        assert_eq!(transform.position, path.waypoint(0));
        assert_eq!(car.motion.target_index(), 1);

        let facing = transform.rotation * Vec3::Z;
        let expected = (path.waypoint(1) - path.waypoint(0)).normalize();
        assert!(vec3_approx(facing, expected));
    }
}
