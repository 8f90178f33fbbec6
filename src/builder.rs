//! Scene construction.
//!
//! [`SceneBuilder`] allocates every shared geometry and material exactly
//! once, then assembles the camera, grid, particle field, arm and the four
//! cars on top of them. Actors only ever reference shared resources.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use crate::actors::arm::{self, ArmNodes, RoboticArm};
use crate::actors::camera_rig::CameraRig;
use crate::actors::car::{CarMotion, PatrolPath, RobotCar, WHEEL_OFFSETS};
use crate::actors::particles::{ParticleField, ParticleLayout};
use crate::resources::primitives::{CylinderOptions, create_box_edges, create_cylinder_edges, create_grid};
use crate::resources::{GeometryHandle, Material, MaterialHandle, Mesh, ResourceRegistry};
use crate::scene::{Camera, Node, NodeHandle, Scene};
use crate::settings::{HeroSettings, SceneSettings};

pub const CAR_COUNT: usize = 4;

/// Where the arm stands.
pub const ARM_HOME: Vec3 = Vec3::new(20.0, -8.0, 20.0);

pub const GRID_SIZE: f32 = 100.0;
pub const GRID_DIVISIONS: u32 = 20;
pub const GRID_HEIGHT: f32 = -10.0;

/// Patrol squares: one per quadrant, clear of each other and of the arm.
pub const PATROL_CENTERS: [Vec3; CAR_COUNT] = [
    Vec3::new(-12.0, -9.5, -12.0),
    Vec3::new(12.0, -9.5, -12.0),
    Vec3::new(12.0, -9.5, 12.0),
    Vec3::new(-12.0, -9.5, 12.0),
];
pub const PATROL_HALF_SIZE: f32 = 5.0;

/// Opacity of the car and arm outlines.
pub const LINE_OPACITY: f32 = 0.8;

pub const INITIAL_CAMERA_POSITION: Vec3 = Vec3::new(0.0, 12.0, 25.0);

pub mod palette {
    pub const INDIGO: u32 = 0x6366f1;
    pub const GREEN: u32 = 0x4ade80;
    pub const SKY: u32 = 0x0ea5e9;
    pub const ORANGE: u32 = 0xff6b35;
    pub const VIOLET: u32 = 0xa78bfa;
    pub const CYAN: u32 = 0x4ecdc4;
    pub const DARK: u32 = 0x333333;
}

/// Handles to the resources every actor shares.
#[derive(Debug, Clone, Copy)]
pub struct SharedResources {
    pub grid: GeometryHandle,
    pub car_body: GeometryHandle,
    pub wheel: GeometryHandle,
    pub arm_base: GeometryHandle,
    pub arm_segment: GeometryHandle,
    pub gripper_palm: GeometryHandle,
    pub gripper_jaw: GeometryHandle,

    pub grid_material: MaterialHandle,
    pub car_tints: [MaterialHandle; CAR_COUNT],
    pub wheel_material: MaterialHandle,
    pub accent: MaterialHandle,
    pub segment_material: MaterialHandle,
}

impl SharedResources {
    /// Registers the static geometries and materials.
    pub fn register(registry: &mut ResourceRegistry) -> Self {
        let grid = registry.add_geometry(create_grid(GRID_SIZE, GRID_DIVISIONS));
        let car_body = registry.add_geometry(create_box_edges(1.0, 0.8, 2.0));
        let wheel = registry.add_geometry(create_cylinder_edges(&CylinderOptions {
            radius_top: 0.2,
            radius_bottom: 0.2,
            height: 0.1,
            radial_segments: 8,
        }));
        let arm_base = registry.add_geometry(create_cylinder_edges(&CylinderOptions {
            radius_top: 1.0,
            radius_bottom: 1.2,
            height: 0.5,
            radial_segments: 16,
        }));
        let arm_segment = registry.add_geometry(create_box_edges(0.3, arm::SEGMENT_LENGTH, 0.3));
        let gripper_palm = registry.add_geometry(create_box_edges(0.8, 0.4, 0.2));
        let gripper_jaw = registry.add_geometry(create_box_edges(0.1, 0.4, 0.2));

        let grid_material = registry.add_material(Material::line("Grid", palette::INDIGO, 0.15));
        // The orange tint doubles as the arm's accent color.
        let accent = registry.add_material(Material::line("Orange", palette::ORANGE, LINE_OPACITY));
        let car_tints = [
            registry.add_material(Material::line("Green", palette::GREEN, LINE_OPACITY)),
            registry.add_material(Material::line("Sky", palette::SKY, LINE_OPACITY)),
            accent,
            registry.add_material(Material::line("Violet", palette::VIOLET, LINE_OPACITY)),
        ];
        let wheel_material = registry.add_material(Material::line("Wheel", palette::DARK, 0.6));
        let segment_material = registry.add_material(Material::line("ArmSegment", palette::CYAN, LINE_OPACITY));

        Self {
            grid,
            car_body,
            wheel,
            arm_base,
            arm_segment,
            gripper_palm,
            gripper_jaw,
            grid_material,
            car_tints,
            wheel_material,
            accent,
            segment_material,
        }
    }
}

/// The assembled scene with all of its actors.
pub struct HeroScene {
    pub scene: Scene,
    pub registry: ResourceRegistry,
    pub camera: Camera,
    pub camera_rig: CameraRig,
    pub grid: NodeHandle,
    pub particles: ParticleField,
    pub arm: RoboticArm,
    pub cars: Vec<RobotCar>,
    pub shared: SharedResources,
    /// Seed the random layout was drawn from.
    pub seed: u64,
}

pub struct SceneBuilder<'a> {
    settings: &'a HeroSettings,
    width: u32,
    height: u32,
}

impl<'a> SceneBuilder<'a> {
    #[must_use]
    pub fn new(settings: &'a HeroSettings) -> Self {
        Self {
            settings,
            width: 1,
            height: 1,
        }
    }

    /// Viewport size used for the initial camera aspect ratio.
    #[must_use]
    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn build(self) -> HeroScene {
        let seed = self.settings.scene.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);

        let mut scene = Scene::new();
        let mut registry = ResourceRegistry::new();
        let shared = SharedResources::register(&mut registry);

        let camera = self.build_camera();
        let camera_rig = CameraRig::new(&self.settings.camera);

        let grid = scene.add_node(Node::with_name("Grid").at(Vec3::new(0.0, GRID_HEIGHT, 0.0)));
        scene.set_mesh(grid, Mesh::new(shared.grid, shared.grid_material));

        let particles = build_particles(&mut scene, &mut registry, &mut rng, self.settings.scene.particle_count);
        let arm = build_arm(&mut scene, &shared);

        let (speed_min, speed_max) = speed_range(&self.settings.scene);
        let cars = PATROL_CENTERS
            .iter()
            .enumerate()
            .map(|(i, &center)| {
                let path = PatrolPath::square(center, PATROL_HALF_SIZE);
                let speed = rng.random_range(speed_min..=speed_max);
                build_car(&mut scene, &shared, i, CarMotion::new(path, speed, i as f32))
            })
            .collect::<Vec<_>>();

        scene.update_matrix_world();

        log::info!(
            "Hero scene built: {} nodes, {} cars, {} particles, {} geometries, {} materials (seed {seed})",
            scene.node_count(),
            cars.len(),
            particles.len(),
            registry.geometry_count(),
            registry.material_count(),
        );

        HeroScene {
            scene,
            registry,
            camera,
            camera_rig,
            grid,
            particles,
            arm,
            cars,
            shared,
            seed,
        }
    }

    fn build_camera(&self) -> Camera {
        let settings = &self.settings.camera;
        let aspect = if self.width > 0 && self.height > 0 {
            self.width as f32 / self.height as f32
        } else {
            1.0
        };
        let mut camera = Camera::new_perspective(settings.fov_degrees, aspect, settings.near, settings.far);
        camera.transform.position = INITIAL_CAMERA_POSITION;
        camera.look_at(Vec3::ZERO);
        camera.update_view_projection();
        camera
    }
}

/// Slowest a car may drive, in units per second.
pub const MIN_CAR_SPEED: f32 = 0.01;

/// Ordered speed bounds. Unvalidated settings with a reversed range are
/// swapped, non-positive speeds are raised to [`MIN_CAR_SPEED`] and
/// non-finite ones fall back to the defaults.
fn speed_range(settings: &SceneSettings) -> (f32, f32) {
    let (a, b) = (settings.car_speed_min, settings.car_speed_max);
    if a.is_finite() && b.is_finite() {
        (a.min(b).max(MIN_CAR_SPEED), a.max(b).max(MIN_CAR_SPEED))
    } else {
        let defaults = SceneSettings::default();
        (defaults.car_speed_min, defaults.car_speed_max)
    }
}

fn build_particles(
    scene: &mut Scene,
    registry: &mut ResourceRegistry,
    rng: &mut StdRng,
    count: usize,
) -> ParticleField {
    let layout = ParticleLayout::scatter(rng, count);
    let geometry = registry.add_geometry(layout.geometry());
    let material = registry.add_material(ParticleLayout::material());

    let node = scene.add_node(Node::with_name("Particles"));
    scene.set_mesh(node, Mesh::new(geometry, material));

    ParticleField::new(geometry, layout)
}

fn build_arm(scene: &mut Scene, shared: &SharedResources) -> RoboticArm {
    let half = arm::SEGMENT_LENGTH / 2.0;

    let base = scene.add_node(Node::with_name("ArmBase").at(ARM_HOME));
    scene.set_mesh(base, Mesh::new(shared.arm_base, shared.accent));

    let lower = scene.add_to_parent(
        Node::with_name("ArmLower").at(Vec3::new(0.0, arm::SHOULDER_HEIGHT, 0.0)),
        base,
    );
    let lower_segment = scene.add_to_parent(Node::with_name("ArmLowerSegment").at(Vec3::Y * half), lower);
    scene.set_mesh(lower_segment, Mesh::new(shared.arm_segment, shared.segment_material));

    let upper = scene.add_to_parent(
        Node::with_name("ArmUpper").at(Vec3::Y * arm::SEGMENT_LENGTH),
        lower,
    );
    let upper_segment = scene.add_to_parent(Node::with_name("ArmUpperSegment").at(Vec3::Y * half), upper);
    scene.set_mesh(upper_segment, Mesh::new(shared.arm_segment, shared.segment_material));

    let gripper = scene.add_to_parent(
        Node::with_name("Gripper").at(Vec3::Y * arm::SEGMENT_LENGTH),
        upper,
    );
    scene.set_mesh(gripper, Mesh::new(shared.gripper_palm, shared.accent));

    let jaw_x = arm::JAW_OFFSET + arm::GRIPPER_OPEN;
    let jaws = [
        ("GripperJawLeft", -jaw_x),
        ("GripperJawRight", jaw_x),
    ]
    .map(|(name, x)| {
        let jaw = scene.add_to_parent(Node::with_name(name).at(Vec3::new(x, arm::JAW_HEIGHT, 0.0)), gripper);
        scene.set_mesh(jaw, Mesh::new(shared.gripper_jaw, shared.accent));
        jaw
    });

    RoboticArm::new(
        ArmNodes {
            base,
            lower,
            upper,
            gripper,
            jaws,
        },
        ARM_HOME,
    )
}

fn build_car(scene: &mut Scene, shared: &SharedResources, index: usize, motion: CarMotion) -> RobotCar {
    let mut body = Node::with_name(format!("Car{index}")).at(motion.position());
    body.transform.set_yaw(motion.yaw());
    let root = scene.add_node(body);
    scene.set_mesh(root, Mesh::new(shared.car_body, shared.car_tints[index % CAR_COUNT]));

    let wheels = std::array::from_fn(|w| {
        let mut node = Node::with_name(format!("Car{index}.Wheel{w}")).at(WHEEL_OFFSETS[w]);
        node.transform.rotation = RobotCar::wheel_rotation(0.0);
        let wheel = scene.add_to_parent(node, root);
        scene.set_mesh(wheel, Mesh::new(shared.wheel, shared.wheel_material));
        wheel
    });

    RobotCar { root, wheels, motion }
}
