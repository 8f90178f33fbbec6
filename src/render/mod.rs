//! Rendering seam.
//!
//! The animation only ever talks to a [`RenderSurface`]: it asks for the
//! current size, resizes it, and hands it one [`RenderFrame`] per frame.
//! Two implementations ship with the crate:
//!
//! - [`WgpuSurface`]: the GPU backend drawing into a window surface
//! - [`HeadlessSurface`]: records what it was asked to draw, for tests and
//!   dry runs without a GPU

pub mod headless;
pub mod wgpu_surface;

pub use headless::HeadlessSurface;
pub use wgpu_surface::WgpuSurface;

use glam::{Mat4, Vec3};

use crate::resources::{GeometryHandle, MaterialHandle, ResourceRegistry};
use crate::scene::{Camera, Scene};

/// A target the scene can be drawn onto.
pub trait RenderSurface {
    /// Current size in physical pixels.
    fn size(&self) -> (u32, u32);

    /// Reconfigures the target for a new size.
    fn resize(&mut self, width: u32, height: u32);

    /// Draws one complete frame.
    fn draw(&mut self, frame: &RenderFrame<'_>);
}

/// One mesh to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub model: Mat4,
    pub geometry: GeometryHandle,
    pub material: MaterialHandle,
    pub transparent: bool,
}

/// Everything a surface needs to draw a frame: camera matrices, the draw
/// list, and the registry the handles resolve against.
pub struct RenderFrame<'a> {
    pub view_projection: Mat4,
    /// World-space camera basis, used to face point sprites at the viewer.
    pub camera_right: Vec3,
    pub camera_up: Vec3,
    /// Opaque items first, then transparent ones, each group in scene order.
    pub items: Vec<DrawItem>,
    pub registry: &'a ResourceRegistry,
}

impl<'a> RenderFrame<'a> {
    /// Collects every visible mesh. World matrices must be current, i.e.
    /// [`Scene::update_matrix_world`] has run this frame.
    #[must_use]
    pub fn extract(scene: &Scene, camera: &Camera, registry: &'a ResourceRegistry) -> Self {
        let mut items = Vec::with_capacity(scene.meshes.len());
        scene.for_each_visible_mesh(|world, mesh| {
            let transparent = registry
                .material(mesh.material)
                .is_some_and(|m| m.transparent);
            items.push(DrawItem {
                model: Mat4::from(*world),
                geometry: mesh.geometry,
                material: mesh.material,
                transparent,
            });
        });
        // Stable: keeps scene order inside each group.
        items.sort_by_key(|item| item.transparent);

        let camera_world = camera.transform.world_matrix();
        Self {
            view_projection: *camera.view_projection_matrix(),
            camera_right: Vec3::from(camera_world.matrix3.x_axis).normalize_or(Vec3::X),
            camera_up: Vec3::from(camera_world.matrix3.y_axis).normalize_or(Vec3::Y),
            items,
            registry,
        }
    }

    #[inline]
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Total vertices across all draw items.
    #[must_use]
    pub fn vertex_count(&self) -> u64 {
        self.items
            .iter()
            .filter_map(|item| self.registry.geometry(item.geometry))
            .map(|g| u64::from(g.vertex_count()))
            .sum()
    }
}
