//! Shared resource storage.
//!
//! Geometries and materials are allocated here once and referenced from
//! meshes by handle. The registry counts every allocation ever made, which
//! is how the scene builder (and its tests) check that no resource was
//! created per actor.

use slotmap::SlotMap;

use crate::resources::geometry::Geometry;
use crate::resources::material::Material;
use crate::resources::{GeometryHandle, MaterialHandle};

#[derive(Default)]
pub struct ResourceRegistry {
    geometries: SlotMap<GeometryHandle, Geometry>,
    materials: SlotMap<MaterialHandle, Material>,

    geometry_allocations: usize,
    material_allocations: usize,
}

impl ResourceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryHandle {
        log::trace!(
            "Registering geometry '{}' ({} vertices)",
            geometry.name,
            geometry.vertex_count()
        );
        self.geometry_allocations += 1;
        self.geometries.insert(geometry)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialHandle {
        log::trace!("Registering material '{}'", material.name);
        self.material_allocations += 1;
        self.materials.insert(material)
    }

    #[inline]
    #[must_use]
    pub fn geometry(&self, handle: GeometryHandle) -> Option<&Geometry> {
        self.geometries.get(handle)
    }

    #[inline]
    #[must_use]
    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(handle)
    }

    /// Rewrites the positions of a dynamic geometry (the particle field).
    pub fn update_geometry_positions(
        &mut self,
        handle: GeometryHandle,
        positions: &[[f32; 3]],
    ) -> bool {
        self.geometries
            .get_mut(handle)
            .is_some_and(|g| g.update_positions(positions))
    }

    #[must_use]
    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    #[must_use]
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Total geometries ever registered.
    #[must_use]
    pub fn geometry_allocations(&self) -> usize {
        self.geometry_allocations
    }

    /// Total materials ever registered.
    #[must_use]
    pub fn material_allocations(&self) -> usize {
        self.material_allocations
    }
}
