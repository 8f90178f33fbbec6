//! Floating background particles.
//!
//! Every particle bobs on its own sine around the point it was scattered
//! to. The offset is recomputed from the rest position each frame, so the
//! field never drifts.

use glam::Vec3;
use rand::RngExt;
use rand::rngs::StdRng;

use crate::resources::{Geometry, GeometryHandle, Material, ResourceRegistry};

/// Largest vertical distance a particle ever moves from its rest position.
pub const PARTICLE_AMPLITUDE: f32 = 0.6;

/// Particles are scattered in `[-EXTENT, EXTENT]` on each axis.
pub const PARTICLE_EXTENT: Vec3 = Vec3::new(30.0, 15.0, 30.0);

pub const PARTICLE_SIZE: f32 = 0.15;
pub const PARTICLE_OPACITY: f32 = 0.6;

/// Randomized rest positions, phases and colors for a particle field.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleLayout {
    pub positions: Vec<Vec3>,
    pub phases: Vec<f32>,
    pub colors: Vec<[f32; 3]>,
}

impl ParticleLayout {
    /// Scatters `count` particles through the field volume.
    pub fn scatter(rng: &mut StdRng, count: usize) -> Self {
        let mut positions = Vec::with_capacity(count);
        let mut phases = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);

        for _ in 0..count {
            positions.push(Vec3::new(
                rng.random_range(-PARTICLE_EXTENT.x..PARTICLE_EXTENT.x),
                rng.random_range(-PARTICLE_EXTENT.y..PARTICLE_EXTENT.y),
                rng.random_range(-PARTICLE_EXTENT.z..PARTICLE_EXTENT.z),
            ));
            phases.push(rng.random_range(0.0..std::f32::consts::TAU));

            // Violet-blue family: blue fixed, red and green scaled together.
            let tint: f32 = rng.random_range(0.0..1.0);
            colors.push([0.6 + 0.4 * tint, 0.4 + 0.4 * tint, 1.0]);
        }

        Self {
            positions,
            phases,
            colors,
        }
    }

    /// Point geometry at the rest positions.
    #[must_use]
    pub fn geometry(&self) -> Geometry {
        Geometry::points(
            "Particles",
            self.positions.iter().map(|p| p.to_array()).collect(),
            Some(self.colors.clone()),
        )
    }

    #[must_use]
    pub fn material() -> Material {
        Material::points("Particles", PARTICLE_SIZE, PARTICLE_OPACITY)
    }
}

/// The particle actor. Owns the rest positions; the animated positions live
/// in its geometry inside the [`ResourceRegistry`].
#[derive(Debug, Clone)]
pub struct ParticleField {
    pub geometry: GeometryHandle,
    rest_positions: Vec<Vec3>,
    phases: Vec<f32>,
    scratch: Vec<[f32; 3]>,
}

impl ParticleField {
    #[must_use]
    pub fn new(geometry: GeometryHandle, layout: ParticleLayout) -> Self {
        let scratch = Vec::with_capacity(layout.positions.len());
        Self {
            geometry,
            rest_positions: layout.positions,
            phases: layout.phases,
            scratch,
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rest_positions.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rest_positions.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn rest_positions(&self) -> &[Vec3] {
        &self.rest_positions
    }

    /// Vertical offset of particle `index` at scene time `time`.
    #[inline]
    #[must_use]
    pub fn offset_at(&self, index: usize, time: f32) -> f32 {
        match (self.rest_positions.get(index), self.phases.get(index)) {
            (Some(rest), Some(&phase)) => drift(*rest, phase, time),
            _ => 0.0,
        }
    }

    /// Writes this frame's positions into the particle geometry.
    pub fn update(&mut self, registry: &mut ResourceRegistry, time: f32) {
        self.scratch.clear();
        self.scratch.extend(
            self.rest_positions
                .iter()
                .zip(&self.phases)
                .map(|(&rest, &phase)| [rest.x, rest.y + drift(rest, phase, time), rest.z]),
        );

        if !registry.update_geometry_positions(self.geometry, &self.scratch) {
            log::warn!("Particle geometry {:?} missing or resized", self.geometry);
        }
    }
}

fn drift(rest: Vec3, phase: f32, time: f32) -> f32 {
    (time + rest.x + phase).sin() * PARTICLE_AMPLITUDE
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn scatter_stays_in_volume() {
        let mut rng = StdRng::seed_from_u64(7);
        let layout = ParticleLayout::scatter(&mut rng, 200);
        assert_eq!(layout.positions.len(), 200);
        for p in &layout.positions {
            assert!(p.abs().cmple(PARTICLE_EXTENT).all(), "{p}");
        }
        for c in &layout.colors {
            assert!((0.6..=1.0).contains(&c[0]));
            assert!((0.4..=0.8).contains(&c[1]));
            assert_eq!(c[2], 1.0);
        }
    }

    #[test]
    fn offset_outside_the_field_is_zero() {
        let layout = ParticleLayout::scatter(&mut StdRng::seed_from_u64(5), 4);
        let field = ParticleField::new(GeometryHandle::default(), layout);
        assert_eq!(field.offset_at(4, 1.0), 0.0);
    }

    #[test]
    fn same_seed_same_layout() {
        let a = ParticleLayout::scatter(&mut StdRng::seed_from_u64(3), 10);
        let b = ParticleLayout::scatter(&mut StdRng::seed_from_u64(3), 10);
        assert_eq!(a, b);
    }

    #[test]
    fn update_keeps_particles_near_rest() {
        let mut rng = StdRng::seed_from_u64(11);
        let layout = ParticleLayout::scatter(&mut rng, 32);
        let mut registry = ResourceRegistry::new();
        let handle = registry.add_geometry(layout.geometry());
        let mut field = ParticleField::new(handle, layout);

        for step in 0..500 {
            let t = step as f32 * 0.37;
            field.update(&mut registry, t);
            let geometry = registry.geometry(handle).unwrap();
            for (i, (now, rest)) in geometry.positions().iter().zip(field.rest_positions()).enumerate() {
                assert_eq!(now[0], rest.x);
                assert_eq!(now[2], rest.z);
                assert_eq!(now[1], rest.y + field.offset_at(i, t));
                assert!(field.offset_at(i, t).abs() <= PARTICLE_AMPLITUDE);
            }
        }
    }
}
