use std::f32::consts::TAU;

use crate::resources::geometry::Geometry;

/// Options for [`create_cylinder_edges`].
#[derive(Debug, Clone, Copy)]
pub struct CylinderOptions {
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub height: f32,
    pub radial_segments: u32,
}

impl Default for CylinderOptions {
    fn default() -> Self {
        Self {
            radius_top: 1.0,
            radius_bottom: 1.0,
            height: 1.0,
            radial_segments: 8,
        }
    }
}

/// Edge outline of a Y-aligned cylinder centred on the origin.
///
/// Produces the top ring, the bottom ring and one vertical edge per radial
/// segment, i.e. `3 * radial_segments` segments. Fewer than 3 segments is
/// raised to 3.
#[must_use]
pub fn create_cylinder_edges(options: &CylinderOptions) -> Geometry {
    let segments = options.radial_segments.max(3);
    let half_height = options.height / 2.0;

    let ring = |radius: f32, y: f32| -> Vec<[f32; 3]> {
        (0..segments)
            .map(|i| {
                let theta = i as f32 / segments as f32 * TAU;
                [radius * theta.sin(), y, radius * theta.cos()]
            })
            .collect()
    };
    let top = ring(options.radius_top, half_height);
    let bottom = ring(options.radius_bottom, -half_height);

    let n = segments as usize;
    let mut positions = Vec::with_capacity(n * 6);
    for i in 0..n {
        let next = (i + 1) % n;
        positions.extend_from_slice(&[top[i], top[next]]);
        positions.extend_from_slice(&[bottom[i], bottom[next]]);
        positions.extend_from_slice(&[top[i], bottom[i]]);
    }

    Geometry::lines("CylinderEdges", positions)
}
