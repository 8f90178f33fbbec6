use crate::resources::geometry::Geometry;

/// Square ground grid in the XZ plane, centred on the origin.
///
/// `divisions` cells per side give `divisions + 1` lines in each direction.
#[must_use]
pub fn create_grid(size: f32, divisions: u32) -> Geometry {
    let divisions = divisions.max(1);
    let half = size / 2.0;
    let step = size / divisions as f32;

    let mut positions = Vec::with_capacity((divisions as usize + 1) * 4);
    for i in 0..=divisions {
        let k = -half + i as f32 * step;
        positions.push([-half, 0.0, k]);
        positions.push([half, 0.0, k]);
        positions.push([k, 0.0, -half]);
        positions.push([k, 0.0, half]);
    }

    Geometry::lines("Grid", positions)
}
