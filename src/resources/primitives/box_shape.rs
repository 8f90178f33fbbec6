use crate::resources::geometry::Geometry;

/// Edge outline of an axis-aligned box centred on the origin: 12 segments.
#[must_use]
pub fn create_box_edges(width: f32, height: f32, depth: f32) -> Geometry {
    let w = width / 2.0;
    let h = height / 2.0;
    let d = depth / 2.0;

    let corners = [
        [-w, -h, d],
        [w, -h, d],
        [w, h, d],
        [-w, h, d],
        [-w, -h, -d],
        [w, -h, -d],
        [w, h, -d],
        [-w, h, -d],
    ];

    // Front ring, back ring, then the four connecting edges.
    const EDGES: [(usize, usize); 12] = [
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 0),
        (4, 5),
        (5, 6),
        (6, 7),
        (7, 4),
        (0, 4),
        (1, 5),
        (2, 6),
        (3, 7),
    ];

    let positions = EDGES
        .iter()
        .flat_map(|&(a, b)| [corners[a], corners[b]])
        .collect();

    Geometry::lines("BoxEdges", positions)
}
