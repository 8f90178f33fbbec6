use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec3;

/// How the vertex list is assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    /// Every two vertices form one segment (edge outlines, grid lines).
    LineList,
    /// Every vertex is one point (particle field).
    PointList,
}

/// Axis-aligned bounds in geometry space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub const EMPTY: Self = Self {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    #[must_use]
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a [f32; 3]>) -> Self {
        points.into_iter().fold(Self::EMPTY, |bb, p| {
            let p = Vec3::from_array(*p);
            Self {
                min: bb.min.min(p),
                max: bb.max.max(p),
            }
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

static NEXT_GEOMETRY_VERSION: AtomicU64 = AtomicU64::new(1);

/// CPU-side line or point geometry.
///
/// Vertex data is plain `[f32; 3]` arrays so it can be uploaded with
/// `bytemuck` as-is. Every mutation bumps [`version`](Self::version), which
/// the GPU backend uses to decide when to re-upload.
#[derive(Debug, Clone)]
pub struct Geometry {
    pub name: Cow<'static, str>,
    topology: Topology,
    positions: Vec<[f32; 3]>,
    colors: Option<Vec<[f32; 3]>>,
    version: u64,
    bounding_box: BoundingBox,
}

impl Geometry {
    /// Segment list geometry; `positions.len()` should be even.
    #[must_use]
    pub fn lines(name: impl Into<Cow<'static, str>>, positions: Vec<[f32; 3]>) -> Self {
        debug_assert!(positions.len() % 2 == 0, "line list needs vertex pairs");
        Self::build(name.into(), Topology::LineList, positions, None)
    }

    /// Point cloud geometry with optional per-point colors.
    #[must_use]
    pub fn points(
        name: impl Into<Cow<'static, str>>,
        positions: Vec<[f32; 3]>,
        colors: Option<Vec<[f32; 3]>>,
    ) -> Self {
        Self::build(name.into(), Topology::PointList, positions, colors)
    }

    fn build(
        name: Cow<'static, str>,
        topology: Topology,
        positions: Vec<[f32; 3]>,
        colors: Option<Vec<[f32; 3]>>,
    ) -> Self {
        let colors = colors.filter(|c| c.len() == positions.len());
        let bounding_box = BoundingBox::from_points(&positions);
        Self {
            name,
            topology,
            positions,
            colors,
            version: NEXT_GEOMETRY_VERSION.fetch_add(1, Ordering::Relaxed),
            bounding_box,
        }
    }

    #[inline]
    #[must_use]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    #[inline]
    #[must_use]
    pub fn colors(&self) -> Option<&[[f32; 3]]> {
        self.colors.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> u32 {
        self.positions.len() as u32
    }

    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[inline]
    #[must_use]
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    /// Replaces vertex positions in place. The vertex count must not change;
    /// a mismatched slice is rejected and `false` returned.
    pub fn update_positions(&mut self, positions: &[[f32; 3]]) -> bool {
        if positions.len() != self.positions.len() {
            return false;
        }
        self.positions.copy_from_slice(positions);
        self.bounding_box = BoundingBox::from_points(&self.positions);
        self.version = NEXT_GEOMETRY_VERSION.fetch_add(1, Ordering::Relaxed);
        true
    }
}
