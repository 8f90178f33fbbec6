use std::borrow::Cow;

use glam::{Vec3, Vec4};

/// Converts a `0xRRGGBB` sRGB color into linear RGB.
#[must_use]
pub fn linear_from_hex(hex: u32) -> Vec3 {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    Vec3::new(channel(16), channel(8), channel(0))
}

#[inline]
#[must_use]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Unlit line/point material.
///
/// Materials are shared between many meshes, so they are normally set up
/// once at scene construction and left alone afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: Cow<'static, str>,
    /// Linear RGB.
    pub color: Vec3,
    pub opacity: f32,
    pub transparent: bool,
    /// Multiply by the geometry's per-vertex colors when it has them.
    pub vertex_colors: bool,
    /// Point size in world units (point geometry only).
    pub point_size: f32,
}

impl Material {
    /// Line material from an sRGB hex color.
    #[must_use]
    pub fn line(name: impl Into<Cow<'static, str>>, hex: u32, opacity: f32) -> Self {
        Self {
            name: name.into(),
            color: linear_from_hex(hex),
            opacity,
            transparent: opacity < 1.0,
            vertex_colors: false,
            point_size: 1.0,
        }
    }

    /// White point material tinted by per-vertex colors.
    #[must_use]
    pub fn points(name: impl Into<Cow<'static, str>>, point_size: f32, opacity: f32) -> Self {
        Self {
            name: name.into(),
            color: Vec3::ONE,
            opacity,
            transparent: opacity < 1.0,
            vertex_colors: true,
            point_size,
        }
    }

    /// Color and opacity packed for upload.
    #[inline]
    #[must_use]
    pub fn rgba(&self) -> Vec4 {
        self.color.extend(self.opacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_black_and_white() {
        assert_eq!(linear_from_hex(0x000000), Vec3::ZERO);
        let white = linear_from_hex(0xffffff);
        assert!((white - Vec3::ONE).length() < 1e-5);
    }

    #[test]
    fn hex_channels_are_ordered_rgb() {
        let c = linear_from_hex(0xff0000);
        assert!(c.x > 0.99 && c.y == 0.0 && c.z == 0.0);
    }

    #[test]
    fn translucent_line_is_transparent() {
        assert!(Material::line("m", 0x4ecdc4, 0.8).transparent);
        assert!(!Material::line("m", 0x4ecdc4, 1.0).transparent);
    }
}
