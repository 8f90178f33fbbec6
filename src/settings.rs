//! Hero Scene Settings
//!
//! Configuration for scene population, the orbiting camera and the GPU
//! backend. Every field has a default matching the shipped page, so an empty
//! JSON object (or no file at all) yields the stock scene.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use hero_scene::HeroSettings;
//!
//! let settings = HeroSettings::from_json_str(r#"{ "scene": { "particle_count": 120 } }"#)?;
//! assert_eq!(settings.scene.particle_count, 120);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{HeroError, Result};

/// Upper bound on the particle field size accepted by [`HeroSettings::validate`].
pub const MAX_PARTICLES: usize = 100_000;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HeroSettings {
    pub scene: SceneSettings,
    pub camera: CameraSettings,
    pub render: RenderSettings,
}

/// Scene population parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Number of floating points in the particle field.
    pub particle_count: usize,
    /// Lower bound of the randomized car speed, in units per second.
    pub car_speed_min: f32,
    /// Upper bound of the randomized car speed, in units per second.
    pub car_speed_max: f32,
    /// Seed for speeds, particle placement and phases. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            particle_count: 50,
            car_speed_min: 1.2,
            car_speed_max: 3.0,
            seed: None,
        }
    }
}

/// Perspective camera and orbit rig parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub orbit_radius: f32,
    pub orbit_height: f32,
    /// Angular speed of the orbit, in radians per second.
    pub orbit_speed: f32,
    pub look_at: [f32; 3],
    /// Fraction of the remaining distance covered per 60 Hz frame.
    pub smoothing: f32,
    /// World units of camera offset at full pointer deflection.
    pub parallax: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            orbit_radius: 25.0,
            orbit_height: 12.0,
            orbit_speed: 0.1,
            look_at: [0.0, -2.0, 0.0],
            smoothing: 0.05,
            parallax: 2.0,
        }
    }
}

/// GPU backend parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub vsync: bool,
    /// Prefer the discrete GPU when one is available.
    pub high_performance: bool,
    /// Linear RGBA clear color. The page renders over a transparent canvas.
    pub clear_color: [f64; 4],
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            vsync: true,
            high_performance: true,
            clear_color: [0.02, 0.02, 0.05, 1.0],
        }
    }
}

impl RenderSettings {
    #[must_use]
    pub fn power_preference(&self) -> wgpu::PowerPreference {
        if self.high_performance {
            wgpu::PowerPreference::HighPerformance
        } else {
            wgpu::PowerPreference::LowPower
        }
    }

    #[must_use]
    pub fn wgpu_clear_color(&self) -> wgpu::Color {
        let [r, g, b, a] = self.clear_color;
        wgpu::Color { r, g, b, a }
    }
}

impl HeroSettings {
    /// Parses and validates settings from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads, parses and validates a JSON settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&text)?;
        log::info!("Loaded hero settings from {}", path.display());
        Ok(settings)
    }

    /// Rejects configurations that cannot produce a sensible scene.
    pub fn validate(&self) -> Result<()> {
        let scene = &self.scene;
        if !(scene.car_speed_min > 0.0 && scene.car_speed_min <= scene.car_speed_max) {
            return Err(HeroError::InvalidSettings(format!(
                "car speed range [{}, {}] must be positive and ordered",
                scene.car_speed_min, scene.car_speed_max
            )));
        }
        if scene.particle_count > MAX_PARTICLES {
            return Err(HeroError::InvalidSettings(format!(
                "particle_count {} exceeds {MAX_PARTICLES}",
                scene.particle_count
            )));
        }

        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(HeroError::InvalidSettings(format!(
                "fov_degrees {} must lie in (0, 180)",
                camera.fov_degrees
            )));
        }
        if !(camera.near > 0.0 && camera.near < camera.far) {
            return Err(HeroError::InvalidSettings(format!(
                "clip range [{}, {}] must satisfy 0 < near < far",
                camera.near, camera.far
            )));
        }
        if !(0.0..=1.0).contains(&camera.smoothing) {
            return Err(HeroError::InvalidSettings(format!(
                "camera smoothing {} must lie in [0, 1]",
                camera.smoothing
            )));
        }
        Ok(())
    }
}
