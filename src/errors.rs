//! Error Types
//!
//! This module defines the error types used at the edges of the crate.
//!
//! # Overview
//!
//! The main error type [`HeroError`] covers the failure modes that can happen
//! outside the per-frame animation path:
//! - GPU initialization failures
//! - Settings loading and validation
//! - Window/event loop errors
//!
//! The animation itself never returns an error. A missing render target makes
//! the whole subsystem inert, and numeric edge cases hold the last good pose.
//!
//! # Usage
//!
//! ```rust,ignore
//! use hero_scene::errors::Result;
//! use hero_scene::HeroSettings;
//!
//! fn load() -> Result<HeroSettings> {
//!     HeroSettings::load("hero.json")
//! }
//! ```

use thiserror::Error;

/// The main error type for the hero scene.
#[derive(Error, Debug)]
pub enum HeroError {
    // ========================================================================
    // GPU & Rendering Errors
    // ========================================================================
    /// Failed to request a compatible GPU adapter.
    #[error("Failed to request WGPU adapter: {0}")]
    AdapterRequestFailed(String),

    /// Failed to create the GPU device.
    #[error("Failed to create WGPU device: {0}")]
    DeviceCreateFailed(#[from] wgpu::RequestDeviceError),

    /// Failed to create a presentation surface for the window.
    #[error("Failed to create render surface: {0}")]
    SurfaceCreateFailed(#[from] wgpu::CreateSurfaceError),

    /// The adapter cannot present to the surface.
    #[error("Surface not supported by adapter")]
    SurfaceUnsupported,

    /// Event loop error (winit).
    #[cfg(feature = "winit")]
    #[error("Event loop error: {0}")]
    EventLoopError(#[from] winit::error::EventLoopError),

    // ========================================================================
    // Settings Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Settings were parsed but describe an impossible scene.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

/// Alias for `Result<T, HeroError>`.
pub type Result<T> = std::result::Result<T, HeroError>;
