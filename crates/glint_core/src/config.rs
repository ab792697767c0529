//! Camera configuration.
//!
//! Every field has a default, so a scene file can give just the settings it
//! cares about. The defaults describe a pinhole camera at the origin looking
//! down -Z with a 90 degree vertical field of view, which puts a viewport of
//! height 2 at distance 1.

use glint_math::{vector::near_zero, Point3, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from an unusable camera configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Image width must be at least 1 pixel")]
    ZeroWidth,

    #[error("Samples per pixel must be at least 1")]
    ZeroSamples,

    #[error("Aspect ratio must be positive and finite, got {0}")]
    InvalidAspectRatio(f32),

    #[error("Vertical field of view must lie strictly between 0 and 180 degrees, got {0}")]
    InvalidFieldOfView(f32),

    #[error("Focus distance must be positive and finite, got {0}")]
    InvalidFocusDistance(f32),

    #[error(
        "Camera basis is degenerate: look_from {look_from:?}, look_at {look_at:?}, vup {vup:?}"
    )]
    DegenerateView {
        look_from: Point3,
        look_at: Point3,
        vup: Vec3,
    },
}

/// User-facing camera settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraConfig {
    /// Ratio of image width over height
    #[serde(alias = "aspectRadio")]
    pub aspect_ratio: f32,
    /// Rendered image width in pixels
    pub image_width: u32,
    /// Explicit image height; derived from width and aspect ratio when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_height: Option<u32>,
    /// Random samples per pixel
    pub samples_per_pixel: u32,
    /// Maximum number of ray bounces
    pub max_depth: u32,

    /// Vertical field of view in degrees
    #[serde(alias = "vFov")]
    pub vfov: f32,
    pub look_from: Point3,
    pub look_at: Point3,
    /// Camera-relative "up" hint
    pub vup: Vec3,

    /// Variation angle of rays through each pixel, in degrees
    pub defocus_angle: f32,
    /// Distance from camera to the plane of perfect focus
    #[serde(alias = "focusDist")]
    pub focus_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 1.0,
            image_width: 100,
            image_height: None,
            samples_per_pixel: 10,
            max_depth: 10,
            vfov: 90.0,
            look_from: Point3::ZERO,
            look_at: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            defocus_angle: 0.0,
            focus_distance: 1.0,
        }
    }
}

impl CameraConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set image width and aspect ratio; height is derived.
    pub fn with_aspect_ratio(mut self, aspect_ratio: f32, image_width: u32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self.image_width = image_width;
        self.image_height = None;
        self
    }

    /// Set an explicit image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = Some(height);
        self.aspect_ratio = width as f32 / height.max(1) as f32;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_distance: f32) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_distance = focus_distance;
        self
    }

    /// Image height in pixels, never less than 1.
    pub fn image_height(&self) -> u32 {
        match self.image_height {
            Some(height) => height.max(1),
            None => ((self.image_width as f32 / self.aspect_ratio) as u32).max(1),
        }
    }

    /// Reject settings the camera cannot be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image_width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(ConfigError::InvalidAspectRatio(self.aspect_ratio));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(ConfigError::InvalidFieldOfView(self.vfov));
        }
        if !(self.focus_distance.is_finite() && self.focus_distance > 0.0) {
            return Err(ConfigError::InvalidFocusDistance(self.focus_distance));
        }

        let w = self.look_from - self.look_at;
        if near_zero(w) || near_zero(self.vup.cross(w)) {
            return Err(ConfigError::DegenerateView {
                look_from: self.look_from,
                look_at: self.look_at,
                vup: self.vup,
            });
        }

        Ok(())
    }
}
