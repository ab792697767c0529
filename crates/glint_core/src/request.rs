//! Render requests and JSON loading.
//!
//! A [`RenderRequest`] is the one-shot input a render worker consumes: the
//! camera settings, the scene, and how results should be streamed back.
//! Scene files are JSON objects of the form
//! `{"camera": {...}, "scene": [...], "seed": 7, "stream": "rows"}`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{CameraConfig, ConfigError};
use crate::scene::{SceneDescription, SceneError};

/// Errors that can occur while loading a render request.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid camera: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid scene: {0}")]
    Scene(#[from] SceneError),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// How a worker reports a render back to its host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamMode {
    /// One message per finished row, then the whole frame
    #[default]
    Rows,
    /// Only the whole frame
    Frame,
}

/// Everything needed to render one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub scene: SceneDescription,
    /// Seed for the per-row random streams; random when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default)]
    pub stream: StreamMode,
}

impl RenderRequest {
    pub fn new(camera: CameraConfig, scene: SceneDescription) -> Self {
        Self {
            camera,
            scene,
            seed: None,
            stream: StreamMode::default(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_stream(mut self, stream: StreamMode) -> Self {
        self.stream = stream;
        self
    }

    /// Check the camera and every material name.
    pub fn validate(&self) -> LoadResult<()> {
        self.camera.validate()?;
        self.scene.validate()?;
        Ok(())
    }
}

/// Parse and validate a render request from a JSON string.
pub fn request_from_str(json: &str) -> LoadResult<RenderRequest> {
    let request: RenderRequest = serde_json::from_str(json)?;
    request.validate()?;
    Ok(request)
}

/// Load and validate a render request from a JSON file.
pub fn load_request<P: AsRef<Path>>(path: P) -> LoadResult<RenderRequest> {
    let path = path.as_ref();
    log::info!("Loading render request from {:?}", path);

    let contents = fs::read_to_string(path)?;
    let request = request_from_str(&contents)?;

    log::info!(
        "Loaded {} shapes, camera {}x{} @ {} spp",
        request.scene.len(),
        request.camera.image_width,
        request.camera.image_height(),
        request.camera.samples_per_pixel
    );
    Ok(request)
}
