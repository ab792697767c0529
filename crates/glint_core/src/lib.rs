//! Glint Core - declarative scene and camera descriptions.
//!
//! This crate provides:
//!
//! - **Scene descriptions**: an ordered list of shapes with material names
//! - **Camera configuration**: the user-facing camera settings with defaults
//! - **Render requests**: the one-shot message a render worker consumes,
//!   loadable from JSON
//!
//! # Example
//!
//! ```ignore
//! use glint_core::load_request;
//!
//! let request = load_request("scenes/two_spheres.json")?;
//! println!("{} shapes, {}x{}",
//!     request.scene.len(),
//!     request.camera.image_width,
//!     request.camera.image_height());
//! ```

pub mod config;
pub mod request;
pub mod scene;

// Re-export commonly used types
pub use config::{CameraConfig, ConfigError};
pub use request::{load_request, request_from_str, LoadError, LoadResult, RenderRequest, StreamMode};
pub use scene::{
    MaterialDescription, MaterialKind, SceneDescription, SceneError, ShapeDescription,
    SphereDescription,
};
