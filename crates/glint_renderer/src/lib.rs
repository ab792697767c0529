//! Glint Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer over spheres with diffuse, metallic and
//! glass materials. Rays are generated per pixel with antialiasing jitter
//! and optional depth of field, then bounced recursively until they escape
//! to the sky, get absorbed, or run out of bounces.

mod camera;
mod hittable;
mod material;
mod renderer;
mod sphere;
mod worker;
mod world;

pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use renderer::{
    color_to_rgba, colors_to_rgba, linear_to_gamma, ray_color, render, render_parallel,
    render_pixel, render_row, render_seeded, row_rng, sky_gradient, ImageBuffer, MIN_HIT_DISTANCE,
};
pub use sphere::Sphere;
pub use worker::{RenderEvent, RenderWorker, WorkerError};
pub use world::{build_world, material_from_description};

/// Re-export math and scene description types
pub use glint_core::{CameraConfig, RenderRequest, SceneDescription, StreamMode};
pub use glint_math::{Color, Interval, Point3, Ray, Vec3};
