//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Anti-aliasing and depth of field via multi-sampling
//! - Gamma correction and 8-bit quantization
//!
//! Seeded renders give every row its own random stream, so the sequential,
//! streamed and parallel paths all produce the same image for a seed.

use std::ops::ControlFlow;

use crate::{Camera, Hittable};
use glint_math::{Color, Interval, Ray};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

/// Closest hit distance accepted after a bounce.
///
/// Scattered rays start exactly on a surface; round-off can put the origin
/// slightly below it, and a zero lower bound would re-hit the same surface.
pub const MIN_HIT_DISTANCE: f32 = 0.001;

/// Output range before scaling to bytes; stays below 1.0 so 256x never reaches 256.
const INTENSITY: Interval = Interval::new(0.0, 0.999);

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It traces the ray through
/// the scene, bouncing off surfaces until the ray escapes to the sky, is
/// absorbed, or `depth` bounces have been spent.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, depth: u32, rng: &mut dyn RngCore) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(MIN_HIT_DISTANCE, f32::INFINITY)) else {
        return sky_gradient(ray);
    };

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => result.attenuation * ray_color(&result.scattered, world, depth - 1, rng),
        None => Color::ZERO,
    }
}

/// Vertical white-to-blue sky, the only light source in the scene.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    (1.0 - a) * white + a * blue
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let to_byte = |c: f32| (256.0 * INTENSITY.clamp(linear_to_gamma(c))) as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z), 255]
}

/// Convert a run of linear colors to packed RGBA bytes.
pub fn colors_to_rgba(colors: &[Color]) -> Vec<u8> {
    colors.iter().flat_map(|&color| color_to_rgba(color)).collect()
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel() {
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, camera.max_depth(), rng);
    }

    pixel_color * camera.samples_scale()
}

/// Render one row of pixels, left to right.
pub fn render_row(
    camera: &Camera,
    world: &dyn Hittable,
    y: u32,
    rng: &mut dyn RngCore,
) -> Vec<Color> {
    (0..camera.image_width())
        .map(|x| render_pixel(camera, world, x, y, rng))
        .collect()
}

/// Random stream for row `y` of a seeded render.
pub fn row_rng(seed: u64, y: u32) -> StdRng {
    StdRng::seed_from_u64(seed ^ (y as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Image buffer of linear colors in row-major order, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Pixels of row `y`.
    pub fn row(&self, y: u32) -> &[Color] {
        let start = (y * self.width) as usize;
        &self.pixels[start..start + self.width as usize]
    }

    /// Overwrite row `y`. `colors` must be exactly one row wide.
    pub fn set_row(&mut self, y: u32, colors: &[Color]) {
        let start = (y * self.width) as usize;
        self.pixels[start..start + self.width as usize].copy_from_slice(colors);
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        colors_to_rgba(&self.pixels)
    }

    /// RGBA bytes of row `y`.
    pub fn row_to_rgba(&self, y: u32) -> Vec<u8> {
        colors_to_rgba(self.row(y))
    }
}

/// Render the entire scene to an image buffer.
///
/// Single-threaded, drawing every sample from one random source.
pub fn render(camera: &Camera, world: &dyn Hittable, rng: &mut dyn RngCore) -> ImageBuffer {
    let mut image = ImageBuffer::new(camera.image_width(), camera.image_height());

    for y in 0..camera.image_height() {
        for x in 0..camera.image_width() {
            let color = render_pixel(camera, world, x, y, rng);
            image.set(x, y, color);
        }
    }

    image
}

/// Render row by row from the top, calling `on_row` after each finished row.
///
/// Returning [`ControlFlow::Break`] from `on_row` abandons the render and
/// yields `None`.
pub fn render_seeded<F>(
    camera: &Camera,
    world: &dyn Hittable,
    seed: u64,
    mut on_row: F,
) -> Option<ImageBuffer>
where
    F: FnMut(u32, &[Color]) -> ControlFlow<()>,
{
    let mut image = ImageBuffer::new(camera.image_width(), camera.image_height());

    for y in 0..camera.image_height() {
        let mut rng = row_rng(seed, y);
        let row = render_row(camera, world, y, &mut rng);
        image.set_row(y, &row);

        log::debug!("Row {}/{} done", y + 1, camera.image_height());
        if on_row(y, &row).is_break() {
            log::debug!("Render abandoned after row {}", y);
            return None;
        }
    }

    Some(image)
}

/// Render rows in parallel with rayon.
///
/// Produces exactly the image [`render_seeded`] does for the same seed.
pub fn render_parallel(camera: &Camera, world: &dyn Hittable, seed: u64) -> ImageBuffer {
    let rows: Vec<Vec<Color>> = (0..camera.image_height())
        .into_par_iter()
        .map(|y| {
            let mut rng = row_rng(seed, y);
            render_row(camera, world, y, &mut rng)
        })
        .collect();

    ImageBuffer {
        width: camera.image_width(),
        height: camera.image_height(),
        pixels: rows.into_iter().flatten().collect(),
    }
}
