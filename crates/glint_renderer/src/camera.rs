//! Camera for ray generation.

use glint_core::{CameraConfig, ConfigError};
use glint_math::vector::random_in_unit_disk;
use glint_math::{Point3, Ray, Vec3};
use rand::{Rng, RngCore};

/// Camera for generating rays into the scene.
///
/// Everything is derived from a [`CameraConfig`] once at construction and
/// stays fixed for the lifetime of the camera.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    image_width: u32,
    image_height: u32,
    samples_per_pixel: u32,
    max_depth: u32,

    defocus_angle: f32,

    center: Point3,
    pixel00_loc: Point3, // Center of pixel (0, 0)
    pixel_delta_u: Vec3, // Offset to the pixel on the right
    pixel_delta_v: Vec3, // Offset to the pixel below
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
    samples_scale: f32,
}

impl Camera {
    /// Build a camera from its configuration.
    ///
    /// The configuration is not validated; see [`Camera::try_new`].
    pub fn new(config: &CameraConfig) -> Self {
        let image_width = config.image_width;
        let image_height = config.image_height();
        let center = config.look_from;

        // Calculate viewport dimensions
        let theta = config.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * config.focus_distance;
        let viewport_width = viewport_height * (image_width as f32 / image_height as f32);

        // Calculate camera basis vectors
        let w = (config.look_from - config.look_at).normalize();
        let u = config.vup.cross(w).normalize();
        let v = w.cross(u);

        // Vectors across the horizontal and down the vertical viewport edges
        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;

        let pixel_delta_u = viewport_u / image_width as f32;
        let pixel_delta_v = viewport_v / image_height as f32;

        let viewport_upper_left =
            center - config.focus_distance * w - viewport_u / 2.0 - viewport_v / 2.0;
        let pixel00_loc = viewport_upper_left + 0.5 * (pixel_delta_u + pixel_delta_v);

        // Calculate defocus disk basis vectors
        let defocus_radius =
            config.focus_distance * (config.defocus_angle / 2.0).to_radians().tan();

        Self {
            image_width,
            image_height,
            samples_per_pixel: config.samples_per_pixel,
            max_depth: config.max_depth,
            defocus_angle: config.defocus_angle,
            center,
            pixel00_loc,
            pixel_delta_u,
            pixel_delta_v,
            u,
            v,
            w,
            defocus_disk_u: u * defocus_radius,
            defocus_disk_v: v * defocus_radius,
            samples_scale: 1.0 / config.samples_per_pixel as f32,
        }
    }

    /// Validate the configuration, then build the camera.
    pub fn try_new(config: &CameraConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Generate a ray for pixel (i, j) with random sampling.
    ///
    /// The ray starts at the camera center, or on the defocus disk when
    /// depth of field is enabled, and aims at a random point within the
    /// pixel's square.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        Ray::new(ray_origin, pixel_sample - ray_origin)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Point3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    /// Camera frame: `u` right, `v` up, `w` backward (opposite the view direction).
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    /// Get the samples scale factor (1 / samples_per_pixel).
    pub fn samples_scale(&self) -> f32 {
        self.samples_scale
    }
}

/// Sample a random point in the unit square [-0.5, 0.5) x [-0.5, 0.5).
fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(rng.gen::<f32>() - 0.5, rng.gen::<f32>() - 0.5, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_camera_basis() {
        let camera = Camera::new(
            &CameraConfig::new()
                .with_resolution(800, 600)
                .with_position(Point3::ZERO, Point3::new(0.0, 0.0, -1.0), Vec3::Y)
                .with_lens(90.0, 0.0, 1.0),
        );

        let (u, v, w) = camera.basis();
        assert_eq!(camera.center(), Point3::ZERO);
        assert!((u - Vec3::X).length() < 1e-6);
        assert!((v - Vec3::Y).length() < 1e-6);
        assert!((w - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_camera_basis_is_orthonormal_for_oblique_view() {
        let camera = Camera::new(
            &CameraConfig::new()
                .with_position(Point3::new(-2.0, 2.0, 1.0), Point3::new(0.0, 0.0, -1.0), Vec3::Y)
                .with_lens(20.0, 10.0, 3.4),
        );

        let (u, v, w) = camera.basis();
        for axis in [u, v, w] {
            assert!((axis.length() - 1.0).abs() < 1e-5);
        }
        assert!(u.dot(v).abs() < 1e-5);
        assert!(v.dot(w).abs() < 1e-5);
        assert!(w.dot(u).abs() < 1e-5);
        // Looking from look_from toward look_at means -w points at the target
        let to_target = (Point3::new(0.0, 0.0, -1.0) - Point3::new(-2.0, 2.0, 1.0)).normalize();
        assert!((-w - to_target).length() < 1e-5);
    }

    #[test]
    fn test_pixel_grid_geometry() {
        // 90 degree fov at focus distance 1 gives a 2x2 viewport for a square image
        let camera = Camera::new(&CameraConfig::new().with_aspect_ratio(1.0, 100));

        assert_eq!(camera.image_height(), 100);
        assert!((camera.pixel_delta_u - Vec3::new(0.02, 0.0, 0.0)).length() < 1e-6);
        assert!((camera.pixel_delta_v - Vec3::new(0.0, -0.02, 0.0)).length() < 1e-6);
        assert!((camera.pixel00_loc - Point3::new(-0.99, 0.99, -1.0)).length() < 1e-5);
        assert!((camera.samples_scale() - 0.1).abs() < 1e-7);
    }

    #[test]
    fn test_rays_stay_within_pixel() {
        let camera = Camera::new(&CameraConfig::new().with_aspect_ratio(1.0, 100));
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..500 {
            let ray = camera.get_ray(10, 20, &mut rng);
            assert_eq!(ray.origin(), Point3::ZERO);

            // Pinhole rays reach the focus plane (z = -1) inside pixel (10, 20)
            let target = ray.at(1.0);
            assert!((target.z + 1.0).abs() < 1e-6);
            let x = (target.x + 1.0) / 0.02;
            let y = (1.0 - target.y) / 0.02;
            assert!((9.999..=11.001).contains(&x), "x = {}", x);
            assert!((19.999..=21.001).contains(&y), "y = {}", y);
        }
    }

    #[test]
    fn test_center_ray_direction() {
        let camera = Camera::new(&CameraConfig::new().with_resolution(100, 100));
        let mut rng = StdRng::seed_from_u64(42);

        // Center ray should point roughly towards -Z
        let ray = camera.get_ray(50, 50, &mut rng);
        assert!(ray.direction().z < 0.0);
        assert!(ray.direction().x.abs() < 0.05);
        assert!(ray.direction().y.abs() < 0.05);
    }

    #[test]
    fn test_defocus_origins_lie_on_disk() {
        let focus_distance = 10.0;
        let defocus_angle = 2.0;
        let camera = Camera::new(
            &CameraConfig::new()
                .with_aspect_ratio(1.0, 50)
                .with_lens(40.0, defocus_angle, focus_distance),
        );
        let radius = focus_distance * (defocus_angle / 2.0f32).to_radians().tan();
        let mut rng = StdRng::seed_from_u64(3);

        let mut moved = 0;
        for _ in 0..200 {
            let ray = camera.get_ray(25, 25, &mut rng);
            let origin = ray.origin();
            assert!(origin.z.abs() < 1e-6, "origin leaves the lens plane");
            assert!(origin.length() <= radius + 1e-5);
            if origin.length() > 1e-4 {
                moved += 1;
            }
            // Every ray still passes through the focus plane near the pixel
            let hit = ray.at(1.0);
            assert!((hit.z + focus_distance).abs() < 1e-3);
        }
        assert!(moved > 150);
    }

    #[test]
    fn test_try_new_rejects_invalid_config() {
        let config = CameraConfig::new().with_quality(0, 5);
        assert_eq!(Camera::try_new(&config).unwrap_err(), ConfigError::ZeroSamples);
        assert!(Camera::try_new(&CameraConfig::default()).is_ok());
    }
}
