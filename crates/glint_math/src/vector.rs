//! Vector helpers the renderer needs on top of glam.
//!
//! Everything here is a free function taking the random source explicitly, so
//! callers can seed it and get reproducible samples.

use glam::Vec3;
use rand::{Rng, RngCore};

/// A location in space.
pub type Point3 = Vec3;

/// Linear RGB triple, nominally in [0, 1] but sums may exceed 1 before tone mapping.
pub type Color = Vec3;

/// Components below this magnitude count as zero.
const NEAR_ZERO: f32 = 1e-8;

/// True if every component is within `1e-8` of zero.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    v.abs().max_element() < NEAR_ZERO
}

/// Uniform random vector with each component in `[min, max)`.
pub fn random_vec(rng: &mut dyn RngCore, min: f32, max: f32) -> Vec3 {
    Vec3::new(
        rng.gen_range(min..max),
        rng.gen_range(min..max),
        rng.gen_range(min..max),
    )
}

/// Uniformly distributed unit vector.
///
/// Rejection samples the cube `[-1, 1)^3` and keeps points inside the unit
/// ball before normalizing. Normalizing a raw cube sample would bias the
/// result toward the cube's corners.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_vec(rng, -1.0, 1.0);
        let len_sq = p.length_squared();
        if NEAR_ZERO < len_sq && len_sq <= 1.0 {
            return p / len_sq.sqrt();
        }
    }
}

/// Random point inside the unit disk on the z = 0 plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Mirror `v` about the unit normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract the unit vector `uv` through a surface with unit normal `n`.
///
/// `etai_over_etat` is the ratio of refraction indices across the boundary.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_near_zero() {
        assert!(near_zero(Vec3::ZERO));
        assert!(near_zero(Vec3::splat(1e-9)));
        assert!(!near_zero(Vec3::new(0.0, 1e-3, 0.0)));
        assert!(!near_zero(Vec3::new(0.0, 0.0, -1e-7)));
    }

    #[test]
    fn test_random_vec_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = random_vec(&mut rng, -2.0, 3.0);
            assert!(v.min_element() >= -2.0);
            assert!(v.max_element() < 3.0);
        }
    }

    #[test]
    fn test_random_unit_vector_is_unit() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-4, "length {}", v.length());
        }
    }

    #[test]
    fn test_random_unit_vector_has_no_axis_bias() {
        let mut rng = StdRng::seed_from_u64(3);
        let n = 20_000;
        let mean = (0..n).map(|_| random_unit_vector(&mut rng)).sum::<Vec3>() / n as f32;
        assert!(mean.length() < 0.05, "mean {:?}", mean);
    }

    #[test]
    fn test_random_in_unit_disk() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let p = random_in_unit_disk(&mut rng);
            assert_eq!(p.z, 0.0);
            assert!(p.length_squared() < 1.0);
        }
    }

    #[test]
    fn test_reflect_negates_normal_component() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let n = random_unit_vector(&mut rng);
            let v = random_vec(&mut rng, -4.0, 4.0);
            let r = reflect(v, n);
            assert!((r.dot(n) + v.dot(n)).abs() < 1e-4);
            // Tangential part is untouched, so length is preserved.
            assert!((r.length() - v.length()).abs() < 1e-4);
        }
    }

    #[test]
    fn test_refract_head_on_passes_straight_through() {
        let n = Vec3::Y;
        let uv = -Vec3::Y;
        let r = refract(uv, n, 1.0 / 1.5);
        assert!((r - uv).length() < 1e-6);
    }

    #[test]
    fn test_refract_bends_toward_normal_entering_denser_medium() {
        let n = Vec3::Y;
        let uv = Vec3::new(1.0, -1.0, 0.0).normalize();
        let r = refract(uv, n, 1.0 / 1.5);

        // Snell: sin(out) = sin(in) / 1.5
        let sin_in = uv.x;
        let sin_out = r.x / r.length();
        assert!((sin_out - sin_in / 1.5).abs() < 1e-5);
        assert!(r.y < 0.0);
    }
}
