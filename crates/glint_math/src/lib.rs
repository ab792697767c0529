//! Glint math: vectors, intervals and rays.
//!
//! `Vec3` comes straight from glam. [`Point3`] and [`Color`] are aliases that
//! document intent at call sites; they are the same type.

// Re-export glam for convenience
pub use glam::*;

mod interval;
mod ray;
pub mod vector;

pub use interval::Interval;
pub use ray::Ray;
pub use vector::{Color, Point3};
