//! Turn scene descriptions into renderable objects.

use std::sync::Arc;

use crate::{Dielectric, HittableList, Lambertian, Material, Metal, Sphere};
use glint_core::scene::{MaterialDescription, SceneError, ShapeDescription};
use glint_core::SceneDescription;

/// Instantiate the material a description names.
pub fn material_from_description(description: &MaterialDescription) -> Arc<dyn Material> {
    match *description {
        MaterialDescription::Lambertian { albedo } => Arc::new(Lambertian::new(albedo)),
        MaterialDescription::Metal { albedo, fuzz } => Arc::new(Metal::new(albedo, fuzz)),
        MaterialDescription::Dielectric { refraction_index } => {
            Arc::new(Dielectric::new(refraction_index))
        }
    }
}

/// Build the world for a scene, in scene order.
///
/// Fails on the first shape with an unknown material; nothing is rendered
/// from a partially built world.
pub fn build_world(scene: &SceneDescription) -> Result<HittableList, SceneError> {
    let mut world = HittableList::new();

    for shape in scene.iter() {
        match shape {
            ShapeDescription::Sphere(sphere) => {
                let material = material_from_description(&sphere.material()?);
                world.add(Box::new(Sphere::with_shared_material(
                    sphere.center,
                    sphere.radius,
                    material,
                )));
            }
        }
    }

    log::info!("Built world with {} objects", world.len());
    Ok(world)
}
