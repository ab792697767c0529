//! Final-scene example.
//!
//! Renders a field of small random spheres around three large ones and
//! saves the result in PPM format.

use glint_renderer::{
    color_to_rgba, render_parallel, Camera, CameraConfig, Color, Dielectric, HittableList,
    ImageBuffer, Lambertian, Metal, Point3, Sphere, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{BufWriter, Write};

fn main() -> std::io::Result<()> {
    println!("Glint Path Tracer - Simple Example");
    println!("==================================");

    let start = std::time::Instant::now();
    let world = build_scene(&mut StdRng::seed_from_u64(2024));
    println!("Scene built in {:?}", start.elapsed());

    let camera = Camera::new(
        &CameraConfig::new()
            .with_aspect_ratio(16.0 / 9.0, 800)
            .with_quality(50, 10)
            .with_position(
                Point3::new(13.0, 2.0, 3.0), // look_from
                Point3::new(0.0, 0.0, 0.0),  // look_at
                Vec3::new(0.0, 1.0, 0.0),    // vup
            )
            .with_lens(20.0, 0.6, 10.0),
    );

    println!(
        "Rendering {}x{} @ {} spp...",
        camera.image_width(),
        camera.image_height(),
        camera.samples_per_pixel()
    );

    let start = std::time::Instant::now();
    let image = render_parallel(&camera, &world, 7);
    println!("Rendered in {:?}", start.elapsed());

    let filename = "output.ppm";
    save_ppm(&image, filename)?;
    println!("Saved to {}", filename);
    Ok(())
}

fn build_scene(rng: &mut StdRng) -> HittableList {
    let mut world = HittableList::new();

    // Ground
    world.add(Box::new(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        Lambertian::new(Color::new(0.5, 0.5, 0.5)),
    )));

    // Three main spheres
    world.add(Box::new(Sphere::new(Point3::new(0.0, 1.0, 0.0), 1.0, Dielectric::new(1.5))));
    world.add(Box::new(Sphere::new(
        Point3::new(-4.0, 1.0, 0.0),
        1.0,
        Lambertian::new(Color::new(0.4, 0.2, 0.1)),
    )));
    world.add(Box::new(Sphere::new(
        Point3::new(4.0, 1.0, 0.0),
        1.0,
        Metal::new(Color::new(0.7, 0.6, 0.5), 0.0),
    )));

    // Small random spheres
    for a in -5..5 {
        for b in -5..5 {
            let center = Point3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            if (center - Point3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f32 = rng.gen();
            if choose_mat < 0.8 {
                let albedo = Color::new(
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                );
                world.add(Box::new(Sphere::new(center, 0.2, Lambertian::new(albedo))));
            } else if choose_mat < 0.95 {
                let albedo = Color::new(
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                );
                let fuzz = rng.gen_range(0.0..0.5);
                world.add(Box::new(Sphere::new(center, 0.2, Metal::new(albedo, fuzz))));
            } else {
                world.add(Box::new(Sphere::new(center, 0.2, Dielectric::new(1.5))));
            }
        }
    }

    println!("Created {} objects", world.len());
    world
}

fn save_ppm(image: &ImageBuffer, filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for color in &image.pixels {
        let rgba = color_to_rgba(*color);
        writeln!(writer, "{} {} {}", rgba[0], rgba[1], rgba[2])?;
    }

    writer.flush()
}
