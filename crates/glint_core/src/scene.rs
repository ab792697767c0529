//! Declarative scene description.
//!
//! A scene is an ordered list of shapes. Each shape names its material by
//! string; names are resolved into [`MaterialDescription`]s before anything
//! is built, so an unknown name rejects the whole scene.

use std::fmt;
use std::str::FromStr;

use glint_math::{Color, Point3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Refraction index used when a dielectric omits one (typical glass).
pub const DEFAULT_REFRACTION_INDEX: f32 = 1.5;

/// Fuzz used when a metal omits one. Clamped to [0, 1] at construction.
pub const DEFAULT_FUZZ: f32 = 1.0;

/// Errors that can occur while resolving a scene description.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Unknown material type: {0}")]
    UnknownMaterial(String),
}

/// The closed set of material names a scene may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    Lambertian,
    Metal,
    Dielectric,
}

impl MaterialKind {
    /// The name used in scene files.
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialKind::Lambertian => "lambertian",
            MaterialKind::Metal => "metal",
            MaterialKind::Dielectric => "dielectric",
        }
    }
}

impl FromStr for MaterialKind {
    type Err = SceneError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "lambertian" => Ok(MaterialKind::Lambertian),
            "metal" => Ok(MaterialKind::Metal),
            "dielectric" => Ok(MaterialKind::Dielectric),
            other => Err(SceneError::UnknownMaterial(other.to_string())),
        }
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully resolved material parameters, defaults applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialDescription {
    Lambertian { albedo: Color },
    Metal { albedo: Color, fuzz: f32 },
    Dielectric { refraction_index: f32 },
}

/// A sphere entry in a scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SphereDescription {
    pub center: Point3,
    pub radius: f32,
    pub material: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuzz: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refraction_index: Option<f32>,
}

impl SphereDescription {
    /// A sphere with the given material name and no optional parameters.
    pub fn new(center: Point3, radius: f32, material: impl Into<String>) -> Self {
        Self {
            center,
            radius,
            material: material.into(),
            color: None,
            fuzz: None,
            refraction_index: None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_fuzz(mut self, fuzz: f32) -> Self {
        self.fuzz = Some(fuzz);
        self
    }

    pub fn with_refraction_index(mut self, refraction_index: f32) -> Self {
        self.refraction_index = Some(refraction_index);
        self
    }

    /// Resolve the material name and fill in defaults.
    ///
    /// Missing colors are black; parameters that do not apply to the named
    /// material are ignored.
    pub fn material(&self) -> Result<MaterialDescription, SceneError> {
        let albedo = self.color.unwrap_or(Color::ZERO);
        let description = match self.material.parse::<MaterialKind>()? {
            MaterialKind::Lambertian => MaterialDescription::Lambertian { albedo },
            MaterialKind::Metal => MaterialDescription::Metal {
                albedo,
                fuzz: self.fuzz.unwrap_or(DEFAULT_FUZZ),
            },
            MaterialKind::Dielectric => MaterialDescription::Dielectric {
                refraction_index: self.refraction_index.unwrap_or(DEFAULT_REFRACTION_INDEX),
            },
        };
        Ok(description)
    }
}

/// One shape in a scene file, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeDescription {
    Sphere(SphereDescription),
}

/// An ordered list of shapes.
///
/// Order only matters for tie-breaking between hits at exactly the same
/// distance: earlier shapes win.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneDescription {
    pub shapes: Vec<ShapeDescription>,
}

impl SceneDescription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sphere (builder style).
    pub fn with_sphere(mut self, sphere: SphereDescription) -> Self {
        self.push(ShapeDescription::Sphere(sphere));
        self
    }

    pub fn push(&mut self, shape: ShapeDescription) {
        self.shapes.push(shape);
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShapeDescription> {
        self.shapes.iter()
    }

    /// Check every material name without building anything.
    pub fn validate(&self) -> Result<(), SceneError> {
        for shape in &self.shapes {
            match shape {
                ShapeDescription::Sphere(sphere) => {
                    sphere.material()?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_kind_parse() {
        assert_eq!("lambertian".parse::<MaterialKind>(), Ok(MaterialKind::Lambertian));
        assert_eq!("metal".parse::<MaterialKind>(), Ok(MaterialKind::Metal));
        assert_eq!("dielectric".parse::<MaterialKind>(), Ok(MaterialKind::Dielectric));
        assert_eq!(
            "Metal".parse::<MaterialKind>(),
            Err(SceneError::UnknownMaterial("Metal".to_string()))
        );
    }

    #[test]
    fn test_material_defaults() {
        let lambertian = SphereDescription::new(Point3::ZERO, 1.0, "lambertian");
        assert_eq!(
            lambertian.material(),
            Ok(MaterialDescription::Lambertian { albedo: Color::ZERO })
        );

        let metal = SphereDescription::new(Point3::ZERO, 1.0, "metal")
            .with_color(Color::new(0.8, 0.6, 0.2));
        assert_eq!(
            metal.material(),
            Ok(MaterialDescription::Metal {
                albedo: Color::new(0.8, 0.6, 0.2),
                fuzz: DEFAULT_FUZZ,
            })
        );

        let glass = SphereDescription::new(Point3::ZERO, 1.0, "dielectric").with_fuzz(0.3);
        assert_eq!(
            glass.material(),
            Ok(MaterialDescription::Dielectric { refraction_index: 1.5 })
        );
    }

    #[test]
    fn test_parse_scene_json() {
        let json = r#"[
            {"type": "sphere", "center": [0, -100.5, -1], "radius": 100,
             "material": "lambertian", "color": [0.8, 0.8, 0.0]},
            {"type": "sphere", "center": [1, 0, -1], "radius": 0.5,
             "material": "metal", "color": [0.8, 0.6, 0.2], "fuzz": 0.3},
            {"type": "sphere", "center": [-1, 0, -1], "radius": 0.5,
             "material": "dielectric", "refractionIndex": 1.33}
        ]"#;

        let scene: SceneDescription = serde_json::from_str(json).unwrap();
        assert_eq!(scene.len(), 3);

        let ShapeDescription::Sphere(ground) = &scene.shapes[0];
        assert_eq!(ground.center, Point3::new(0.0, -100.5, -1.0));
        assert_eq!(ground.radius, 100.0);
        assert_eq!(ground.color, Some(Color::new(0.8, 0.8, 0.0)));

        let ShapeDescription::Sphere(glass) = &scene.shapes[2];
        assert_eq!(
            glass.material(),
            Ok(MaterialDescription::Dielectric { refraction_index: 1.33 })
        );
        assert!(scene.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_material() {
        let scene = SceneDescription::new()
            .with_sphere(SphereDescription::new(Point3::ZERO, 1.0, "lambertian"))
            .with_sphere(SphereDescription::new(Point3::X, 1.0, "plastic"));

        assert_eq!(
            scene.validate(),
            Err(SceneError::UnknownMaterial("plastic".to_string()))
        );
    }

    #[test]
    fn test_unknown_shape_type_fails_to_parse() {
        let json = r#"[{"type": "cube", "center": [0, 0, 0], "radius": 1, "material": "metal"}]"#;
        assert!(serde_json::from_str::<SceneDescription>(json).is_err());
    }

    #[test]
    fn test_scene_json_roundtrip_keeps_order() {
        let scene = SceneDescription::new()
            .with_sphere(SphereDescription::new(Point3::ZERO, 1.0, "lambertian"))
            .with_sphere(
                SphereDescription::new(Point3::Y, 0.5, "dielectric").with_refraction_index(2.4),
            );

        let json = serde_json::to_string(&scene).unwrap();
        assert!(json.contains("\"refractionIndex\":2.4"));
        let parsed: SceneDescription = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, scene);
    }
}
