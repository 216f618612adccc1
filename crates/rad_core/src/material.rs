//! Surface material shared by meshes, lights and spheres.

use rad_math::{DVec3, DVec4};
use serde::{Deserialize, Serialize};

/// Surface description used for display shading and energy absorption.
///
/// Radiosity reflectivity is a single scalar handed to the solver; the
/// material only tints received energy through its `color`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Material name
    pub name: String,

    /// Base display color (RGB, 0-1)
    pub color: DVec3,

    /// Phong specular exponent
    pub specular_exponent: f64,

    /// Weights of the diffuse, specular, mirror-reflection and
    /// transmission terms, in that order
    pub reflectance: DVec4,

    /// Index of refraction (1.0 = air, 1.5 = glass)
    pub refraction_index: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: DVec3::splat(128.0 / 255.0), // Grey default
            specular_exponent: 0.0,
            reflectance: DVec4::new(1.0, 0.0, 0.0, 0.0),
            refraction_index: 1.0,
        }
    }
}

impl Material {
    /// Create a new material with just a name and color.
    pub fn new(name: impl Into<String>, color: DVec3) -> Self {
        Self {
            name: name.into(),
            color,
            ..Default::default()
        }
    }

    /// Create a material from an 8-bit RGB triple.
    pub fn from_rgb8(name: impl Into<String>, r: u8, g: u8, b: u8) -> Self {
        Self::new(
            name,
            DVec3::new(r as f64, g as f64, b as f64) / 255.0,
        )
    }

    /// Set the specular exponent.
    pub fn with_specular(mut self, exponent: f64) -> Self {
        self.specular_exponent = exponent;
        self
    }

    /// Set the diffuse/specular/reflection/transmission weights.
    pub fn with_reflectance(mut self, diffuse: f64, specular: f64, reflection: f64, transmission: f64) -> Self {
        self.reflectance = DVec4::new(diffuse, specular, reflection, transmission);
        self
    }

    /// Set the index of refraction.
    pub fn with_refraction_index(mut self, ior: f64) -> Self {
        self.refraction_index = ior;
        self
    }

    /// Weight of the mirror-reflection term.
    pub fn reflection(&self) -> f64 {
        self.reflectance.z
    }

    /// Weight of the transmission term.
    pub fn transmission(&self) -> f64 {
        self.reflectance.w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_defaults() {
        let material = Material::default();

        assert_eq!(material.reflectance, DVec4::new(1.0, 0.0, 0.0, 0.0));
        assert_eq!(material.refraction_index, 1.0);
        assert!((material.color.x - 0.502).abs() < 0.001);
    }

    #[test]
    fn test_material_from_rgb8() {
        let material = Material::from_rgb8("red", 255, 0, 51);

        assert_eq!(material.name, "red");
        assert_eq!(material.color, DVec3::new(1.0, 0.0, 0.2));
    }

    #[test]
    fn test_material_builders() {
        let glass = Material::new("glass", DVec3::ONE)
            .with_specular(30.0)
            .with_reflectance(0.0, 0.1, 0.1, 0.8)
            .with_refraction_index(1.5);

        assert_eq!(glass.specular_exponent, 30.0);
        assert_eq!(glass.reflection(), 0.1);
        assert_eq!(glass.transmission(), 0.8);
        assert_eq!(glass.refraction_index, 1.5);
    }
}
