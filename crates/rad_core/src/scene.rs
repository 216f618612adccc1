//! Scene types for RAD.
//!
//! A [`Scene`] is the explicit context handed through the pipeline:
//! reflecting meshes, emissive light meshes and analytic spheres.

use rad_math::{Aabb, DMat4, DQuat, DVec3};

use crate::material::Material;
use crate::mesh::Mesh;
use crate::subdivide::{plan_depths, SubdivisionConfig};

/// An analytic sphere. Spheres take part in ray queries but are never
/// subdivided into patches.
#[derive(Clone, Debug, PartialEq)]
pub struct Sphere {
    pub center: DVec3,
    pub radius: f64,
    pub material: Material,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: DVec3, radius: f64, material: Material) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }

    /// Get the bounding box of the sphere.
    pub fn bounds(&self) -> Aabb {
        let r = DVec3::splat(self.radius);
        Aabb::from_points(self.center - r, self.center + r)
    }
}

/// Transform components that can be composed into a matrix.
#[derive(Clone, Debug)]
pub struct Transform {
    /// Translation
    pub translation: DVec3,

    /// Rotation (as quaternion)
    pub rotation: DQuat,

    /// Scale
    pub scale: DVec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
            scale: DVec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform with only translation.
    pub fn from_translation(translation: DVec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Set the rotation.
    pub fn with_rotation(mut self, rotation: DQuat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the scale.
    pub fn with_scale(mut self, scale: DVec3) -> Self {
        self.scale = scale;
        self
    }

    /// Convert to a 4x4 transformation matrix.
    ///
    /// Order: Scale -> Rotate -> Translate (SRT)
    pub fn to_matrix(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Everything a single radiosity solve operates on.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// Scene name
    pub name: String,

    /// Reflecting meshes
    pub meshes: Vec<Mesh>,

    /// Emissive meshes; their patches radiate, they never receive or occlude
    pub lights: Vec<Mesh>,

    /// Analytic spheres
    pub spheres: Vec<Sphere>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a reflecting mesh and return its index.
    pub fn add_mesh(&mut self, mesh: Mesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    /// Add a light mesh and return its index.
    pub fn add_light(&mut self, light: Mesh) -> usize {
        self.lights.push(light);
        self.lights.len() - 1
    }

    /// Add a sphere and return its index.
    pub fn add_sphere(&mut self, sphere: Sphere) -> usize {
        self.spheres.push(sphere);
        self.spheres.len() - 1
    }

    /// Subdivide meshes and lights, then mark light patches as emitters.
    pub fn subdivide(&mut self, config: &SubdivisionConfig) {
        if self.lights.is_empty() {
            log::warn!("Scene '{}' has no lights; every patch will stay dark", self.name);
        }

        let depths = plan_depths(&self.meshes, config);
        for (mesh, depth) in self.meshes.iter_mut().zip(depths) {
            log::debug!("Level of detail for '{}': {}", mesh.name, depth);
            mesh.subdivide(depth);
        }

        for light in &mut self.lights {
            light.subdivide(config.light_iterations);
            light.make_light();
        }

        log::info!(
            "Subdivided scene '{}': {} patches, {} light patches",
            self.name,
            self.patch_count(),
            self.light_patch_count()
        );
    }

    /// Total number of patches over all reflecting meshes.
    pub fn patch_count(&self) -> usize {
        self.meshes.iter().map(Mesh::patch_count).sum()
    }

    /// Total number of patches over all lights.
    pub fn light_patch_count(&self) -> usize {
        self.lights.iter().map(Mesh::patch_count).sum()
    }

    /// Total number of coarse faces over all reflecting meshes.
    pub fn face_count(&self) -> usize {
        self.meshes.iter().map(Mesh::face_count).sum()
    }

    /// Compute the bounding box of all geometry.
    pub fn bounds(&self) -> Aabb {
        let meshes = self.meshes.iter().chain(&self.lights).map(|m| m.bounds);
        let spheres = self.spheres.iter().map(Sphere::bounds);
        meshes
            .chain(spheres)
            .fold(Aabb::EMPTY, |acc, b| Aabb::surrounding(&acc, &b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders;
    use crate::subdivide::SubdivisionStrategy;

    fn square(name: &str, size: f64) -> Mesh {
        builders::quad(
            name,
            [
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(size, 0.0, 0.0),
                DVec3::new(size, size, 0.0),
                DVec3::new(0.0, size, 0.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_scene_creation() {
        let mut scene = Scene::new("test");

        assert_eq!(scene.add_mesh(square("floor", 2.0)), 0);
        assert_eq!(scene.add_mesh(square("wall", 1.0)), 1);
        assert_eq!(scene.add_light(square("lamp", 0.5)), 0);
        scene.add_sphere(Sphere::new(DVec3::new(0.0, 0.0, 3.0), 1.0, Material::default()));

        assert_eq!(scene.patch_count(), 2);
        assert_eq!(scene.light_patch_count(), 1);
        assert_eq!(scene.face_count(), 2);

        let bounds = scene.bounds();
        assert_eq!(bounds.z.max, 4.0);
        assert_eq!(bounds.x.min, -1.0);
    }

    #[test]
    fn test_scene_subdivide() {
        let mut scene = Scene::new("test");
        scene.add_mesh(square("big", 2.0));
        scene.add_mesh(square("small", 1.0));
        scene.add_light(
            square("lamp", 1.0).with_material(Material::new("white", DVec3::ONE)),
        );

        scene.subdivide(&SubdivisionConfig {
            iterations: 3,
            strategy: SubdivisionStrategy::EvenByLargest,
            light_iterations: 2,
        });

        // Area 4 at depth 3 gives patches of 0.5; area 1 needs depth 1
        assert_eq!(scene.meshes[0].patch_count(), 8);
        assert_eq!(scene.meshes[1].patch_count(), 2);
        assert_eq!(scene.lights[0].patch_count(), 4);
        for patch in &scene.lights[0].patches {
            assert_eq!(patch.radiance, DVec3::splat(255.0));
        }
    }

    #[test]
    fn test_transform_to_matrix() {
        let transform = Transform::from_translation(DVec3::new(1.0, 2.0, 3.0))
            .with_rotation(DQuat::from_rotation_y(std::f64::consts::FRAC_PI_2))
            .with_scale(DVec3::splat(2.0));

        let p = transform.to_matrix().transform_point3(DVec3::X);
        assert!((p - DVec3::new(1.0, 2.0, 1.0)).length() < 1e-12);
    }
}
