//! Obstruction testing between patch centers.
//!
//! Every test is a linear scan over the coarse faces of the meshes that
//! may block the segment. Whole meshes are skipped when the segment
//! misses their (padded) bounding box.

use rad_core::Scene;
use rad_math::{Aabb, DVec3, Interval, Ray};

use crate::intersect::Intersect;

/// Relative bounds padding. Generous enough that an angle-sum hit just
/// outside a face still lands inside its mesh box.
const BOUNDS_MARGIN: f64 = 0.01;
const BOUNDS_MARGIN_MIN: f64 = 1e-6;

/// Obstruction queries against a fixed scene.
pub struct Visibility<'a> {
    scene: &'a Scene,
    bounds: Vec<Aabb>,
    occluding_spheres: bool,
}

impl<'a> Visibility<'a> {
    /// Prepare obstruction queries for `scene`.
    ///
    /// Spheres only block light when `occluding_spheres` is set.
    pub fn new(scene: &'a Scene, occluding_spheres: bool) -> Self {
        let bounds = scene
            .meshes
            .iter()
            .map(|mesh| {
                let margin = mesh.bounds.diagonal() * BOUNDS_MARGIN + BOUNDS_MARGIN_MIN;
                mesh.bounds.padded(margin)
            })
            .collect();

        Self {
            scene,
            bounds,
            occluding_spheres,
        }
    }

    /// Returns true if anything blocks the segment from `from` to `to`.
    ///
    /// Faces of the meshes listed in `excluded` never block. A hit only
    /// counts when it is strictly closer than `to`.
    pub fn is_obstructed(&self, from: DVec3, to: DVec3, excluded: &[usize]) -> bool {
        let ray = Ray::between(from, to);
        let len = ray.direction.length();

        for (k, mesh) in self.scene.meshes.iter().enumerate() {
            if excluded.contains(&k) {
                continue;
            }
            if !self.bounds[k].hit(&ray, Interval::new(0.0, 1.0)) {
                continue;
            }
            let blocked = mesh
                .faces
                .iter()
                .filter_map(|face| face.intersect(&ray))
                .any(|hit| hit.distance < len);
            if blocked {
                return true;
            }
        }

        self.occluding_spheres
            && self
                .scene
                .spheres
                .iter()
                .filter_map(|sphere| sphere.intersect(&ray))
                .any(|hit| hit.distance < len)
    }
}
