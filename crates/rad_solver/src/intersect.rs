//! Ray intersection against patches and spheres, and nearest-hit queries.

use rad_core::{Material, Patch, Scene, Sphere};
use rad_math::kernel;
use rad_math::{DVec3, Ray};

/// Rays closer to parallel with a plane than this never hit it.
pub const PARALLEL_EPSILON: f64 = 1e-6;

/// Nearest hits farther than this count as misses.
pub const MAX_HIT_DISTANCE: f64 = 1e6;

/// Offset applied to secondary ray origins to step off the surface.
const SURFACE_OFFSET: f64 = 1e-6;

/// Where a ray meets a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: DVec3,
    /// Euclidean distance from the ray origin
    pub distance: f64,
}

/// Trait for geometry that rays can be tested against.
pub trait Intersect {
    /// Returns the first hit in front of the ray origin, if any.
    fn intersect(&self, ray: &Ray) -> Option<RayHit>;
}

impl Intersect for Patch {
    /// Plane intersection followed by the angle-sum containment test.
    fn intersect(&self, ray: &Ray) -> Option<RayHit> {
        let denom = ray.direction.dot(self.normal);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let offset = self.normal.dot(*self.points.first()?);
        let t = (offset - ray.origin.dot(self.normal)) / denom;
        if t < 0.0 {
            return None;
        }

        let point = ray.at(t);
        if !kernel::point_in_polygon(point, &self.points) {
            return None;
        }

        Some(RayHit {
            point,
            distance: (point - ray.origin).length(),
        })
    }
}

impl Intersect for Sphere {
    /// Projects the center onto the ray and takes the nearer
    /// non-negative root.
    fn intersect(&self, ray: &Ray) -> Option<RayHit> {
        let dir = ray.direction.normalize_or_zero();
        if dir == DVec3::ZERO {
            return None;
        }

        let l = self.center - ray.origin;
        let tca = l.dot(dir);
        let d2 = l.length_squared() - tca * tca;
        let r2 = self.radius * self.radius;
        if d2 > r2 {
            return None;
        }

        let thc = (r2 - d2).sqrt();
        let mut distance = tca - thc;
        if distance < 0.0 {
            distance = tca + thc;
        }
        if distance < 0.0 {
            return None;
        }

        Some(RayHit {
            point: ray.origin + dir * distance,
            distance,
        })
    }
}

/// Record of the nearest scene intersection.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    pub point: DVec3,
    /// Outward surface normal
    pub normal: DVec3,
    pub distance: f64,
    pub material: &'a Material,
}

/// Find the nearest hit among all spheres and coarse mesh faces.
///
/// Lights are not part of the query. Hits beyond [`MAX_HIT_DISTANCE`]
/// are reported as misses.
pub fn find_nearest<'a>(scene: &'a Scene, ray: &Ray) -> Option<HitRecord<'a>> {
    let mut nearest: Option<HitRecord<'a>> = None;
    let mut closest = f64::MAX;

    for sphere in &scene.spheres {
        if let Some(hit) = sphere.intersect(ray) {
            if hit.distance < closest {
                closest = hit.distance;
                nearest = Some(HitRecord {
                    point: hit.point,
                    normal: (hit.point - sphere.center).normalize(),
                    distance: hit.distance,
                    material: &sphere.material,
                });
            }
        }
    }

    for mesh in &scene.meshes {
        for face in &mesh.faces {
            if let Some(hit) = face.intersect(ray) {
                if hit.distance < closest {
                    closest = hit.distance;
                    nearest = Some(HitRecord {
                        point: hit.point,
                        normal: face.normal,
                        distance: hit.distance,
                        material: &mesh.material,
                    });
                }
            }
        }
    }

    nearest.filter(|hit| hit.distance < MAX_HIT_DISTANCE)
}

/// Mirror `ray` about the surface at `hit`.
pub fn reflected_ray(ray: &Ray, hit: &HitRecord) -> Ray {
    let dir = kernel::reflect(ray.direction.normalize(), hit.normal);
    Ray::new(hit.point + dir * SURFACE_OFFSET, dir)
}

/// Bend `ray` through the surface at `hit` using its material's
/// refraction index. `None` on total internal reflection.
pub fn refracted_ray(ray: &Ray, hit: &HitRecord) -> Option<Ray> {
    let dir = kernel::refract(
        ray.direction.normalize(),
        hit.normal,
        hit.material.refraction_index,
    );
    if dir == DVec3::ZERO {
        return None;
    }
    Some(Ray::new(hit.point + dir * SURFACE_OFFSET, dir))
}
