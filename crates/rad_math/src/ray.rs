use crate::DVec3;

/// A ray in 3D space with an origin and a direction.
///
/// The direction is not required to be normalized. Visibility queries
/// cast rays whose direction spans the full segment between two patch
/// centers, so `at(1.0)` lands on the receiver.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self { origin, direction }
    }

    /// Create the ray that starts at `from` and reaches `to` at `t = 1`.
    pub fn between(from: DVec3, to: DVec3) -> Self {
        Self::new(from, to - from)
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation() {
        let origin = DVec3::new(1.0, 2.0, 3.0);
        let direction = DVec3::new(0.0, 1.0, 0.0);
        let ray = Ray::new(origin, direction);

        assert_eq!(ray.origin, origin);
        assert_eq!(ray.direction, direction);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(DVec3::ZERO, DVec3::X);

        assert_eq!(ray.at(0.0), DVec3::ZERO);
        assert_eq!(ray.at(1.0), DVec3::X);
        assert_eq!(ray.at(2.0), DVec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), DVec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_between() {
        let from = DVec3::new(1.0, 1.0, 1.0);
        let to = DVec3::new(4.0, 5.0, 1.0);
        let ray = Ray::between(from, to);

        assert_eq!(ray.at(0.0), from);
        assert_eq!(ray.at(1.0), to);
        assert_eq!(ray.direction.length(), 5.0);
    }
}
