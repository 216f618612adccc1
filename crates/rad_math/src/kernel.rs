//! Geometry kernel: normals, reflection/refraction, the angle-sum
//! point-in-polygon test, and the small helpers the radiosity solver
//! builds on.
//!
//! All functions operate on `DVec3` and never normalize defensively:
//! feeding a zero-length vector to [`face_normal`] or
//! [`cos_between`] yields non-finite output by contract.

use std::f64::consts::PI;

use crate::DVec3;

/// Tolerance for accepting an angle sum as a full turn.
pub const ANGLE_SUM_TOLERANCE: f64 = 1e-4;

/// Below this product of edge-vector magnitudes the query point is taken
/// to coincide with a polygon vertex.
pub const DEGENERATE_EPSILON: f64 = 1e-7;

/// Components smaller than this are snapped to zero by [`cos_between`].
pub const COMPONENT_SNAP: f64 = 1e-4;

/// Vertex ordering of a face as seen from its outer side.
///
/// Selects which of the two plane normals is reported as outward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Winding {
    /// Vertices run counter-clockwise seen from outside (right-hand rule).
    #[default]
    CounterClockwise,
    /// Vertices run clockwise seen from outside.
    Clockwise,
}

/// Cross product of the two edges leaving `b`, oriented by `winding`.
///
/// With `e1 = a - b` and `e2 = c - b`, counter-clockwise winding yields
/// `e2 × e1` and clockwise winding yields `e1 × e2`.
pub fn oriented_cross(a: DVec3, b: DVec3, c: DVec3, winding: Winding) -> DVec3 {
    let e1 = a - b;
    let e2 = c - b;
    match winding {
        Winding::CounterClockwise => e2.cross(e1),
        Winding::Clockwise => e1.cross(e2),
    }
}

/// Unit normal of the plane through the first three points.
pub fn face_normal(points: &[DVec3], winding: Winding) -> DVec3 {
    let n = oriented_cross(points[0], points[1], points[2], winding);
    n / n.length()
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: DVec3, b: DVec3) -> f64 {
    (a - b).length()
}

/// Cosine of the angle between `a` and `b`.
///
/// Components with magnitude below [`COMPONENT_SNAP`] are zeroed before
/// the dot product; the lengths use the unsnapped vectors. This keeps
/// nearly coplanar patches from registering as facing each other.
pub fn cos_between(a: DVec3, b: DVec3) -> f64 {
    let snap = |v: DVec3| {
        DVec3::select(v.abs().cmplt(DVec3::splat(COMPONENT_SNAP)), DVec3::ZERO, v)
    };
    snap(a).dot(snap(b)) / (a.length() * b.length())
}

/// Reflect `v` about the unit normal `n`: `v - 2(v·n)n`.
#[inline]
pub fn reflect(v: DVec3, n: DVec3) -> DVec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract `v` through a surface with unit normal `n` and refraction
/// index `ior`, entering from a medium of index 1.
///
/// When `v` and `n` do not oppose each other the ray is leaving the
/// medium: the normal is flipped and the indices swapped. Returns
/// `DVec3::ZERO` on total internal reflection.
pub fn refract(v: DVec3, n: DVec3, ior: f64) -> DVec3 {
    let mut n1 = 1.0;
    let mut n2 = ior;
    let mut normal = n;
    let mut cos_i = -v.dot(n);

    if cos_i < 0.0 {
        normal = -normal;
        cos_i = -cos_i;
        std::mem::swap(&mut n1, &mut n2);
    }

    let eta = n1 / n2;
    let k = 1.0 - (1.0 - cos_i * cos_i) * eta * eta;
    if k < 0.0 {
        return DVec3::ZERO;
    }
    v * eta + normal * (eta * cos_i - k.sqrt())
}

/// Sum of the angles subtended at `q` by consecutive polygon vertices.
///
/// Equals 2π when `q` lies inside a convex polygon it is coplanar with.
/// Returns 2π outright when `q` coincides with a vertex.
pub fn angle_sum(q: DVec3, polygon: &[DVec3]) -> f64 {
    let n = polygon.len();
    let mut sum = 0.0;

    for i in 0..n {
        let p1 = polygon[i] - q;
        let p2 = polygon[(i + 1) % n] - q;
        let m = p1.length() * p2.length();
        if m <= DEGENERATE_EPSILON {
            return 2.0 * PI;
        }
        sum += (p1.dot(p2) / m).acos();
    }

    sum
}

/// Angle-sum point-in-polygon test for a point presumed coplanar with
/// the polygon.
pub fn point_in_polygon(q: DVec3, polygon: &[DVec3]) -> bool {
    (angle_sum(q, polygon) - 2.0 * PI).abs() <= ANGLE_SUM_TOLERANCE
}

/// Triangle area by Heron's formula.
pub fn triangle_area(a: DVec3, b: DVec3, c: DVec3) -> f64 {
    let ab = distance(a, b);
    let bc = distance(b, c);
    let ac = distance(a, c);
    let s = (ab + bc + ac) / 2.0;
    // Rounding can push the product slightly negative for slivers
    (s * (s - ab) * (s - bc) * (s - ac)).max(0.0).sqrt()
}

/// Area of a triangle or quad.
///
/// Quads are measured as the two triangles `(a, d, c)` and `(c, b, a)`.
pub fn polygon_area(points: &[DVec3]) -> f64 {
    match points {
        [a, b, c] => triangle_area(*a, *b, *c),
        [a, b, c, d] => triangle_area(*a, *d, *c) + triangle_area(*c, *b, *a),
        _ => 0.0,
    }
}

/// Arithmetic mean of the points.
pub fn centroid(points: &[DVec3]) -> DVec3 {
    points.iter().copied().sum::<DVec3>() / points.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> [DVec3; 3] {
        [
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_face_normal_is_unit_and_orthogonal() {
        let tri = unit_triangle();
        let n = face_normal(&tri, Winding::CounterClockwise);

        assert!((n.length() - 1.0).abs() < 1e-12);
        assert!(n.dot(tri[1] - tri[0]).abs() < 1e-12);
        assert!(n.dot(tri[2] - tri[0]).abs() < 1e-12);
    }

    #[test]
    fn test_winding_flips_normal() {
        let tri = unit_triangle();
        let cw = face_normal(&tri, Winding::Clockwise);
        let ccw = face_normal(&tri, Winding::CounterClockwise);

        assert_eq!(cw, -ccw);
        assert!((ccw - DVec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_face_normal_skewed_triangle() {
        let tri = [
            DVec3::new(0.3, -1.0, 2.0),
            DVec3::new(1.7, 0.4, -0.5),
            DVec3::new(-0.8, 2.2, 1.1),
        ];
        let n = face_normal(&tri, Winding::CounterClockwise);

        assert!((n.length() - 1.0).abs() < 1e-12);
        assert!(n.dot(tri[1] - tri[0]).abs() < 1e-12);
        assert!(n.dot(tri[2] - tri[0]).abs() < 1e-12);
    }

    #[test]
    fn test_reflect() {
        let v = DVec3::new(1.0, -1.0, 0.0);
        assert_eq!(reflect(v, DVec3::Y), DVec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_refract_straight_through() {
        // Head-on rays pass without bending
        let v = DVec3::new(0.0, -1.0, 0.0);
        let r = refract(v, DVec3::Y, 1.5);
        assert!((r - v).length() < 1e-12);
    }

    #[test]
    fn test_refract_bends_towards_normal() {
        let v = DVec3::new(1.0, -1.0, 0.0).normalize();
        let r = refract(v, DVec3::Y, 1.5);

        // Snell: sin(t) = sin(i) / 1.5
        let sin_t = r.x / r.length();
        assert!((sin_t - (0.5f64.sqrt() / 1.5)).abs() < 1e-9);
        assert!(r.y < 0.0);
    }

    #[test]
    fn test_refract_total_internal_reflection() {
        // Leaving glass at a grazing angle
        let v = DVec3::new(1.0, 0.2, 0.0).normalize();
        assert_eq!(refract(v, DVec3::Y, 1.5), DVec3::ZERO);
    }

    #[test]
    fn test_point_in_polygon() {
        let tri = unit_triangle();

        assert!(point_in_polygon(DVec3::new(0.25, 0.25, 0.0), &tri));
        assert!(!point_in_polygon(DVec3::new(2.0, 2.0, 0.0), &tri));
    }

    #[test]
    fn test_point_in_polygon_quad() {
        let quad = [
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(2.0, 2.0, 0.0),
            DVec3::new(0.0, 2.0, 0.0),
        ];

        assert!(point_in_polygon(DVec3::new(1.5, 0.5, 0.0), &quad));
        assert!(!point_in_polygon(DVec3::new(2.5, 0.5, 0.0), &quad));
    }

    #[test]
    fn test_angle_sum_on_vertex() {
        let tri = unit_triangle();
        assert_eq!(angle_sum(tri[1], &tri), 2.0 * PI);
    }

    #[test]
    fn test_cos_between() {
        assert!((cos_between(DVec3::X, DVec3::X) - 1.0).abs() < 1e-12);
        assert!((cos_between(DVec3::X, -DVec3::X) + 1.0).abs() < 1e-12);
        assert!(cos_between(DVec3::X, DVec3::Y).abs() < 1e-12);

        // Tiny components are snapped away
        let almost_flat = DVec3::new(1.0, 5e-5, 0.0);
        assert_eq!(cos_between(almost_flat, DVec3::new(0.0, 1.0, 0.0)), 0.0);
    }

    #[test]
    fn test_areas() {
        let tri = unit_triangle();
        assert!((triangle_area(tri[0], tri[1], tri[2]) - 0.5).abs() < 1e-12);

        let quad = [
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(2.0, 3.0, 0.0),
            DVec3::new(0.0, 3.0, 0.0),
        ];
        assert!((polygon_area(&quad) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_centroid() {
        let tri = unit_triangle();
        let c = centroid(&tri);
        assert!((c - DVec3::new(1.0 / 3.0, 1.0 / 3.0, 0.0)).length() < 1e-12);
    }
}
