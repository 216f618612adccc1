//! Procedural builders for the planar meshes radiosity scenes are made of.

use rad_math::DVec3;

use crate::mesh::{Mesh, MeshResult};

/// Build a single-quad mesh.
///
/// Corners are listed counter-clockwise as seen from the side the quad
/// faces.
pub fn quad(name: impl Into<String>, corners: [DVec3; 4]) -> MeshResult<Mesh> {
    Mesh::new(name, corners.to_vec(), vec![vec![0, 1, 2, 3]], None)
}

/// Build an axis-aligned box with six outward-facing quads.
pub fn cuboid(name: impl Into<String>, min: DVec3, max: DVec3) -> MeshResult<Mesh> {
    let (lo, hi) = (min.min(max), min.max(max));
    let vertices = vec![
        DVec3::new(lo.x, lo.y, lo.z),
        DVec3::new(hi.x, lo.y, lo.z),
        DVec3::new(hi.x, hi.y, lo.z),
        DVec3::new(lo.x, hi.y, lo.z),
        DVec3::new(lo.x, lo.y, hi.z),
        DVec3::new(hi.x, lo.y, hi.z),
        DVec3::new(hi.x, hi.y, hi.z),
        DVec3::new(lo.x, hi.y, hi.z),
    ];
    let faces = vec![
        vec![0, 3, 2, 1], // -Z
        vec![4, 5, 6, 7], // +Z
        vec![0, 1, 5, 4], // -Y
        vec![3, 7, 6, 2], // +Y
        vec![0, 4, 7, 3], // -X
        vec![1, 2, 6, 5], // +X
    ];
    Mesh::new(name, vertices, faces, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad() {
        let mesh = quad(
            "floor",
            [
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(2.0, 0.0, 0.0),
                DVec3::new(2.0, 3.0, 0.0),
                DVec3::new(0.0, 3.0, 0.0),
            ],
        )
        .unwrap();

        assert_eq!(mesh.face_count(), 1);
        assert!(mesh.faces[0].is_quad());
        assert!((mesh.faces[0].area - 6.0).abs() < 1e-9);
        assert!((mesh.faces[0].normal - DVec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_cuboid_normals_point_outward() {
        let mesh = cuboid("box", DVec3::new(1.0, 2.0, 3.0), DVec3::new(-1.0, -2.0, -3.0)).unwrap();
        let center = mesh.bounds.centroid();

        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.edges().len(), 12);
        for face in &mesh.faces {
            assert!(face.normal.dot(face.center - center) > 0.0);
        }
        let total: f64 = mesh.faces.iter().map(|f| f.area).sum();
        assert!((total - 2.0 * (8.0 + 12.0 + 24.0)).abs() < 1e-9);
    }
}
