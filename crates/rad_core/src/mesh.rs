//! Mesh geometry and shading patches.
//!
//! A [`Mesh`] owns a vertex arena, the coarse input faces and the patches
//! the solver works on. Faces and patches refer to vertices by index, so
//! patches that share an edge midpoint share the vertex too.

use std::collections::BTreeSet;

use rad_math::kernel::{self, Winding};
use rad_math::{Aabb, DMat4, DVec3};
use thiserror::Error;

use crate::material::Material;

/// Errors raised while assembling mesh geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    #[error("Mesh '{0}' has no faces")]
    Empty(String),

    #[error("Face {face} of mesh '{mesh}' has {count} vertices, expected 3 or 4")]
    UnsupportedFace {
        mesh: String,
        face: usize,
        count: usize,
    },

    #[error("Face {face} of mesh '{mesh}' references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        mesh: String,
        face: usize,
        index: usize,
        vertex_count: usize,
    },

    #[error("Face {face} of mesh '{mesh}' is degenerate (zero area or undefined normal)")]
    DegenerateFace { mesh: String, face: usize },

    #[error("Mesh '{mesh}' has {faces} faces but {normals} normals")]
    NormalCountMismatch {
        mesh: String,
        faces: usize,
        normals: usize,
    },
}

/// Result type for mesh construction.
pub type MeshResult<T> = Result<T, MeshError>;

/// An undirected mesh edge between two vertex indices (`a < b`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
}

impl Edge {
    /// Create an edge, ordering the endpoints.
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self { a, b }
        } else {
            Self { a: b, b: a }
        }
    }
}

/// A triangular or quadrilateral surface element.
///
/// Coarse faces and subdivided patches share this type. `illumination`
/// accumulates energy per unit area during the solve; `radiance` is the
/// final display color on a 0-255 scale.
#[derive(Clone, Debug, PartialEq)]
pub struct Patch {
    /// Vertex indices into the owning mesh
    pub indices: Vec<usize>,

    /// Vertex positions (same order as `indices`)
    pub points: Vec<DVec3>,

    /// Outward unit normal
    pub normal: DVec3,

    /// Centroid of `points`
    pub center: DVec3,

    /// Surface area
    pub area: f64,

    /// Accumulated energy per unit area
    pub illumination: DVec3,

    /// Display color (RGB, 0-255)
    pub radiance: DVec3,

    /// Index of the coarse face this patch descends from
    pub parent: usize,
}

impl Patch {
    /// Create a patch from vertex indices into `vertices`.
    ///
    /// Indices are assumed valid; [`Mesh::new`] checks coarse faces and
    /// the subdivider only produces indices it has allocated.
    pub fn new(indices: Vec<usize>, vertices: &[DVec3], normal: DVec3, parent: usize) -> Self {
        let points: Vec<DVec3> = indices.iter().map(|&i| vertices[i]).collect();
        let center = kernel::centroid(&points);
        let area = kernel::polygon_area(&points);
        Self {
            indices,
            points,
            normal,
            center,
            area,
            illumination: DVec3::ZERO,
            radiance: DVec3::ZERO,
            parent,
        }
    }

    /// Check if this patch is a triangle.
    pub fn is_triangle(&self) -> bool {
        self.points.len() == 3
    }

    /// Check if this patch is a quad.
    pub fn is_quad(&self) -> bool {
        self.points.len() == 4
    }

    /// Re-read positions from the vertex arena and refresh derived data.
    fn refresh(&mut self, vertices: &[DVec3]) {
        self.points = self.indices.iter().map(|&i| vertices[i]).collect();
        self.center = kernel::centroid(&self.points);
        self.area = kernel::polygon_area(&self.points);
    }
}

/// A polygonal mesh: vertices, coarse faces and their shading patches.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Mesh name
    pub name: String,

    /// Vertex arena; subdivision appends edge midpoints after the
    /// coarse vertices
    pub vertices: Vec<DVec3>,

    /// Coarse input faces, used for occlusion and never modified by the solver
    pub faces: Vec<Patch>,

    /// Patches the solver works on
    pub patches: Vec<Patch>,

    /// Surface material
    pub material: Material,

    /// Subdivision depth that overrides any scene-wide setting
    pub subdivision_override: Option<u32>,

    /// Axis-aligned bounding box of the coarse vertices
    pub bounds: Aabb,

    coarse_vertex_count: usize,
}

impl Mesh {
    /// Create a mesh from vertex positions and faces of 3 or 4 vertex indices.
    ///
    /// Without explicit `normals`, each face normal is derived from its
    /// first three vertices assuming counter-clockwise winding seen from
    /// outside. Patches start out as a copy of the faces.
    pub fn new(
        name: impl Into<String>,
        vertices: Vec<DVec3>,
        faces: Vec<Vec<usize>>,
        normals: Option<Vec<DVec3>>,
    ) -> MeshResult<Self> {
        let name = name.into();
        if faces.is_empty() {
            return Err(MeshError::Empty(name));
        }
        if let Some(normals) = &normals {
            if normals.len() != faces.len() {
                return Err(MeshError::NormalCountMismatch {
                    mesh: name,
                    faces: faces.len(),
                    normals: normals.len(),
                });
            }
        }

        let mut patches = Vec::with_capacity(faces.len());
        for (face, indices) in faces.into_iter().enumerate() {
            if !(3..=4).contains(&indices.len()) {
                return Err(MeshError::UnsupportedFace {
                    mesh: name,
                    face,
                    count: indices.len(),
                });
            }
            if let Some(&index) = indices.iter().find(|&&i| i >= vertices.len()) {
                return Err(MeshError::IndexOutOfRange {
                    mesh: name,
                    face,
                    index,
                    vertex_count: vertices.len(),
                });
            }

            let points: Vec<DVec3> = indices.iter().map(|&i| vertices[i]).collect();
            let normal = match &normals {
                Some(normals) => normals[face].normalize_or_zero(),
                None => kernel::face_normal(&points, Winding::CounterClockwise),
            };
            let patch = Patch::new(indices, &vertices, normal, face);
            if !normal.is_finite() || normal == DVec3::ZERO || patch.area <= 0.0 {
                return Err(MeshError::DegenerateFace { mesh: name, face });
            }
            patches.push(patch);
        }

        let bounds = Aabb::enclosing(&vertices);
        let coarse_vertex_count = vertices.len();
        Ok(Self {
            name,
            vertices,
            patches: patches.clone(),
            faces: patches,
            material: Material::default(),
            subdivision_override: None,
            bounds,
            coarse_vertex_count,
        })
    }

    /// Set the material of this mesh.
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Pin the subdivision depth of this mesh.
    pub fn with_subdivision_override(mut self, iterations: u32) -> Self {
        self.subdivision_override = Some(iterations);
        self
    }

    /// Reverse every face and patch normal (e.g. for the inside of a room).
    pub fn flip_normals(&mut self) {
        for patch in self.faces.iter_mut().chain(self.patches.iter_mut()) {
            patch.normal = -patch.normal;
        }
    }

    /// Apply an affine transform to vertices, faces and patches.
    ///
    /// Normals are carried through the inverse transpose so non-uniform
    /// scales keep them perpendicular.
    pub fn transform(&mut self, matrix: &DMat4) {
        let normal_matrix = matrix.inverse().transpose();
        for v in &mut self.vertices {
            *v = matrix.transform_point3(*v);
        }
        for patch in self.faces.iter_mut().chain(self.patches.iter_mut()) {
            patch.refresh(&self.vertices);
            patch.normal = normal_matrix.transform_vector3(patch.normal).normalize();
        }
        self.bounds = Aabb::enclosing(&self.vertices[..self.coarse_vertex_count]);
    }

    /// Number of vertices belonging to the coarse input.
    pub fn coarse_vertex_count(&self) -> usize {
        self.coarse_vertex_count
    }

    /// Get the number of vertices (including subdivision midpoints).
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of coarse faces.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Get the number of patches.
    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }

    /// Area of the first coarse face, used to pick even subdivision depths.
    pub fn representative_area(&self) -> f64 {
        self.faces.first().map_or(0.0, |f| f.area)
    }

    /// Unique undirected edges of the coarse faces, in ascending order.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges = BTreeSet::new();
        for face in &self.faces {
            let n = face.indices.len();
            for k in 0..n {
                edges.insert(Edge::new(face.indices[k], face.indices[(k + 1) % n]));
            }
        }
        edges.into_iter().collect()
    }

    /// Mark every patch as an emitter showing the material color.
    pub fn make_light(&mut self) {
        let radiance = self.material.color * 255.0;
        for patch in &mut self.patches {
            patch.radiance = radiance;
        }
    }

    /// Drop subdivision midpoints from the vertex arena.
    pub(crate) fn truncate_to_coarse(&mut self) {
        self.vertices.truncate(self.coarse_vertex_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangle_square() -> Mesh {
        let vertices = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        ];
        Mesh::new("square", vertices, vec![vec![0, 1, 2], vec![2, 3, 0]], None).unwrap()
    }

    #[test]
    fn test_mesh_creation() {
        let mesh = two_triangle_square();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.patch_count(), 2);
        assert_eq!(mesh.faces[1].parent, 1);
        assert!((mesh.faces[0].area - 0.5).abs() < 1e-12);
        assert!((mesh.faces[0].normal - DVec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_explicit_normals_are_normalized() {
        let vertices = vec![DVec3::ZERO, DVec3::X, DVec3::Y];
        let mesh = Mesh::new("tri", vertices, vec![vec![0, 1, 2]], Some(vec![DVec3::new(0.0, 0.0, -3.0)]))
            .unwrap();

        assert_eq!(mesh.faces[0].normal, DVec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_rejects_bad_faces() {
        let vertices = vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z, DVec3::ONE];

        let err = Mesh::new("pent", vertices.clone(), vec![vec![0, 1, 2, 3, 4]], None).unwrap_err();
        assert!(matches!(err, MeshError::UnsupportedFace { count: 5, .. }));

        let err = Mesh::new("oob", vertices.clone(), vec![vec![0, 1, 9]], None).unwrap_err();
        assert!(matches!(err, MeshError::IndexOutOfRange { index: 9, .. }));

        let err = Mesh::new("empty", vertices, vec![], None).unwrap_err();
        assert_eq!(err, MeshError::Empty("empty".to_string()));
    }

    #[test]
    fn test_rejects_degenerate_face() {
        // Collinear vertices have no area and no normal
        let vertices = vec![DVec3::ZERO, DVec3::X, DVec3::new(2.0, 0.0, 0.0)];
        let err = Mesh::new("line", vertices, vec![vec![0, 1, 2]], None).unwrap_err();

        assert!(matches!(err, MeshError::DegenerateFace { face: 0, .. }));
    }

    #[test]
    fn test_edges() {
        let mesh = two_triangle_square();
        let edges = mesh.edges();

        // Four sides plus the shared diagonal
        assert_eq!(edges.len(), 5);
        assert!(edges.contains(&Edge::new(2, 0)));
        assert_eq!(Edge::new(3, 1), Edge { a: 1, b: 3 });
    }

    #[test]
    fn test_transform() {
        let mut mesh = two_triangle_square();
        let matrix = DMat4::from_translation(DVec3::new(0.0, 0.0, 5.0))
            * DMat4::from_rotation_x(std::f64::consts::PI);
        mesh.transform(&matrix);

        assert!((mesh.faces[0].normal - DVec3::new(0.0, 0.0, -1.0)).length() < 1e-12);
        assert!((mesh.patches[0].center.z - 5.0).abs() < 1e-12);
        assert!((mesh.bounds.z.min - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_flip_normals() {
        let mut mesh = two_triangle_square();
        mesh.flip_normals();

        assert_eq!(mesh.faces[0].normal, -DVec3::Z);
        assert_eq!(mesh.patches[1].normal, -DVec3::Z);
    }

    #[test]
    fn test_make_light() {
        let mut mesh = two_triangle_square().with_material(Material::new("lamp", DVec3::new(1.0, 0.5, 0.0)));
        mesh.make_light();

        for patch in &mesh.patches {
            assert_eq!(patch.radiance, DVec3::new(255.0, 127.5, 0.0));
        }
    }
}
