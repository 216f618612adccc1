//! Midpoint subdivision of coarse faces into shading patches.
//!
//! Each iteration splits every triangle `(a, b, c)` at the midpoint `m`
//! of its `(a, c)` edge into `(b, m, a)` and `(c, m, b)`. Quads are cut
//! along the fixed `a-c` diagonal into `(a, d, c)` and `(c, b, a)`.
//! Midpoints are cached per undirected edge so neighbouring triangles
//! share the new vertex.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::mesh::{Mesh, Patch};

/// How scene-wide subdivision depths are chosen per mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubdivisionStrategy {
    /// Every mesh gets the configured depth.
    Uniform,
    /// The mesh with the smallest faces gets the configured depth; the
    /// others are refined until their patches match its patch size.
    EvenBySmallest,
    /// The mesh with the largest faces gets the configured depth; the
    /// others are refined less so their patches match its patch size.
    #[default]
    EvenByLargest,
}

/// Subdivision settings for a whole scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubdivisionConfig {
    /// Depth for regular meshes (reference depth for even strategies)
    pub iterations: u32,
    /// Depth selection strategy
    pub strategy: SubdivisionStrategy,
    /// Depth for light meshes
    pub light_iterations: u32,
}

impl Default for SubdivisionConfig {
    fn default() -> Self {
        Self {
            iterations: 4,
            strategy: SubdivisionStrategy::EvenByLargest,
            light_iterations: 1,
        }
    }
}

/// Pick the subdivision depth of every mesh.
///
/// Meshes with an override keep it. Under the even strategies the
/// reference patch area is the smallest (or largest) representative face
/// area among the remaining meshes divided by `2^iterations`, and each
/// mesh gets `round(log2(area / reference))`, clamped at zero.
pub fn plan_depths(meshes: &[Mesh], config: &SubdivisionConfig) -> Vec<u32> {
    let free_areas = meshes
        .iter()
        .filter(|m| m.subdivision_override.is_none())
        .map(Mesh::representative_area);

    let reference = match config.strategy {
        SubdivisionStrategy::Uniform => None,
        SubdivisionStrategy::EvenBySmallest => free_areas.reduce(f64::min),
        SubdivisionStrategy::EvenByLargest => free_areas.reduce(f64::max),
    }
    .map(|area| area / 2f64.powi(config.iterations as i32));

    meshes
        .iter()
        .map(|mesh| match (mesh.subdivision_override, reference) {
            (Some(depth), _) => depth,
            (None, None) => config.iterations,
            (None, Some(reference)) => {
                let depth = (mesh.representative_area() / reference).log2().round();
                if depth.is_finite() && depth > 0.0 {
                    depth as u32
                } else {
                    0
                }
            }
        })
        .collect()
}

impl Mesh {
    /// Rebuild `patches` from the coarse faces with `iterations` rounds of
    /// midpoint splitting.
    ///
    /// Zero iterations leaves the patches identical to the faces. Every
    /// patch keeps the normal of, and the index of, the coarse face it
    /// descends from. Subdividing again starts over from the faces.
    pub fn subdivide(&mut self, iterations: u32) {
        self.truncate_to_coarse();

        let mut midpoints: BTreeMap<(usize, usize), usize> = BTreeMap::new();
        let mut current = self.faces.clone();

        for _ in 0..iterations {
            let mut next = Vec::with_capacity(current.len() * 2);
            for patch in &current {
                let halves = match *patch.indices.as_slice() {
                    [a, b, c] => {
                        let m = self.midpoint(&mut midpoints, a, c);
                        [vec![b, m, a], vec![c, m, b]]
                    }
                    [a, b, c, d] => [vec![a, d, c], vec![c, b, a]],
                    // Faces are validated to 3 or 4 vertices
                    _ => continue,
                };
                for indices in halves {
                    next.push(Patch::new(indices, &self.vertices, patch.normal, patch.parent));
                }
            }
            current = next;
        }

        log::debug!(
            "Subdivided '{}' {} times: {} faces -> {} patches, {} vertices",
            self.name,
            iterations,
            self.faces.len(),
            current.len(),
            self.vertices.len()
        );
        self.patches = current;
    }

    /// Index of the midpoint vertex of edge `(a, b)`, creating it once.
    fn midpoint(&mut self, cache: &mut BTreeMap<(usize, usize), usize>, a: usize, b: usize) -> usize {
        let key = if a < b { (a, b) } else { (b, a) };
        *cache.entry(key).or_insert_with(|| {
            self.vertices.push((self.vertices[a] + self.vertices[b]) * 0.5);
            self.vertices.len() - 1
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rad_math::DVec3;

    fn triangle() -> Mesh {
        let vertices = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(0.0, 2.0, 0.0),
        ];
        Mesh::new("tri", vertices, vec![vec![0, 1, 2]], None).unwrap()
    }

    /// Unit square as two triangles whose `(a, c)` edges coincide.
    fn split_square(size: f64) -> Mesh {
        let vertices = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(size, 0.0, 0.0),
            DVec3::new(size, size, 0.0),
            DVec3::new(0.0, size, 0.0),
        ];
        Mesh::new("square", vertices, vec![vec![0, 1, 2], vec![2, 3, 0]], None).unwrap()
    }

    fn quad(size: f64) -> Mesh {
        let vertices = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(size, 0.0, 0.0),
            DVec3::new(size, size, 0.0),
            DVec3::new(0.0, size, 0.0),
        ];
        Mesh::new("quad", vertices, vec![vec![0, 1, 2, 3]], None).unwrap()
    }

    #[test]
    fn test_single_triangle_one_iteration() {
        let mut mesh = triangle();
        mesh.subdivide(1);

        assert_eq!(mesh.patch_count(), 2);
        assert_eq!(mesh.vertex_count(), 4);

        // Both halves share the new midpoint of edge (0, 2)
        assert_eq!(mesh.patches[0].indices, vec![1, 3, 0]);
        assert_eq!(mesh.patches[1].indices, vec![2, 3, 1]);
        assert_eq!(mesh.vertices[3], DVec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_shared_edge_midpoint_is_reused() {
        let mut mesh = split_square(1.0);
        let original = mesh.vertex_count();
        mesh.subdivide(1);

        assert_eq!(mesh.patch_count(), 4);
        assert_eq!(mesh.vertex_count(), original + 1);
    }

    #[test]
    fn test_deeper_subdivision_dedups_midpoints() {
        let mut mesh = split_square(1.0);
        mesh.subdivide(2);

        assert_eq!(mesh.patch_count(), 8);
        // Centre midpoint plus one per outer edge
        assert_eq!(mesh.vertex_count(), 4 + 1 + 4);
    }

    #[test]
    fn test_patches_inherit_normal_and_parent() {
        let mut mesh = split_square(1.0);
        mesh.subdivide(3);

        for patch in &mesh.patches {
            assert_eq!(patch.normal, mesh.faces[patch.parent].normal);
        }
        let from_second = mesh.patches.iter().filter(|p| p.parent == 1).count();
        assert_eq!(from_second, 8);
    }

    #[test]
    fn test_patch_areas_and_centers() {
        let mut mesh = triangle();
        mesh.subdivide(2);

        let total: f64 = mesh.patches.iter().map(|p| p.area).sum();
        assert!((total - 2.0).abs() < 1e-12);

        for patch in &mesh.patches {
            let expected = (patch.points[0] + patch.points[1] + patch.points[2]) / 3.0;
            assert!((patch.center - expected).length() < 1e-12);
        }
    }

    #[test]
    fn test_zero_iterations_copies_faces() {
        let mut mesh = quad(1.0);
        mesh.subdivide(0);

        assert_eq!(mesh.patches, mesh.faces);
        assert!(mesh.patches[0].is_quad());
    }

    #[test]
    fn test_quad_splits_on_fixed_diagonal() {
        let mut mesh = quad(1.0);
        mesh.subdivide(1);

        assert_eq!(mesh.patches[0].indices, vec![0, 3, 2]);
        assert_eq!(mesh.patches[1].indices, vec![2, 1, 0]);
        assert_eq!(mesh.vertex_count(), 4);
    }

    #[test]
    fn test_resubdivide_starts_from_faces() {
        let mut mesh = split_square(1.0);
        mesh.subdivide(3);
        mesh.subdivide(1);

        assert_eq!(mesh.patch_count(), 4);
        assert_eq!(mesh.vertex_count(), 5);
    }

    #[test]
    fn test_plan_depths_even_by_largest() {
        let meshes = vec![quad(4.0), quad(2.0), quad(1.0).with_subdivision_override(7)];
        let config = SubdivisionConfig {
            iterations: 3,
            strategy: SubdivisionStrategy::EvenByLargest,
            light_iterations: 1,
        };

        // Reference patch area is 16 / 8 = 2
        assert_eq!(plan_depths(&meshes, &config), vec![3, 1, 7]);
    }

    #[test]
    fn test_plan_depths_even_by_smallest() {
        let meshes = vec![quad(4.0), quad(2.0)];
        let config = SubdivisionConfig {
            iterations: 1,
            strategy: SubdivisionStrategy::EvenBySmallest,
            light_iterations: 1,
        };

        // Reference patch area is 4 / 2 = 2
        assert_eq!(plan_depths(&meshes, &config), vec![3, 1]);
    }

    #[test]
    fn test_plan_depths_clamps_at_zero() {
        let meshes = vec![quad(8.0), quad(1.0)];
        let config = SubdivisionConfig {
            iterations: 1,
            strategy: SubdivisionStrategy::EvenByLargest,
            light_iterations: 1,
        };

        // 1 / 32 of the reference area would need a negative depth
        assert_eq!(plan_depths(&meshes, &config), vec![1, 0]);
    }

    #[test]
    fn test_plan_depths_uniform() {
        let meshes = vec![quad(8.0), quad(1.0).with_subdivision_override(2)];
        let config = SubdivisionConfig {
            iterations: 5,
            strategy: SubdivisionStrategy::Uniform,
            light_iterations: 1,
        };

        assert_eq!(plan_depths(&meshes, &config), vec![5, 2]);
    }
}
