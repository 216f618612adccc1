//! Vertex stream generation for display.
//!
//! Produces a flat triangle list of `(position, color)` records. Colors
//! are radiance mapped to `[0, 1]` with an opaque alpha.

use std::collections::BTreeMap;

use rad_core::{Mesh, Patch, Scene};
use rad_math::DVec3;

/// Corner order that splits a quad into two triangles.
pub const QUAD_ORDER: [usize; 6] = [0, 3, 2, 2, 1, 0];

/// A single output vertex (homogeneous position, RGBA color).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 4],
    pub color: [f32; 4],
}

impl Vertex {
    /// Size of one record in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Create a vertex from a point and a color in `[0, 1]`.
    pub fn new(position: DVec3, color: DVec3) -> Self {
        Self {
            position: [position.x as f32, position.y as f32, position.z as f32, 1.0],
            color: [color.x as f32, color.y as f32, color.z as f32, 1.0],
        }
    }
}

fn push_flat(out: &mut Vec<Vertex>, patch: &Patch) {
    let color = patch.radiance / 255.0;
    if patch.is_quad() {
        out.extend(QUAD_ORDER.iter().map(|&k| Vertex::new(patch.points[k], color)));
    } else {
        out.extend(patch.points.iter().map(|&p| Vertex::new(p, color)));
    }
}

fn flat_vertex_count(mesh: &Mesh) -> usize {
    mesh.patches
        .iter()
        .map(|p| if p.is_quad() { 6 } else { 3 })
        .sum()
}

/// One flat-shaded triangle list: 3 records per triangle patch, 6 per
/// quad. Meshes come first, then lights.
pub fn build_vertices(scene: &Scene) -> Vec<Vertex> {
    let count = scene
        .meshes
        .iter()
        .chain(&scene.lights)
        .map(flat_vertex_count)
        .sum();
    let mut out = Vec::with_capacity(count);

    for mesh in scene.meshes.iter().chain(&scene.lights) {
        for patch in &mesh.patches {
            push_flat(&mut out, patch);
        }
    }
    out
}

/// A smooth-shaded triangle list.
///
/// Vertex colors are averaged over the patches of the same coarse face
/// that share the vertex. Each triangle patch becomes a fan of six
/// triangles around its centroid, split at the edge midpoints. Quad
/// patches and lights stay flat.
pub fn build_interpolated_vertices(scene: &Scene) -> Vec<Vertex> {
    let mut out = Vec::new();

    for mesh in &scene.meshes {
        let mut descendants: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (j, patch) in mesh.patches.iter().enumerate() {
            descendants.entry(patch.parent).or_default().push(j);
        }

        for face in 0..mesh.face_count() {
            let Some(group) = descendants.get(&face) else {
                continue;
            };
            interpolate_face(&mut out, mesh, group);
        }
    }

    for light in &scene.lights {
        for patch in &light.patches {
            push_flat(&mut out, patch);
        }
    }

    log::debug!("Interpolated vertex stream: {} vertices", out.len());
    out
}

fn interpolate_face(out: &mut Vec<Vertex>, mesh: &Mesh, group: &[usize]) {
    let mut sums: BTreeMap<usize, (DVec3, f64)> = BTreeMap::new();
    for &j in group {
        let patch = &mesh.patches[j];
        for &v in &patch.indices {
            let entry = sums.entry(v).or_insert((DVec3::ZERO, 0.0));
            entry.0 += patch.radiance;
            entry.1 += 1.0;
        }
    }
    let colors: BTreeMap<usize, DVec3> = sums
        .into_iter()
        .map(|(v, (sum, n))| (v, sum / n / 255.0))
        .collect();
    let color_of = |v: usize| colors.get(&v).copied().unwrap_or(DVec3::ZERO);

    for &j in group {
        let patch = &mesh.patches[j];
        if !patch.is_triangle() {
            push_flat(out, patch);
            continue;
        }

        let center_color =
            (color_of(patch.indices[0]) + color_of(patch.indices[1]) + color_of(patch.indices[2])) / 3.0;
        let center = Vertex::new(patch.center, center_color);

        for k in 0..3 {
            let next = (k + 1) % 3;
            let (p1, p2) = (patch.points[k], patch.points[next]);
            let (c1, c2) = (color_of(patch.indices[k]), color_of(patch.indices[next]));
            let mid = Vertex::new((p1 + p2) * 0.5, (c1 + c2) * 0.5);

            out.extend([
                Vertex::new(p1, c1),
                center,
                mid,
                mid,
                center,
                Vertex::new(p2, c2),
            ]);
        }
    }
}
