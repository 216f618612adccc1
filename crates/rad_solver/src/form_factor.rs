//! Dense patch-to-patch form factor matrix.

use rad_core::Scene;
use rad_math::kernel;

use crate::error::{SolverError, SolverResult};
use crate::visibility::Visibility;

/// Visibility-weighted coupling between every ordered pair of patches.
///
/// Patches are numbered globally in scene order: all patches of mesh 0,
/// then mesh 1, and so on. `get(r, s)` is the share of energy leaving
/// patch `s` that patch `r` receives. The matrix is not symmetric and
/// no reciprocity is enforced.
#[derive(Clone, Debug, PartialEq)]
pub struct FormFactors {
    size: usize,
    areas: Vec<f64>,
    values: Vec<f64>,
}

impl FormFactors {
    /// An all-zero matrix for patches with the given areas.
    pub fn zeros(areas: Vec<f64>) -> Self {
        let size = areas.len();
        Self {
            size,
            areas,
            values: vec![0.0; size * size],
        }
    }

    /// Bytes needed to store the matrix for `patches` patches.
    pub fn required_bytes(patches: usize) -> u64 {
        (patches as u64)
            .saturating_mul(patches as u64)
            .saturating_mul(std::mem::size_of::<f64>() as u64)
    }

    /// Compute the form factors of every cross-mesh patch pair.
    ///
    /// Pairs on the same mesh stay zero. Fails before allocating when
    /// the matrix would exceed `max_bytes`.
    pub fn compute(scene: &Scene, visibility: &Visibility, max_bytes: u64) -> SolverResult<Self> {
        let patches = scene.patch_count();
        let bytes = Self::required_bytes(patches);
        if bytes > max_bytes {
            return Err(SolverError::MatrixTooLarge {
                patches,
                bytes,
                limit: max_bytes,
            });
        }

        let areas = scene
            .meshes
            .iter()
            .flat_map(|mesh| mesh.patches.iter().map(|p| p.area))
            .collect();
        let mut matrix = Self::zeros(areas);

        let mut r = 0;
        for (si, receiver_mesh) in scene.meshes.iter().enumerate() {
            for receiver in &receiver_mesh.patches {
                let mut s = 0;
                for (i, source_mesh) in scene.meshes.iter().enumerate() {
                    if i == si {
                        s += source_mesh.patch_count();
                        continue;
                    }
                    for source in &source_mesh.patches {
                        let dir = source.center - receiver.center;
                        let len = dir.length();
                        let cos_i = kernel::cos_between(receiver.normal, dir);
                        let cos_j = -kernel::cos_between(source.normal, dir);

                        if cos_i > 0.0
                            && cos_j > 0.0
                            && !visibility.is_obstructed(receiver.center, source.center, &[si, i])
                        {
                            matrix.values[r * patches + s] =
                                cos_i * cos_j * source.area / (std::f64::consts::PI * len * len);
                        }
                        s += 1;
                    }
                }
                r += 1;
            }
        }

        log::debug!(
            "Form factors: {} of {} pairs coupled, reciprocity error {:e}",
            matrix.nonzero_count(),
            patches * patches,
            matrix.reciprocity_error()
        );
        Ok(matrix)
    }

    /// Number of patches the matrix covers.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Form factor from `source` onto `receiver`.
    #[inline]
    pub fn get(&self, receiver: usize, source: usize) -> f64 {
        self.values[receiver * self.size + source]
    }

    pub fn set(&mut self, receiver: usize, source: usize, value: f64) {
        self.values[receiver * self.size + source] = value;
    }

    /// Number of nonzero entries.
    pub fn nonzero_count(&self) -> usize {
        self.values.iter().filter(|&&f| f != 0.0).count()
    }

    /// Largest violation of `A_r F[r,s] = A_s F[s,r]` over all pairs.
    pub fn reciprocity_error(&self) -> f64 {
        let mut worst: f64 = 0.0;
        for r in 0..self.size {
            for s in (r + 1)..self.size {
                let lhs = self.areas[r] * self.get(r, s);
                let rhs = self.areas[s] * self.get(s, r);
                worst = worst.max((lhs - rhs).abs());
            }
        }
        worst
    }
}
