//! The radiosity iterator.
//!
//! A solve runs as a strict sequence of phases:
//!
//! ```text
//! Uninitialized -> DirectLit -> FormFactorsReady -> Converged -> Finalized
//! ```
//!
//! With `iterations == 0` the solver goes straight to `Finalized`; with
//! `iterations == 1` it finalizes right after direct lighting.
//!
//! Energy propagation mutates illumination in place while it walks the
//! patch pairs, so the visiting order is part of the result: receiver
//! mesh, receiver patch, source mesh, source patch, all ascending.

use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

use rad_core::Scene;
use rad_math::{kernel, DVec3};
use serde::{Deserialize, Serialize};

use crate::error::{SolverError, SolverResult};
use crate::form_factor::FormFactors;
use crate::visibility::Visibility;

/// Radiosity solve settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiosityConfig {
    /// Total passes: 0 disables lighting, 1 is direct light only
    pub iterations: u32,
    /// Fraction of energy a patch passes on per propagation step
    pub reflectivity: f64,
    /// Scale on light emission
    pub light_intensity: f64,
    /// Accepted for compatibility, unused
    pub threshold: f64,
    /// Tint transferred energy by the source mesh color
    pub color_bleeding: bool,
    /// Let spheres block light and form factors
    pub occluding_spheres: bool,
    /// Upper bound on form factor matrix storage
    pub max_matrix_bytes: u64,
}

impl Default for RadiosityConfig {
    fn default() -> Self {
        Self {
            iterations: 4,
            reflectivity: 0.2,
            light_intensity: 1.0,
            threshold: 10.0,
            color_bleeding: false,
            occluding_spheres: false,
            max_matrix_bytes: 1 << 30,
        }
    }
}

/// Phase of a radiosity solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverState {
    Uninitialized,
    DirectLit,
    FormFactorsReady,
    Converged,
    Finalized,
}

/// Wall-clock time spent in each phase.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimingReport {
    /// Direct lighting
    pub initial: Duration,
    /// Form factor matrix construction
    pub form_factors: Duration,
    /// Mean time of one propagation pass
    pub per_pass: Duration,
}

impl fmt::Display for TimingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Initial: {:?}, FormFactors: {:?}, One pass: {:?}",
            self.initial, self.form_factors, self.per_pass
        )
    }
}

impl TimingReport {
    /// Write the report as a single line of text.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        std::fs::write(path, self.to_string())
    }
}

/// Drives one radiosity solve over a scene.
pub struct RadiositySolver<'a> {
    scene: &'a mut Scene,
    config: RadiosityConfig,
    state: SolverState,
    form_factors: Option<FormFactors>,
    timing: TimingReport,
}

impl<'a> RadiositySolver<'a> {
    /// Create a solver. The scene must already be subdivided.
    pub fn new(scene: &'a mut Scene, config: RadiosityConfig) -> Self {
        Self {
            scene,
            config,
            state: SolverState::Uninitialized,
            form_factors: None,
            timing: TimingReport::default(),
        }
    }

    pub fn state(&self) -> SolverState {
        self.state
    }

    pub fn config(&self) -> &RadiosityConfig {
        &self.config
    }

    pub fn timing(&self) -> TimingReport {
        self.timing
    }

    /// The form factor matrix, once computed or supplied.
    pub fn form_factors(&self) -> Option<&FormFactors> {
        self.form_factors.as_ref()
    }

    fn transition(&mut self, from: SolverState, to: SolverState) -> SolverResult<()> {
        if self.state != from {
            return Err(SolverError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }

    /// State from which `finalize` may run for the configured iterations.
    fn finalizable_state(&self) -> SolverState {
        match self.config.iterations {
            0 => SolverState::Uninitialized,
            1 => SolverState::DirectLit,
            _ => SolverState::Converged,
        }
    }

    /// Shine every light patch onto every facing, unobstructed patch.
    ///
    /// Lights never occlude and only the receiving mesh is excluded
    /// from the obstruction test.
    pub fn direct_lighting(&mut self) -> SolverResult<()> {
        if self.config.iterations == 0 {
            return Err(SolverError::InvalidTransition {
                from: self.state,
                to: SolverState::DirectLit,
            });
        }
        self.transition(SolverState::Uninitialized, SolverState::DirectLit)?;
        let start = Instant::now();

        let scene: &Scene = &*self.scene;
        let visibility = Visibility::new(scene, self.config.occluding_spheres);
        let mut gathered: Vec<Vec<DVec3>> = scene
            .meshes
            .iter()
            .map(|mesh| vec![DVec3::ZERO; mesh.patch_count()])
            .collect();

        for light in &scene.lights {
            let emission = light.material.color * self.config.light_intensity;
            for emitter in &light.patches {
                for (i, mesh) in scene.meshes.iter().enumerate() {
                    for (j, receiver) in mesh.patches.iter().enumerate() {
                        let dir = receiver.center - emitter.center;
                        let len = dir.length();
                        let cos_i = kernel::cos_between(emitter.normal, dir);
                        let cos_j = -kernel::cos_between(receiver.normal, dir);

                        if cos_i >= 0.0
                            && cos_j >= 0.0
                            && !visibility.is_obstructed(emitter.center, receiver.center, &[i])
                        {
                            let coef = (1.0 / (std::f64::consts::PI * len * len)).min(1.0);
                            gathered[i][j] += emission * coef;
                        }
                    }
                }
            }
        }

        for (mesh, energy) in self.scene.meshes.iter_mut().zip(gathered) {
            for (patch, e) in mesh.patches.iter_mut().zip(energy) {
                patch.illumination += e;
            }
        }

        self.timing.initial = start.elapsed();
        log::info!("Direct lighting done in {:?}", self.timing.initial);
        Ok(())
    }

    /// Build the form factor matrix for the current patches.
    pub fn compute_form_factors(&mut self) -> SolverResult<()> {
        if self.state != SolverState::DirectLit || self.config.iterations < 2 {
            return Err(SolverError::InvalidTransition {
                from: self.state,
                to: SolverState::FormFactorsReady,
            });
        }
        let start = Instant::now();

        let scene: &Scene = &*self.scene;
        let visibility = Visibility::new(scene, self.config.occluding_spheres);
        let matrix = FormFactors::compute(scene, &visibility, self.config.max_matrix_bytes)?;

        self.form_factors = Some(matrix);
        self.state = SolverState::FormFactorsReady;
        self.timing.form_factors = start.elapsed();
        log::info!("Form factors calculated in {:?}", self.timing.form_factors);
        Ok(())
    }

    /// Use a precomputed form factor matrix instead of computing one.
    pub fn set_form_factors(&mut self, matrix: FormFactors) -> SolverResult<()> {
        let expected = self.scene.patch_count();
        if matrix.len() != expected {
            return Err(SolverError::PatchCountMismatch {
                expected,
                actual: matrix.len(),
            });
        }
        if self.config.iterations < 2 {
            return Err(SolverError::InvalidTransition {
                from: self.state,
                to: SolverState::FormFactorsReady,
            });
        }
        self.transition(SolverState::DirectLit, SolverState::FormFactorsReady)?;
        self.form_factors = Some(matrix);
        Ok(())
    }

    /// Run the `iterations - 1` energy propagation passes.
    pub fn propagate(&mut self) -> SolverResult<()> {
        if self.state != SolverState::FormFactorsReady {
            return Err(SolverError::InvalidTransition {
                from: self.state,
                to: SolverState::Converged,
            });
        }
        let Some(matrix) = self.form_factors.as_ref() else {
            return Err(SolverError::InvalidTransition {
                from: self.state,
                to: SolverState::Converged,
            });
        };
        let start = Instant::now();

        let mut offsets = Vec::with_capacity(self.scene.meshes.len());
        let mut illumination = Vec::with_capacity(matrix.len());
        for mesh in &self.scene.meshes {
            offsets.push(illumination.len());
            illumination.extend(mesh.patches.iter().map(|p| p.illumination));
        }
        let counts: Vec<usize> = self.scene.meshes.iter().map(|m| m.patch_count()).collect();
        let tints: Vec<Option<DVec3>> = self
            .scene
            .meshes
            .iter()
            .map(|m| self.config.color_bleeding.then_some(m.material.color))
            .collect();

        let passes = self.config.iterations - 1;
        for pass in 1..=passes {
            propagation_pass(
                matrix,
                &offsets,
                &counts,
                &tints,
                self.config.reflectivity,
                &mut illumination,
            );
            log::debug!("Radiosity pass {} of {} done", pass, passes);
        }

        for (mesh, &offset) in self.scene.meshes.iter_mut().zip(&offsets) {
            for (patch, value) in mesh.patches.iter_mut().zip(&illumination[offset..]) {
                patch.illumination = *value;
            }
        }

        self.timing.per_pass = start.elapsed() / passes;
        self.state = SolverState::Converged;
        log::info!("Radiosity converged after {} passes", passes);
        Ok(())
    }

    /// Turn accumulated illumination into display radiance.
    ///
    /// `radiance = clamp(illumination * 255, 0, 255) * material color`.
    /// Light patches keep the radiance they were given as emitters.
    pub fn finalize(&mut self) -> SolverResult<()> {
        let from = self.finalizable_state();
        self.transition(from, SolverState::Finalized)?;

        for mesh in &mut self.scene.meshes {
            let color = mesh.material.color;
            for patch in &mut mesh.patches {
                patch.radiance = (patch.illumination * 255.0).clamp(DVec3::ZERO, DVec3::splat(255.0)) * color;
            }
        }

        log::info!("Radiosity done");
        Ok(())
    }

    /// Run every phase the configuration calls for.
    pub fn run(&mut self) -> SolverResult<TimingReport> {
        if self.config.iterations > 0 {
            self.direct_lighting()?;
        }
        if self.config.iterations > 1 {
            self.compute_form_factors()?;
            self.propagate()?;
        }
        self.finalize()?;
        Ok(self.timing)
    }
}

/// One in-place pass over all cross-mesh patch pairs.
///
/// Each nonzero coupling moves `F * reflectivity * source` (tinted when
/// color bleeding is on) from the source patch to the receiver.
fn propagation_pass(
    matrix: &FormFactors,
    offsets: &[usize],
    counts: &[usize],
    tints: &[Option<DVec3>],
    reflectivity: f64,
    illumination: &mut [DVec3],
) {
    for si in 0..offsets.len() {
        for r in offsets[si]..offsets[si] + counts[si] {
            for i in 0..offsets.len() {
                if i == si {
                    continue;
                }
                for s in offsets[i]..offsets[i] + counts[i] {
                    let f = matrix.get(r, s);
                    if f == 0.0 {
                        continue;
                    }
                    let mut energy = illumination[s] * (f * reflectivity);
                    if let Some(tint) = tints[i] {
                        energy *= tint;
                    }
                    illumination[r] += energy;
                    illumination[s] -= energy;
                }
            }
        }
    }
}

/// Run a complete solve over `scene` with `config`.
pub fn run_radiosity(scene: &mut Scene, config: RadiosityConfig) -> SolverResult<TimingReport> {
    RadiositySolver::new(scene, config).run()
}
