//! Debug views that paint patch radiance instead of solving.
//!
//! Both views overwrite `radiance` with [`PASS`] or [`FAIL`] so a scene's
//! orientation problems show up directly in the vertex stream.

use rad_core::{Patch, Scene};
use rad_math::{kernel, DVec3};
use serde::{Deserialize, Serialize};

/// Radiance of a patch that passed a check.
pub const PASS: DVec3 = DVec3::new(0.0, 128.0, 0.0);
/// Radiance of a patch that failed a check.
pub const FAIL: DVec3 = DVec3::new(255.0, 0.0, 0.0);

/// Which debug view to paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebugView {
    /// See [`debug_normals`]
    Normals,
    /// See [`debug_facing`]
    Facing,
}

impl DebugView {
    pub fn apply(self, scene: &mut Scene) {
        match self {
            DebugView::Normals => debug_normals(scene),
            DebugView::Facing => debug_facing(scene),
        }
    }
}

fn mark(passed: bool) -> DVec3 {
    if passed {
        PASS
    } else {
        FAIL
    }
}

/// Paint every patch by which side of its plane the origin lies on.
///
/// A patch passes when its normal points toward the origin, which for a
/// room centered on the origin means it faces inward.
pub fn debug_normals(scene: &mut Scene) {
    let mut painted = 0;
    for mesh in scene.lights.iter_mut().chain(scene.meshes.iter_mut()) {
        for patch in &mut mesh.patches {
            let d = -patch.normal.dot(patch.center);
            patch.radiance = mark(d > 0.0);
            painted += 1;
        }
    }
    log::info!("Normal check painted {} patches", painted);
}

fn faces_light(emitter: &Patch, receiver: &Patch) -> bool {
    let dir = receiver.center - emitter.center;
    let cos_i = kernel::cos_between(emitter.normal, dir);
    let cos_j = kernel::cos_between(receiver.normal, -dir);
    cos_i * cos_j > 0.0
}

/// Paint every mesh patch by whether it and a light patch face each other.
///
/// Obstruction is ignored. Each light patch repaints every receiver, so
/// with several light patches the last one decides.
pub fn debug_facing(scene: &mut Scene) {
    for light in &scene.lights {
        for emitter in &light.patches {
            for mesh in &mut scene.meshes {
                for receiver in &mut mesh.patches {
                    receiver.radiance = mark(faces_light(emitter, receiver));
                }
            }
        }
    }
    log::info!("Facing check done");
}
