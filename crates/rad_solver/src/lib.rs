//! RAD Solver - Radiosity over subdivided scenes.
//!
//! The pipeline, in order:
//!
//! - [`Visibility`]: obstruction tests against coarse scene geometry
//! - [`FormFactors`]: dense patch-to-patch coupling matrix
//! - [`RadiositySolver`]: direct lighting, propagation passes, final radiance
//! - [`build_vertices`] / [`build_interpolated_vertices`]: display vertex stream
//! - [`DebugView`]: orientation checks painted into radiance
//!
//! # Example
//!
//! ```ignore
//! use rad_solver::{build_vertices, run_radiosity, RadiosityConfig};
//!
//! scene.subdivide(&SubdivisionConfig::default());
//! let timing = run_radiosity(&mut scene, RadiosityConfig::default())?;
//! let vertices = build_vertices(&scene);
//! println!("{timing}");
//! ```

pub mod diagnostics;
pub mod error;
pub mod finalize;
pub mod form_factor;
pub mod intersect;
pub mod radiosity;
pub mod visibility;

pub use diagnostics::{debug_facing, debug_normals, DebugView};
pub use error::{SolverError, SolverResult};
pub use finalize::{build_interpolated_vertices, build_vertices, Vertex, QUAD_ORDER};
pub use form_factor::FormFactors;
pub use intersect::{find_nearest, reflected_ray, refracted_ray, HitRecord, Intersect, RayHit};
pub use radiosity::{run_radiosity, RadiosityConfig, RadiositySolver, SolverState, TimingReport};
pub use visibility::Visibility;
