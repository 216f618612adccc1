//! RAD Core - Scene data model and patch subdivision for radiosity.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `Mesh`, `Patch`, `Sphere`, `Material`
//! - **Subdivision**: midpoint splitting of coarse faces into patches
//! - **Builders**: quads and cuboids for assembling scenes in code
//!
//! # Example
//!
//! ```ignore
//! use rad_core::{builders, Material, Scene, SubdivisionConfig};
//!
//! let mut scene = Scene::new("box");
//! scene.add_mesh(builders::cuboid("crate", min, max)?.with_material(Material::default()));
//! scene.subdivide(&SubdivisionConfig::default());
//! println!("{} patches", scene.patch_count());
//! ```

pub mod builders;
pub mod material;
pub mod mesh;
pub mod scene;
pub mod subdivide;

// Re-export commonly used types
pub use material::Material;
pub use mesh::{Edge, Mesh, MeshError, MeshResult, Patch};
pub use scene::{Scene, Sphere, Transform};
pub use subdivide::{SubdivisionConfig, SubdivisionStrategy};
