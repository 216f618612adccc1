// Re-export glam for convenience
pub use glam::*;

// RAD math types
mod aabb;
mod interval;
pub mod kernel;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use kernel::Winding;
pub use ray::Ray;
