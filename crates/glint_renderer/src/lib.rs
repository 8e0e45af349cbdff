//! Recursive (Whitted-style) CPU renderer for glint.
//!
//! A ray is projected per pixel, intersected against the scene graph, and
//! shaded with Phong direct illumination plus recursive mirror reflection
//! and Fresnel-blended refraction, up to a fixed depth. Pixels render on a
//! rayon worker pool and merge into the canvas by explicit coordinate.

mod camera;
mod intersection;
mod lighting;
mod world;

pub use camera::Camera;
pub use intersection::{intersect, Intersection, Intersections};
pub use lighting::{phong, phong_shadow};
pub use world::{World, MAX_DEPTH};

// Re-export the scene-facing types so drivers can depend on one crate.
pub use glint_core::{
    Canvas, Color, Entity, EntityId, Frame, Kinematic, Material, Mesh, PointLight, SceneGraph,
    Shader,
};
pub use glint_math::{point, vector, Ray, Transform, Tuple};
