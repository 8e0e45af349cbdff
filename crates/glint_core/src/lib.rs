//! Core scene types for the glint ray tracer.
//!
//! This crate provides:
//!
//! - **Colors and canvases**: `Color`, the `Canvas` raster interface, `Frame`
//! - **The scene graph**: `SceneGraph`, `Entity`, `EntityId` and the
//!   component slots (`Mesh`, `Material`, `Kinematic`, `PointLight`)
//! - **Geometry**: the closed set of mesh primitives
//! - **Shading**: the procedural `Shader` combinators and `Material`

pub mod canvas;
pub mod color;
pub mod entity;
pub mod material;
pub mod mesh;
pub mod shader;

pub use canvas::{Canvas, Frame};
pub use color::Color;
pub use entity::{Entity, EntityId, Kinematic, PointLight, SceneGraph};
pub use material::Material;
pub use mesh::Mesh;
pub use shader::{NoiseFn, Shader};
