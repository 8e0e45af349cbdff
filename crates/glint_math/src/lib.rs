//! Math primitives for the glint ray tracer.
//!
//! This crate provides:
//!
//! - **Homogeneous tuples**: `Tuple`, with `point()` (w=1) and `vector()` (w=0)
//! - **Matrices**: `Matrix4`/`Matrix3`/`Matrix2` with cofactor inversion
//! - **Affine transforms**: the composable `Transform` builder
//! - **Rays**: origin + direction with parametric evaluation

mod matrix;
mod ray;
mod transform;
mod tuple;

pub use matrix::{AlgebraError, Matrix2, Matrix3, Matrix4};
pub use ray::Ray;
pub use transform::Transform;
pub use tuple::{point, vector, Tuple};

/// Shared tolerance for degenerate-geometry tests, approximate comparisons,
/// and the surface bias applied to secondary rays.
pub const EPSILON: f64 = 1e-4;

/// Compare two scalars within [`EPSILON`].
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON
}
