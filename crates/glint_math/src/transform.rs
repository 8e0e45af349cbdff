//! Composable affine transforms.
//!
//! `Transform` is a pure value: every chained call returns a new transform,
//! so a shared transform can never be mutated behind another holder's back.
//! Each chained operation composes its matrix as the new outermost-left
//! factor, so the most recently appended operation is applied to a tuple
//! last:
//!
//! ```
//! use glint_math::{point, Transform};
//!
//! let t = Transform::new().scale(2.0, 2.0, 2.0).translate(1.0, 0.0, 0.0);
//! // scale first, then translate
//! assert!(t.apply(point(1.0, 1.0, 1.0)).approx_eq(point(3.0, 2.0, 2.0)));
//! ```

use crate::{AlgebraError, Matrix4, Tuple};

/// An affine transform over homogeneous tuples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Matrix4,
}

impl Transform {
    /// The identity transform.
    pub fn new() -> Self {
        Self {
            matrix: Matrix4::IDENTITY,
        }
    }

    pub fn from_matrix(matrix: Matrix4) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> Matrix4 {
        self.matrix
    }

    /// Compose an operation matrix as the new outermost factor.
    pub fn compose(self, op: Matrix4) -> Self {
        Self {
            matrix: op * self.matrix,
        }
    }

    pub fn translate(self, x: f64, y: f64, z: f64) -> Self {
        self.compose(Matrix4::new([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ]))
    }

    pub fn scale(self, x: f64, y: f64, z: f64) -> Self {
        self.compose(Matrix4::new([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]))
    }

    pub fn reflect_x(self) -> Self {
        self.scale(-1.0, 1.0, 1.0)
    }

    pub fn reflect_y(self) -> Self {
        self.scale(1.0, -1.0, 1.0)
    }

    pub fn reflect_z(self) -> Self {
        self.scale(1.0, 1.0, -1.0)
    }

    pub fn rotate_x(self, r: f64) -> Self {
        let (sin, cos) = r.sin_cos();
        self.compose(Matrix4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, cos, -sin, 0.0],
            [0.0, sin, cos, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]))
    }

    pub fn rotate_y(self, r: f64) -> Self {
        let (sin, cos) = r.sin_cos();
        self.compose(Matrix4::new([
            [cos, 0.0, sin, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-sin, 0.0, cos, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]))
    }

    pub fn rotate_z(self, r: f64) -> Self {
        let (sin, cos) = r.sin_cos();
        self.compose(Matrix4::new([
            [cos, -sin, 0.0, 0.0],
            [sin, cos, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]))
    }

    pub fn shear(self, xy: f64, xz: f64, yx: f64, yz: f64, zx: f64, zy: f64) -> Self {
        self.compose(Matrix4::new([
            [1.0, xy, xz, 0.0],
            [yx, 1.0, yz, 0.0],
            [zx, zy, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]))
    }

    /// Overwrite the translation column, leaving orientation and scale as-is.
    pub fn move_to(mut self, p: Tuple) -> Self {
        self.matrix.set(0, 3, p.x);
        self.matrix.set(1, 3, p.y);
        self.matrix.set(2, 3, p.z);
        self
    }

    /// The translation column as a point.
    pub fn position(&self) -> Tuple {
        crate::point(
            self.matrix.get(0, 3),
            self.matrix.get(1, 3),
            self.matrix.get(2, 3),
        )
    }

    pub fn apply(&self, t: Tuple) -> Tuple {
        self.matrix * t
    }

    pub fn transpose(&self) -> Self {
        Self {
            matrix: self.matrix.transpose(),
        }
    }

    pub fn inverse(&self) -> Result<Transform, AlgebraError> {
        Ok(Self {
            matrix: self.matrix.inverse()?,
        })
    }

    /// The camera view transform.
    ///
    /// Builds the standard orientation basis (forward = normalize(to - from),
    /// left = forward x normalize(up), true up = left x forward) around a
    /// translation that moves the eye to the origin.
    pub fn view(from: Tuple, to: Tuple, up: Tuple) -> Self {
        let forward = (to - from).normalize();
        let left = forward.cross(up.normalize());
        let true_up = left.cross(forward);

        let orientation = Matrix4::new([
            [left.x, left.y, left.z, 0.0],
            [true_up.x, true_up.y, true_up.z, 0.0],
            [-forward.x, -forward.y, -forward.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);

        Transform::new()
            .translate(-from.x, -from.y, -from.z)
            .compose(orientation)
    }

    pub fn approx_eq(&self, other: &Transform) -> bool {
        self.matrix.approx_eq(&other.matrix)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
