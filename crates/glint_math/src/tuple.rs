//! Homogeneous-coordinate tuples.
//!
//! A tuple with w=1 is a point, with w=0 a vector. Keeping both in one type
//! lets a single 4x4 affine transform act on either: translation columns
//! multiply against w, so vectors pass through translations unchanged.

use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::approx_eq;

/// A homogeneous (x, y, z, w) tuple.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tuple {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

/// Create a point (w = 1).
#[inline]
pub fn point(x: f64, y: f64, z: f64) -> Tuple {
    Tuple { x, y, z, w: 1.0 }
}

/// Create a vector (w = 0).
#[inline]
pub fn vector(x: f64, y: f64, z: f64) -> Tuple {
    Tuple { x, y, z, w: 0.0 }
}

impl Tuple {
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    pub fn is_point(&self) -> bool {
        self.w == 1.0
    }

    pub fn is_vector(&self) -> bool {
        self.w == 0.0
    }

    /// Dot product. Includes the w component, so mixing points in by
    /// accident shows up as an off-by-one rather than passing silently.
    pub fn dot(&self, other: Tuple) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Cross product of two vectors. Undefined on points.
    pub fn cross(&self, other: Tuple) -> Tuple {
        debug_assert!(self.is_vector() && other.is_vector());
        vector(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    /// Scale to unit length.
    pub fn normalize(&self) -> Tuple {
        *self / self.magnitude()
    }

    /// Reflect this vector about the given normal.
    pub fn reflect(&self, normal: Tuple) -> Tuple {
        *self - normal * (2.0 * self.dot(normal))
    }

    /// Component-wise comparison within [`crate::EPSILON`].
    pub fn approx_eq(&self, other: Tuple) -> bool {
        approx_eq(self.x, other.x)
            && approx_eq(self.y, other.y)
            && approx_eq(self.z, other.z)
            && approx_eq(self.w, other.w)
    }
}

impl Add for Tuple {
    type Output = Tuple;

    fn add(self, other: Tuple) -> Tuple {
        Tuple::new(
            self.x + other.x,
            self.y + other.y,
            self.z + other.z,
            self.w + other.w,
        )
    }
}

impl Sub for Tuple {
    type Output = Tuple;

    fn sub(self, other: Tuple) -> Tuple {
        Tuple::new(
            self.x - other.x,
            self.y - other.y,
            self.z - other.z,
            self.w - other.w,
        )
    }
}

impl Neg for Tuple {
    type Output = Tuple;

    fn neg(self) -> Tuple {
        Tuple::new(-self.x, -self.y, -self.z, -self.w)
    }
}

impl Mul<f64> for Tuple {
    type Output = Tuple;

    fn mul(self, s: f64) -> Tuple {
        Tuple::new(self.x * s, self.y * s, self.z * s, self.w * s)
    }
}

impl Div<f64> for Tuple {
    type Output = Tuple;

    fn div(self, s: f64) -> Tuple {
        Tuple::new(self.x / s, self.y / s, self.z / s, self.w / s)
    }
}
