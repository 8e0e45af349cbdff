//! Rays: an origin point and a direction vector.

use crate::{Matrix4, Transform, Tuple};

/// A ray in world or object space.
///
/// The direction is not required to be normalized; transforming a ray keeps
/// the parameter t consistent across spaces precisely because the direction
/// scales along with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Tuple,
    pub direction: Tuple,
}

impl Ray {
    pub fn new(origin: Tuple, direction: Tuple) -> Self {
        Self { origin, direction }
    }

    /// The point along the ray at parameter t.
    #[inline]
    pub fn position(&self, t: f64) -> Tuple {
        self.origin + self.direction * t
    }

    /// Apply a matrix to both origin and direction.
    pub fn transform(&self, m: &Matrix4) -> Ray {
        Ray {
            origin: *m * self.origin,
            direction: *m * self.direction,
        }
    }

    /// Convenience for transforming by a [`Transform`].
    pub fn transformed(&self, t: &Transform) -> Ray {
        self.transform(&t.matrix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{point, vector};

    #[test]
    fn test_position_along_ray() {
        let r = Ray::new(point(2.0, 3.0, 4.0), vector(1.0, 0.0, 0.0));
        assert!(r.position(0.0).approx_eq(point(2.0, 3.0, 4.0)));
        assert!(r.position(1.0).approx_eq(point(3.0, 3.0, 4.0)));
        assert!(r.position(-1.0).approx_eq(point(1.0, 3.0, 4.0)));
        assert!(r.position(2.5).approx_eq(point(4.5, 3.0, 4.0)));
    }

    #[test]
    fn test_translate_ray() {
        let r = Ray::new(point(1.0, 2.0, 3.0), vector(0.0, 1.0, 0.0));
        let t = Transform::new().translate(3.0, 4.0, 5.0);
        let r2 = r.transformed(&t);
        assert!(r2.origin.approx_eq(point(4.0, 6.0, 8.0)));
        assert!(r2.direction.approx_eq(vector(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_scale_ray() {
        let r = Ray::new(point(1.0, 2.0, 3.0), vector(0.0, 1.0, 0.0));
        let t = Transform::new().scale(2.0, 3.0, 4.0);
        let r2 = r.transformed(&t);
        assert!(r2.origin.approx_eq(point(2.0, 6.0, 12.0)));
        assert!(r2.direction.approx_eq(vector(0.0, 3.0, 0.0)));
    }
}
