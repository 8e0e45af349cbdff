//! Procedural shaders: pure point -> color functions with combinators.
//!
//! The pattern set is closed, so shaders are an enum and evaluation is a
//! match, with no indirect dispatch inside the per-pixel loop. The only
//! exception is noise, whose generator is injected from outside the core
//! as a plain `f(x, y, z) -> [0, 1]` function.

use std::fmt;
use std::sync::Arc;

use glint_math::{AlgebraError, Matrix4, Transform, Tuple};

use crate::Color;

/// An externally supplied noise source.
pub type NoiseFn = Arc<dyn Fn(f64, f64, f64) -> f64 + Send + Sync>;

/// A procedural point -> color function.
#[derive(Clone)]
pub enum Shader {
    /// Constant color.
    Pigment(Color),
    /// Alternate two shaders by the parity of floor(x).
    Stripes(Box<Shader>, Box<Shader>),
    /// Alternate by the parity of floor(x) + floor(y) + floor(z).
    Cubes(Box<Shader>, Box<Shader>),
    /// Alternate by the parity of floor(sqrt(x^2 + z^2)).
    Rings(Box<Shader>, Box<Shader>),
    /// Interpolate two colors by the fractional part of x.
    Gradient(Color, Color),
    /// Pointwise linear blend of two shader outputs.
    Blend {
        a: Box<Shader>,
        b: Box<Shader>,
        bias: f64,
    },
    /// Evaluate the inner shader in pattern-local space.
    Transformed {
        inverse: Matrix4,
        shader: Box<Shader>,
    },
    /// Map three independent noise evaluations to R/G/B.
    Noise { r: NoiseFn, g: NoiseFn, b: NoiseFn },
    /// Map the point itself to a color. Handy for debugging and tests.
    Position,
}

impl Shader {
    pub fn pigment(c: Color) -> Self {
        Shader::Pigment(c)
    }

    pub fn stripes(a: Shader, b: Shader) -> Self {
        Shader::Stripes(Box::new(a), Box::new(b))
    }

    pub fn cubes(a: Shader, b: Shader) -> Self {
        Shader::Cubes(Box::new(a), Box::new(b))
    }

    pub fn rings(a: Shader, b: Shader) -> Self {
        Shader::Rings(Box::new(a), Box::new(b))
    }

    pub fn gradient(a: Color, b: Color) -> Self {
        Shader::Gradient(a, b)
    }

    /// Blend two shaders; a bias at or beyond either end collapses to the
    /// corresponding operand.
    pub fn blend(a: Shader, b: Shader, bias: f64) -> Self {
        if bias <= 0.0 {
            return a;
        }
        if bias >= 1.0 {
            return b;
        }
        Shader::Blend {
            a: Box::new(a),
            b: Box::new(b),
            bias,
        }
    }

    /// Evaluate `shader` in the local space of `transform`.
    ///
    /// The inverse is taken once, here, so a degenerate pattern transform
    /// fails at construction rather than mid-render.
    pub fn with_transform(transform: Transform, shader: Shader) -> Result<Self, AlgebraError> {
        Ok(Shader::Transformed {
            inverse: transform.inverse()?.matrix(),
            shader: Box::new(shader),
        })
    }

    pub fn noise(r: NoiseFn, g: NoiseFn, b: NoiseFn) -> Self {
        Shader::Noise { r, g, b }
    }

    pub fn position() -> Self {
        Shader::Position
    }

    /// Evaluate the shader at a pattern-space point.
    pub fn evaluate(&self, p: Tuple) -> Color {
        match self {
            Shader::Pigment(c) => *c,
            Shader::Stripes(a, b) => {
                if even(p.x.floor()) {
                    a.evaluate(p)
                } else {
                    b.evaluate(p)
                }
            }
            Shader::Cubes(a, b) => {
                if even(p.x.floor() + p.y.floor() + p.z.floor()) {
                    a.evaluate(p)
                } else {
                    b.evaluate(p)
                }
            }
            Shader::Rings(a, b) => {
                let distance = (p.x * p.x + p.z * p.z).sqrt();
                if even(distance.floor()) {
                    a.evaluate(p)
                } else {
                    b.evaluate(p)
                }
            }
            Shader::Gradient(a, b) => {
                let fraction = p.x - p.x.floor();
                *a + (*b - *a) * fraction
            }
            Shader::Blend { a, b, bias } => a.evaluate(p) * (1.0 - bias) + b.evaluate(p) * *bias,
            Shader::Transformed { inverse, shader } => shader.evaluate(*inverse * p),
            Shader::Noise { r, g, b } => Color::new(
                r.as_ref()(p.x, p.y, p.z),
                g.as_ref()(p.x, p.y, p.z),
                b.as_ref()(p.x, p.y, p.z),
            ),
            Shader::Position => Color::new(p.x, p.y, p.z),
        }
    }
}

#[inline]
fn even(v: f64) -> bool {
    (v as i64).rem_euclid(2) == 0
}

impl fmt::Debug for Shader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shader::Pigment(c) => f.debug_tuple("Pigment").field(c).finish(),
            Shader::Stripes(a, b) => f.debug_tuple("Stripes").field(a).field(b).finish(),
            Shader::Cubes(a, b) => f.debug_tuple("Cubes").field(a).field(b).finish(),
            Shader::Rings(a, b) => f.debug_tuple("Rings").field(a).field(b).finish(),
            Shader::Gradient(a, b) => f.debug_tuple("Gradient").field(a).field(b).finish(),
            Shader::Blend { a, b, bias } => f
                .debug_struct("Blend")
                .field("a", a)
                .field("b", b)
                .field("bias", bias)
                .finish(),
            Shader::Transformed { shader, .. } => {
                f.debug_tuple("Transformed").field(shader).finish()
            }
            Shader::Noise { .. } => f.write_str("Noise"),
            Shader::Position => f.write_str("Position"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_math::point;

    fn white() -> Shader {
        Shader::pigment(Color::WHITE)
    }

    fn black() -> Shader {
        Shader::pigment(Color::BLACK)
    }

    #[test]
    fn test_pigment_is_constant() {
        let s = Shader::pigment(Color::new(0.2, 0.4, 0.6));
        assert!(s.evaluate(point(0.0, 0.0, 0.0)).approx_eq(Color::new(0.2, 0.4, 0.6)));
        assert!(s.evaluate(point(10.0, -4.0, 3.0)).approx_eq(Color::new(0.2, 0.4, 0.6)));
    }

    #[test]
    fn test_stripes_alternate_in_x_only() {
        let s = Shader::stripes(white(), black());
        assert!(s.evaluate(point(0.0, 0.0, 0.0)).approx_eq(Color::WHITE));
        assert!(s.evaluate(point(0.9, 0.0, 0.0)).approx_eq(Color::WHITE));
        assert!(s.evaluate(point(1.0, 0.0, 0.0)).approx_eq(Color::BLACK));
        assert!(s.evaluate(point(-0.1, 0.0, 0.0)).approx_eq(Color::BLACK));
        assert!(s.evaluate(point(-1.1, 0.0, 0.0)).approx_eq(Color::WHITE));
        // constant in y and z
        assert!(s.evaluate(point(0.0, 2.0, 0.0)).approx_eq(Color::WHITE));
        assert!(s.evaluate(point(0.0, 0.0, 2.0)).approx_eq(Color::WHITE));
    }

    #[test]
    fn test_cubes_alternate_in_all_axes() {
        let s = Shader::cubes(white(), black());
        assert!(s.evaluate(point(0.0, 0.0, 0.0)).approx_eq(Color::WHITE));
        assert!(s.evaluate(point(1.01, 0.0, 0.0)).approx_eq(Color::BLACK));
        assert!(s.evaluate(point(0.0, 1.01, 0.0)).approx_eq(Color::BLACK));
        assert!(s.evaluate(point(0.0, 0.0, 1.01)).approx_eq(Color::BLACK));
        assert!(s.evaluate(point(1.01, 1.01, 0.0)).approx_eq(Color::WHITE));
    }

    #[test]
    fn test_rings_depend_on_x_and_z() {
        let s = Shader::rings(white(), black());
        assert!(s.evaluate(point(0.0, 0.0, 0.0)).approx_eq(Color::WHITE));
        assert!(s.evaluate(point(1.0, 0.0, 0.0)).approx_eq(Color::BLACK));
        assert!(s.evaluate(point(0.0, 0.0, 1.0)).approx_eq(Color::BLACK));
        // just past sqrt(2)/2 on both axes, still within the first ring
        assert!(s.evaluate(point(0.708, 0.0, 0.708)).approx_eq(Color::BLACK));
    }

    #[test]
    fn test_gradient_interpolates_in_x() {
        let s = Shader::gradient(Color::WHITE, Color::BLACK);
        assert!(s.evaluate(point(0.0, 0.0, 0.0)).approx_eq(Color::WHITE));
        assert!(s.evaluate(point(0.25, 0.0, 0.0)).approx_eq(Color::new(0.75, 0.75, 0.75)));
        assert!(s.evaluate(point(0.5, 0.0, 0.0)).approx_eq(Color::new(0.5, 0.5, 0.5)));
        assert!(s.evaluate(point(0.75, 0.0, 0.0)).approx_eq(Color::new(0.25, 0.25, 0.25)));
    }

    #[test]
    fn test_blend_mixes_outputs() {
        let s = Shader::blend(white(), black(), 0.25);
        assert!(s.evaluate(point(0.0, 0.0, 0.0)).approx_eq(Color::new(0.75, 0.75, 0.75)));
    }

    #[test]
    fn test_blend_collapses_at_extremes() {
        assert!(Shader::blend(white(), black(), 0.0)
            .evaluate(point(0.0, 0.0, 0.0))
            .approx_eq(Color::WHITE));
        assert!(Shader::blend(white(), black(), 1.0)
            .evaluate(point(0.0, 0.0, 0.0))
            .approx_eq(Color::BLACK));
    }

    #[test]
    fn test_transformed_shader_evaluates_in_pattern_space() {
        let t = Transform::new().scale(2.0, 2.0, 2.0);
        let s = Shader::with_transform(t, Shader::stripes(white(), black())).unwrap();
        // the stripe boundary stretches from x=1 to x=2
        assert!(s.evaluate(point(1.5, 0.0, 0.0)).approx_eq(Color::WHITE));
        assert!(s.evaluate(point(2.5, 0.0, 0.0)).approx_eq(Color::BLACK));
    }

    #[test]
    fn test_transformed_shader_rejects_singular_transform() {
        let t = Transform::new().scale(0.0, 1.0, 1.0);
        assert!(Shader::with_transform(t, white()).is_err());
    }

    #[test]
    fn test_noise_channels_are_independent() {
        let s = Shader::noise(
            Arc::new(|x, _, _| x),
            Arc::new(|_, y, _| y),
            Arc::new(|_, _, z| z),
        );
        assert!(s.evaluate(point(0.1, 0.2, 0.3)).approx_eq(Color::new(0.1, 0.2, 0.3)));
    }

    #[test]
    fn test_position_shader() {
        let s = Shader::position();
        assert!(s.evaluate(point(0.25, 0.5, 0.75)).approx_eq(Color::new(0.25, 0.5, 0.75)));
    }
}
