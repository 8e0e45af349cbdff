//! Surface materials: Phong coefficients plus an optional shader.

use glint_math::Tuple;

use crate::{Color, EntityId, SceneGraph, Shader};

/// Shading coefficients for a surface.
///
/// `color` is the flat fallback; when a `shader` is present it wins, and is
/// evaluated in the owning entity's object space (see [`Material::color_on`]).
#[derive(Debug, Clone)]
pub struct Material {
    pub color: Color,
    pub ambient: f64,
    pub diffuse: f64,
    pub specular: f64,
    pub shininess: f64,
    pub reflective: f64,
    pub transparency: f64,
    pub refractive_index: f64,
    pub shader: Option<Shader>,
}

impl Material {
    pub fn new() -> Self {
        Self {
            color: Color::WHITE,
            ambient: 0.1,
            diffuse: 0.9,
            specular: 0.9,
            shininess: 200.0,
            reflective: 0.0,
            transparency: 0.0,
            refractive_index: 1.0,
            shader: None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_ambient(mut self, v: f64) -> Self {
        self.ambient = v;
        self
    }

    pub fn with_diffuse(mut self, v: f64) -> Self {
        self.diffuse = v;
        self
    }

    pub fn with_specular(mut self, v: f64) -> Self {
        self.specular = v;
        self
    }

    pub fn with_shininess(mut self, v: f64) -> Self {
        self.shininess = v;
        self
    }

    pub fn with_reflective(mut self, v: f64) -> Self {
        self.reflective = v;
        self
    }

    pub fn with_transparency(mut self, v: f64) -> Self {
        self.transparency = v;
        self
    }

    pub fn with_refractive_index(mut self, v: f64) -> Self {
        self.refractive_index = v;
        self
    }

    pub fn with_shader(mut self, shader: Shader) -> Self {
        self.shader = Some(shader);
        self
    }

    /// Glass preset: fully transparent with a refractive index of 1.5.
    pub fn glass() -> Self {
        Self::new().with_transparency(1.0).with_refractive_index(1.5)
    }

    /// The surface color at an object-space point.
    pub fn color_at(&self, object_point: Tuple) -> Color {
        match &self.shader {
            Some(shader) => shader.evaluate(object_point),
            None => self.color,
        }
    }

    /// The surface color at a world-space point on `entity`, converting
    /// through the entity's ancestor chain first.
    pub fn color_on(&self, graph: &SceneGraph, entity: EntityId, world_point: Tuple) -> Color {
        self.color_at(graph.world_to_object(entity, world_point))
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}
