//! The world: shadow testing and the recursive cast/shade state machine.

use glint_core::{Color, Entity, EntityId, Material, Mesh, PointLight, SceneGraph};
use glint_math::{AlgebraError, Ray, Tuple};

use crate::intersection::{self, Intersection, Intersections};
use crate::lighting::{phong, phong_shadow};

/// Recursion bound for [`World::cast`]. This is the only guard against two
/// mutually reflective surfaces bouncing a ray forever.
pub const MAX_DEPTH: usize = 5;

/// A scene ready to render: geometry roots, lights, and a background color.
///
/// The world is assembled up front and treated as immutable for the whole
/// duration of a render; the only sanctioned mutation between renders is
/// [`World::tick`].
#[derive(Debug, Clone, Default)]
pub struct World {
    graph: SceneGraph,
    roots: Vec<EntityId>,
    lights: Vec<EntityId>,
    pub background: Color,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// Create a fresh, unregistered entity.
    pub fn spawn(&mut self) -> EntityId {
        self.graph.spawn()
    }

    pub fn entity(&self, id: EntityId) -> &Entity {
        self.graph.entity(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> &mut Entity {
        self.graph.entity_mut(id)
    }

    /// Register a top-level entity, classifying it as a light or geometry.
    pub fn add(&mut self, id: EntityId) {
        if self.graph.entity(id).light().is_some() {
            self.lights.push(id);
        } else {
            self.roots.push(id);
        }
    }

    pub fn roots(&self) -> &[EntityId] {
        &self.roots
    }

    pub fn lights(&self) -> &[EntityId] {
        &self.lights
    }

    /// Spawn a unit sphere with a default material.
    pub fn spawn_sphere(&mut self) -> EntityId {
        let id = self.graph.spawn();
        self.graph
            .entity_mut(id)
            .set_mesh(Mesh::sphere())
            .set_material(Material::new());
        id
    }

    /// Spawn a y=0 plane with a default material.
    pub fn spawn_plane(&mut self) -> EntityId {
        let id = self.graph.spawn();
        self.graph
            .entity_mut(id)
            .set_mesh(Mesh::plane())
            .set_material(Material::new());
        id
    }

    /// Spawn a unit sphere of glass.
    pub fn spawn_glass_sphere(&mut self) -> EntityId {
        let id = self.graph.spawn();
        self.graph
            .entity_mut(id)
            .set_mesh(Mesh::sphere())
            .set_material(Material::glass());
        id
    }

    /// Spawn a group and attach the given children.
    pub fn spawn_group(&mut self, children: &[EntityId]) -> EntityId {
        let id = self.graph.spawn();
        self.graph.entity_mut(id).set_mesh(Mesh::Group);
        for child in children {
            self.graph.add_child(id, *child);
        }
        id
    }

    /// Spawn a point light of the given intensity.
    pub fn spawn_light(&mut self, intensity: Color) -> EntityId {
        let id = self.graph.spawn();
        self.graph.entity_mut(id).set_light(PointLight::new(intensity));
        id
    }

    /// Every crossing of `ray` with the registered geometry, merged across
    /// roots and sorted by t.
    pub fn intersections(&self, ray: &Ray) -> Intersections {
        let mut roots = Vec::new();
        for id in &self.roots {
            intersection::collect(&self.graph, *id, ray, &mut roots);
        }
        intersection::finalize(&self.graph, ray, roots)
    }

    /// Is the path from `point` to `light_position` blocked by geometry?
    pub fn obstructed(&self, point: Tuple, light_position: Tuple) -> bool {
        let path = light_position - point;
        let distance = path.magnitude();
        let shadow_ray = Ray::new(point, path.normalize());
        match self.intersections(&shadow_ray).hit() {
            Some(hit) => hit.t < distance,
            None => false,
        }
    }

    /// Cast with the default recursion bound.
    pub fn cast(&self, ray: &Ray) -> Color {
        self.limited_cast(ray, MAX_DEPTH)
    }

    /// The recursive shading state machine.
    pub fn limited_cast(&self, ray: &Ray, depth: usize) -> Color {
        if depth == 0 {
            return Color::BLACK;
        }

        let xs = self.intersections(ray);
        let Some(hit) = xs.hit() else {
            return self.background;
        };

        let surface = self.surface_contribution(hit);
        let reflected = self.reflected_contribution(hit, depth);
        let refracted = self.refracted_contribution(hit, depth);

        if let Some(material) = self.entity(hit.entity).material() {
            if material.reflective > 0.0 && material.transparency > 0.0 {
                let reflectance = hit.schlick();
                return surface + reflected * reflectance + refracted * (1.0 - reflectance);
            }
        }
        surface + reflected + refracted
    }

    /// Direct illumination summed over every light, shadow-tested per light.
    fn surface_contribution(&self, hit: &Intersection) -> Color {
        let Some(material) = self.entity(hit.entity).material() else {
            // No material, no shading contribution.
            return Color::BLACK;
        };

        let surface_color = material.color_on(&self.graph, hit.entity, hit.over_point);

        self.lights.iter().fold(Color::BLACK, |acc, light_id| {
            let light_entity = self.entity(*light_id);
            let Some(light) = light_entity.light() else {
                return acc;
            };
            let light_position = light_entity.position();

            let contribution = if self.obstructed(hit.over_point, light_position) {
                phong_shadow(material, surface_color, light)
            } else {
                phong(
                    material,
                    surface_color,
                    light,
                    light_position,
                    hit.over_point,
                    hit.eye,
                    hit.normal,
                )
            };
            acc + contribution
        })
    }

    fn reflected_contribution(&self, hit: &Intersection, depth: usize) -> Color {
        let Some(material) = self.entity(hit.entity).material() else {
            return Color::BLACK;
        };
        if material.reflective == 0.0 {
            return Color::BLACK;
        }

        let reflect_ray = Ray::new(hit.over_point, hit.reflectv);
        self.limited_cast(&reflect_ray, depth - 1) * material.reflective
    }

    fn refracted_contribution(&self, hit: &Intersection, depth: usize) -> Color {
        let Some(material) = self.entity(hit.entity).material() else {
            return Color::BLACK;
        };
        if material.transparency == 0.0 {
            return Color::BLACK;
        }

        // Snell's law, written against sin^2 so total internal reflection
        // falls out of the same expression.
        let ratio = hit.n1 / hit.n2;
        let cos_i = hit.eye.dot(hit.normal);
        let sin2_t = ratio * ratio * (1.0 - cos_i * cos_i);
        if sin2_t > 1.0 {
            return Color::BLACK;
        }

        let cos_t = (1.0 - sin2_t).sqrt();
        let direction = hit.normal * (ratio * cos_i - cos_t) - hit.eye * ratio;
        let refract_ray = Ray::new(hit.under_point, direction);

        self.limited_cast(&refract_ray, depth - 1) * material.transparency
    }

    /// Advance every kinematic integrator by one frame. Must never run
    /// concurrently with a render.
    pub fn tick(&mut self) -> Result<(), AlgebraError> {
        let roots = self.roots.clone();
        for id in roots {
            self.graph.tick(id)?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::default_world;
    use super::*;
    use glint_core::{Kinematic, Shader};
    use glint_math::{point, vector};

    #[test]
    fn test_empty_world_has_nothing() {
        let w = World::new();
        assert!(w.roots().is_empty());
        assert!(w.lights().is_empty());
        assert_eq!(w.background, Color::BLACK);
    }

    #[test]
    fn test_add_classifies_lights_and_geometry() {
        let mut w = World::new();
        let light = w.spawn_light(Color::WHITE);
        w.add(light);
        let sphere = w.spawn_sphere();
        w.add(sphere);
        assert_eq!(w.lights(), &[light]);
        assert_eq!(w.roots(), &[sphere]);
    }

    #[test]
    fn test_intersections_merge_across_roots() {
        let w = default_world();
        let r = Ray::new(point(0.0, 0.0, -5.0), vector(0.0, 0.0, 1.0));
        let xs = w.intersections(&r);
        assert_eq!(xs.len(), 4);
        assert_eq!(xs.all[0].t, 4.0);
        assert_eq!(xs.all[1].t, 4.5);
        assert_eq!(xs.all[2].t, 5.5);
        assert_eq!(xs.all[3].t, 6.0);
    }

    #[test]
    fn test_cast_into_default_world() {
        let w = default_world();
        let r = Ray::new(point(0.0, 0.0, -5.0), vector(0.0, 0.0, 1.0));
        assert!(w.cast(&r).approx_eq(Color::new(0.38066, 0.47583, 0.2855)));
    }

    #[test]
    fn test_cast_miss_returns_background() {
        let mut w = default_world();
        w.background = Color::new(0.1, 0.2, 0.3);
        let r = Ray::new(point(0.0, 0.0, -5.0), vector(0.0, 1.0, 0.0));
        assert!(w.cast(&r).approx_eq(Color::new(0.1, 0.2, 0.3)));
    }

    #[test]
    fn test_cast_from_inside_hits_inner_sphere() {
        let mut w = default_world();
        let light = w.lights()[0];
        w.entity_mut(light)
            .set_transform(glint_math::Transform::new().translate(0.0, 0.25, 0.0))
            .unwrap();
        let r = Ray::new(point(0.0, 0.0, 0.0), vector(0.0, 0.0, 1.0));
        assert!(w.cast(&r).approx_eq(Color::new(0.90498, 0.90498, 0.90498)));
    }

    #[test]
    fn test_cast_behind_ray_uses_inner_color() {
        let mut w = default_world();
        let outer = w.roots()[0];
        let inner = w.roots()[1];
        let mut m = w.entity(outer).material().unwrap().clone();
        m.ambient = 1.0;
        w.entity_mut(outer).set_material(m);
        let mut m = w.entity(inner).material().unwrap().clone();
        m.ambient = 1.0;
        let inner_color = m.color;
        w.entity_mut(inner).set_material(m);

        let r = Ray::new(point(0.0, 0.0, 0.75), vector(0.0, 0.0, -1.0));
        assert!(w.cast(&r).approx_eq(inner_color));
    }

    #[test]
    fn test_obstructed_cases() {
        let w = default_world();
        let light_position = point(-10.0, 10.0, -10.0);
        // nothing between the point and the light
        assert!(!w.obstructed(point(0.0, 10.0, 0.0), light_position));
        // sphere between the point and the light
        assert!(w.obstructed(point(10.0, -10.0, 10.0), light_position));
        // light between the point and the sphere
        assert!(!w.obstructed(point(-20.0, 20.0, -20.0), light_position));
        // point between the light and the sphere
        assert!(!w.obstructed(point(-2.0, 2.0, -2.0), light_position));
    }

    #[test]
    fn test_shadowed_surface_gets_ambient_only() {
        let mut w = World::new();
        let light = w.spawn_light(Color::WHITE);
        w.entity_mut(light).translate(0.0, 0.0, -10.0).unwrap();
        w.add(light);
        let s1 = w.spawn_sphere();
        w.add(s1);
        let s2 = w.spawn_sphere();
        w.entity_mut(s2).translate(0.0, 0.0, 10.0).unwrap();
        w.add(s2);

        let r = Ray::new(point(0.0, 0.0, 5.0), vector(0.0, 0.0, 1.0));
        assert!(w.cast(&r).approx_eq(Color::new(0.1, 0.1, 0.1)));
    }

    #[test]
    fn test_entity_without_material_contributes_nothing() {
        let mut w = World::new();
        let light = w.spawn_light(Color::WHITE);
        w.entity_mut(light).translate(-10.0, 10.0, -10.0).unwrap();
        w.add(light);
        let bare = w.spawn();
        w.entity_mut(bare).set_mesh(Mesh::sphere());
        w.add(bare);

        let r = Ray::new(point(0.0, 0.0, -5.0), vector(0.0, 0.0, 1.0));
        assert!(w.cast(&r).approx_eq(Color::BLACK));
    }

    #[test]
    fn test_reflected_color_off_reflective_plane() {
        let mut w = default_world();
        let plane = w.spawn_plane();
        w.entity_mut(plane)
            .set_material(Material::new().with_reflective(0.5));
        w.entity_mut(plane).translate(0.0, -1.0, 0.0).unwrap();
        w.add(plane);

        let k = 2.0_f64.sqrt() / 2.0;
        let r = Ray::new(point(0.0, 0.0, -3.0), vector(0.0, -k, k));
        let c = w.cast(&r);
        assert!(c.approx_eq(Color::new(0.87677, 0.92436, 0.82918)));
    }

    #[test]
    fn test_mutually_reflective_surfaces_terminate() {
        let mut w = World::new();
        let light = w.spawn_light(Color::WHITE);
        w.add(light);

        let lower = w.spawn_plane();
        w.entity_mut(lower)
            .set_material(Material::new().with_reflective(1.0));
        w.entity_mut(lower).translate(0.0, -1.0, 0.0).unwrap();
        w.add(lower);

        let upper = w.spawn_plane();
        w.entity_mut(upper)
            .set_material(Material::new().with_reflective(1.0));
        w.entity_mut(upper).translate(0.0, 1.0, 0.0).unwrap();
        w.add(upper);

        // must return rather than recurse forever
        let r = Ray::new(point(0.0, 0.0, 0.0), vector(0.0, 1.0, 0.0));
        let _ = w.cast(&r);
    }

    #[test]
    fn test_reflection_stops_at_depth_zero() {
        let mut w = default_world();
        let plane = w.spawn_plane();
        w.entity_mut(plane)
            .set_material(Material::new().with_reflective(0.5));
        w.entity_mut(plane).translate(0.0, -1.0, 0.0).unwrap();
        w.add(plane);

        let k = 2.0_f64.sqrt() / 2.0;
        let r = Ray::new(point(0.0, 0.0, -3.0), vector(0.0, -k, k));
        assert!(w.limited_cast(&r, 0).approx_eq(Color::BLACK));
    }

    #[test]
    fn test_refraction_through_opaque_material_is_black() {
        let w = default_world();
        let r = Ray::new(point(0.0, 0.0, -5.0), vector(0.0, 0.0, 1.0));
        let xs = w.intersections(&r);
        let hit = xs.hit().unwrap();
        assert!(w.refracted_contribution(hit, MAX_DEPTH).approx_eq(Color::BLACK));
    }

    #[test]
    fn test_refraction_under_total_internal_reflection_is_black() {
        let mut w = default_world();
        let outer = w.roots()[0];
        w.entity_mut(outer).set_material(
            Material::new()
                .with_transparency(1.0)
                .with_refractive_index(1.5),
        );

        let k = 2.0_f64.sqrt() / 2.0;
        let r = Ray::new(point(0.0, 0.0, k), vector(0.0, 1.0, 0.0));
        let xs = w.intersections(&r);
        let hit = xs.hit().unwrap();
        assert!(w.refracted_contribution(hit, MAX_DEPTH).approx_eq(Color::BLACK));
    }

    #[test]
    fn test_refracted_color_through_glass() {
        let mut w = default_world();
        let outer = w.roots()[0];
        let mut m = w.entity(outer).material().unwrap().clone();
        m.ambient = 1.0;
        m.shader = Some(Shader::position());
        w.entity_mut(outer).set_material(m);

        let inner = w.roots()[1];
        w.entity_mut(inner).set_material(
            Material::new()
                .with_transparency(1.0)
                .with_refractive_index(1.5),
        );

        let r = Ray::new(point(0.0, 0.0, 0.1), vector(0.0, 1.0, 0.0));
        let xs = w.intersections(&r);
        // the hit is the exit crossing of the inner glass sphere
        let hit = xs.hit().unwrap();
        let c = w.refracted_contribution(hit, MAX_DEPTH);
        assert!((c.r - 0.0).abs() < 1e-3);
        assert!((c.g - 0.99888).abs() < 1e-3);
        assert!((c.b - 0.04725).abs() < 1e-3);
    }

    #[test]
    fn test_shading_transparent_floor() {
        let mut w = default_world();
        let floor = w.spawn_plane();
        w.entity_mut(floor).set_material(
            Material::new()
                .with_transparency(0.5)
                .with_refractive_index(1.5),
        );
        w.entity_mut(floor).translate(0.0, -1.0, 0.0).unwrap();
        w.add(floor);

        let ball = w.spawn_sphere();
        w.entity_mut(ball).set_material(
            Material::new()
                .with_color(Color::new(1.0, 0.0, 0.0))
                .with_ambient(0.5),
        );
        w.entity_mut(ball).translate(0.0, -3.5, -0.5).unwrap();
        w.add(ball);

        let k = 2.0_f64.sqrt() / 2.0;
        let r = Ray::new(point(0.0, 0.0, -3.0), vector(0.0, -k, k));
        let c = w.cast(&r);
        assert!(c.approx_eq(Color::new(0.93642, 0.68642, 0.68642)));
    }

    #[test]
    fn test_schlick_blend_on_reflective_transparent_floor() {
        let mut w = default_world();
        let floor = w.spawn_plane();
        w.entity_mut(floor).set_material(
            Material::new()
                .with_reflective(0.5)
                .with_transparency(0.5)
                .with_refractive_index(1.5),
        );
        w.entity_mut(floor).translate(0.0, -1.0, 0.0).unwrap();
        w.add(floor);

        let ball = w.spawn_sphere();
        w.entity_mut(ball).set_material(
            Material::new()
                .with_color(Color::new(1.0, 0.0, 0.0))
                .with_ambient(0.5),
        );
        w.entity_mut(ball).translate(0.0, -3.5, -0.5).unwrap();
        w.add(ball);

        let k = 2.0_f64.sqrt() / 2.0;
        let r = Ray::new(point(0.0, 0.0, -3.0), vector(0.0, -k, k));
        let c = w.cast(&r);
        assert!(c.approx_eq(Color::new(0.93391, 0.69643, 0.69243)));
    }

    #[test]
    fn test_tick_moves_kinematic_entities_between_renders() {
        let mut w = World::new();
        let ball = w.spawn_sphere();
        w.entity_mut(ball)
            .set_kinematic(Kinematic::new().with_velocity(vector(0.0, 0.0, 1.0)));
        w.add(ball);

        w.tick().unwrap();
        assert!(w.entity(ball).position().approx_eq(point(0.0, 0.0, 1.0)));
    }
}
