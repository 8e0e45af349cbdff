//! The transform-carrying scene graph.
//!
//! Entities live in an arena ([`SceneGraph`]) and address each other through
//! stable [`EntityId`] handles: parents hold child handles, children hold a
//! non-owning handle back to their parent, and no reference cycles exist.
//!
//! Each entity carries a closed set of component slots: at most one mesh,
//! material, kinematic integrator, and point light. The transform's inverse
//! and inverse-transpose are cached eagerly on every mutation, which is also
//! where a singular transform (for example a zero-scale axis) fails loudly;
//! nothing in the render path ever inverts a matrix.

use glint_math::{vector, AlgebraError, Matrix4, Transform, Tuple};

use crate::{Color, Material, Mesh};

/// A point light source. The light's position is the translation of the
/// entity that owns it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub intensity: Color,
}

impl PointLight {
    pub fn new(intensity: Color) -> Self {
        Self { intensity }
    }
}

/// A per-frame kinematic integrator: velocity accumulates acceleration, and
/// the owning entity translates by the velocity on every tick.
#[derive(Debug, Clone, Copy)]
pub struct Kinematic {
    pub velocity: Tuple,
    pub acceleration: Tuple,
}

impl Kinematic {
    pub fn new() -> Self {
        Self {
            velocity: vector(0.0, 0.0, 0.0),
            acceleration: vector(0.0, 0.0, 0.0),
        }
    }

    pub fn with_velocity(mut self, v: Tuple) -> Self {
        self.velocity = v;
        self
    }

    pub fn with_acceleration(mut self, a: Tuple) -> Self {
        self.acceleration = a;
        self
    }
}

impl Default for Kinematic {
    fn default() -> Self {
        Self::new()
    }
}

/// A stable handle into a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(u32);

/// A scene-graph node: a local transform plus component slots and children.
#[derive(Debug, Clone)]
pub struct Entity {
    name: String,
    transform: Transform,
    inverse: Matrix4,
    normal_matrix: Matrix4,
    mesh: Option<Mesh>,
    material: Option<Material>,
    kinematic: Option<Kinematic>,
    light: Option<PointLight>,
    children: Vec<EntityId>,
    parent: Option<EntityId>,
}

impl Entity {
    fn new() -> Self {
        Self {
            name: String::from("entity"),
            transform: Transform::new(),
            inverse: Matrix4::IDENTITY,
            normal_matrix: Matrix4::IDENTITY,
            mesh: None,
            material: None,
            kinematic: None,
            light: None,
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// The cached inverse of the local transform.
    pub fn inverse(&self) -> Matrix4 {
        self.inverse
    }

    /// The cached inverse-transpose, used to carry normals out of object
    /// space.
    pub fn normal_matrix(&self) -> Matrix4 {
        self.normal_matrix
    }

    /// Replace the local transform, refreshing the cached inverses.
    ///
    /// This is the single point where a malformed transform is rejected.
    pub fn set_transform(&mut self, t: Transform) -> Result<&mut Self, AlgebraError> {
        let inverse = t.inverse()?;
        self.inverse = inverse.matrix();
        self.normal_matrix = inverse.transpose().matrix();
        self.transform = t;
        Ok(self)
    }

    pub fn translate(&mut self, x: f64, y: f64, z: f64) -> Result<&mut Self, AlgebraError> {
        let t = self.transform.translate(x, y, z);
        self.set_transform(t)
    }

    pub fn scale(&mut self, x: f64, y: f64, z: f64) -> Result<&mut Self, AlgebraError> {
        let t = self.transform.scale(x, y, z);
        self.set_transform(t)
    }

    pub fn rotate_x(&mut self, r: f64) -> Result<&mut Self, AlgebraError> {
        let t = self.transform.rotate_x(r);
        self.set_transform(t)
    }

    pub fn rotate_y(&mut self, r: f64) -> Result<&mut Self, AlgebraError> {
        let t = self.transform.rotate_y(r);
        self.set_transform(t)
    }

    pub fn rotate_z(&mut self, r: f64) -> Result<&mut Self, AlgebraError> {
        let t = self.transform.rotate_z(r);
        self.set_transform(t)
    }

    pub fn shear(
        &mut self,
        xy: f64,
        xz: f64,
        yx: f64,
        yz: f64,
        zx: f64,
        zy: f64,
    ) -> Result<&mut Self, AlgebraError> {
        let t = self.transform.shear(xy, xz, yx, yz, zx, zy);
        self.set_transform(t)
    }

    pub fn move_to(&mut self, p: Tuple) -> Result<&mut Self, AlgebraError> {
        let t = self.transform.move_to(p);
        self.set_transform(t)
    }

    /// The entity's position in its parent's space.
    pub fn position(&self) -> Tuple {
        self.transform.position()
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    pub fn material(&self) -> Option<&Material> {
        self.material.as_ref()
    }

    pub fn kinematic(&self) -> Option<&Kinematic> {
        self.kinematic.as_ref()
    }

    pub fn light(&self) -> Option<&PointLight> {
        self.light.as_ref()
    }

    /// Set the mesh slot, replacing any previous mesh.
    pub fn set_mesh(&mut self, mesh: Mesh) -> &mut Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn set_material(&mut self, material: Material) -> &mut Self {
        self.material = Some(material);
        self
    }

    pub fn set_kinematic(&mut self, kinematic: Kinematic) -> &mut Self {
        self.kinematic = Some(kinematic);
        self
    }

    pub fn set_light(&mut self, light: PointLight) -> &mut Self {
        self.light = Some(light);
        self
    }

    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }
}

/// The entity arena.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<Entity>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh entity and return its handle.
    pub fn spawn(&mut self) -> EntityId {
        let id = EntityId(self.nodes.len() as u32);
        self.nodes.push(Entity::new());
        id
    }

    pub fn entity(&self, id: EntityId) -> &Entity {
        &self.nodes[id.0 as usize]
    }

    pub fn entity_mut(&mut self, id: EntityId) -> &mut Entity {
        &mut self.nodes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append `child` to `parent`'s children and set its back-handle.
    pub fn add_child(&mut self, parent: EntityId, child: EntityId) {
        self.entity_mut(parent).children.push(child);
        self.entity_mut(child).parent = Some(parent);
    }

    /// Convert a world-space point into `id`'s object space, threading the
    /// inverse transforms down from the outermost ancestor.
    pub fn world_to_object(&self, id: EntityId, world_point: Tuple) -> Tuple {
        let e = self.entity(id);
        let p = match e.parent {
            Some(parent) => self.world_to_object(parent, world_point),
            None => world_point,
        };
        e.inverse * p
    }

    /// Convert an object-space normal of `id` into world space.
    ///
    /// Each level applies its own inverse-transpose and renormalizes before
    /// ascending; doing it the other way round produces wrong normals under
    /// non-uniform scales in nested groups.
    pub fn normal_to_world(&self, id: EntityId, object_normal: Tuple) -> Tuple {
        let e = self.entity(id);
        let mut n = e.normal_matrix * object_normal;
        n.w = 0.0;
        n = n.normalize();
        match e.parent {
            Some(parent) => self.normal_to_world(parent, n),
            None => n,
        }
    }

    /// The world-space surface normal of `id` at a world-space point.
    ///
    /// Entities without a surface (no mesh, or a group) contribute a zero
    /// vector.
    pub fn normal_at(&self, id: EntityId, world_point: Tuple) -> Tuple {
        match self.entity(id).mesh() {
            None | Some(Mesh::Group) => vector(0.0, 0.0, 0.0),
            Some(mesh) => {
                let object_point = self.world_to_object(id, world_point);
                let object_normal = mesh.local_normal(object_point);
                self.normal_to_world(id, object_normal)
            }
        }
    }

    /// Run the kinematic integrator on `id` and recurse into its children.
    /// Strictly a between-renders mutation.
    pub fn tick(&mut self, id: EntityId) -> Result<(), AlgebraError> {
        if let Some(mut kin) = self.entity(id).kinematic {
            kin.velocity = kin.velocity + kin.acceleration;
            let v = kin.velocity;
            let e = self.entity_mut(id);
            e.kinematic = Some(kin);
            e.translate(v.x, v.y, v.z)?;
        }

        let children = self.entity(id).children.clone();
        for child in children {
            self.tick(child)?;
        }
        Ok(())
    }
}
