//! Ray-scene intersection records and refractive-index bookkeeping.

use glint_core::{EntityId, SceneGraph};
use glint_math::{Ray, Tuple, EPSILON};

/// Everything shading needs to know about one boundary crossing.
///
/// Records are ephemeral: built per cast, discarded after shading.
#[derive(Debug, Clone)]
pub struct Intersection {
    pub t: f64,
    pub entity: EntityId,
    /// Hit point in world space.
    pub point: Tuple,
    /// Hit point biased along the normal; shadow and reflection rays start
    /// here so they cannot re-hit their own surface.
    pub over_point: Tuple,
    /// Hit point biased against the normal; refraction rays start here.
    pub under_point: Tuple,
    /// Unit vector back toward the eye.
    pub eye: Tuple,
    /// World-space surface normal, flipped to face the eye.
    pub normal: Tuple,
    /// The incoming direction reflected about the normal.
    pub reflectv: Tuple,
    /// True when the ray originated inside the surface.
    pub inside: bool,
    /// Refractive indices on the incoming and outgoing side of the crossing.
    pub n1: f64,
    pub n2: f64,
}

impl Intersection {
    /// Schlick's approximation to the Fresnel reflectance at this crossing.
    ///
    /// Leaving a denser medium is first checked for total internal
    /// reflection, which reflects everything.
    pub fn schlick(&self) -> f64 {
        let mut cos = self.eye.dot(self.normal);

        if self.n1 > self.n2 {
            let ratio = self.n1 / self.n2;
            let sin2_t = ratio * ratio * (1.0 - cos * cos);
            if sin2_t > 1.0 {
                return 1.0;
            }
            cos = (1.0 - sin2_t).sqrt();
        }

        let r0 = ((self.n1 - self.n2) / (self.n1 + self.n2)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cos).powi(5)
    }
}

/// All crossings of one ray, sorted ascending by t.
///
/// Negative-t records are retained (the index bookkeeping needs every
/// boundary along the line) but are never selected as the hit.
#[derive(Debug, Default)]
pub struct Intersections {
    pub all: Vec<Intersection>,
    hit: Option<usize>,
}

impl Intersections {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The visible hit: the first crossing with t >= 0.
    pub fn hit(&self) -> Option<&Intersection> {
        self.hit.map(|i| &self.all[i])
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// Intersect a single entity tree with a world-space ray.
pub fn intersect(graph: &SceneGraph, ray: &Ray, entity: EntityId) -> Intersections {
    let mut roots = Vec::new();
    collect(graph, entity, ray, &mut roots);
    finalize(graph, ray, roots)
}

/// Gather raw (t, entity) pairs from `id` and its descendants.
///
/// The ray arrives in the parent's space; each level applies its own cached
/// inverse, so nested transforms compose along the chain for free.
pub(crate) fn collect(graph: &SceneGraph, id: EntityId, ray: &Ray, out: &mut Vec<(f64, EntityId)>) {
    let entity = graph.entity(id);
    let local = ray.transform(&entity.inverse());

    if let Some(mesh) = entity.mesh() {
        out.extend(mesh.intersect(&local).into_iter().map(|t| (t, id)));
    }

    for child in entity.children() {
        collect(graph, *child, &local, out);
    }
}

/// Sort the raw crossings, build full records, and assign n1/n2.
pub(crate) fn finalize(
    graph: &SceneGraph,
    ray: &Ray,
    mut roots: Vec<(f64, EntityId)>,
) -> Intersections {
    roots.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let mut all = Vec::with_capacity(roots.len());
    let mut hit = None;

    for (i, (t, id)) in roots.iter().enumerate() {
        all.push(prepare(graph, ray, *t, *id));
        if hit.is_none() && *t >= 0.0 {
            hit = Some(i);
        }
    }

    assign_refractive_indices(graph, &mut all);

    Intersections { all, hit }
}

fn prepare(graph: &SceneGraph, ray: &Ray, t: f64, id: EntityId) -> Intersection {
    let point = ray.position(t);
    let eye = -ray.direction;

    let mut normal = graph.normal_at(id, point);
    let mut inside = false;
    if normal.dot(eye) < 0.0 {
        normal = -normal;
        inside = true;
    }

    Intersection {
        t,
        entity: id,
        point,
        over_point: point + normal * EPSILON,
        under_point: point - normal * EPSILON,
        eye,
        normal,
        reflectv: ray.direction.reflect(normal),
        inside,
        n1: 1.0,
        n2: 1.0,
    }
}

/// Walk the sorted crossings tracking which entities the ray currently
/// occupies; at each crossing n1 is the medium being left and n2 the medium
/// being entered, with vacuum (1.0) outside the outermost volume.
fn assign_refractive_indices(graph: &SceneGraph, all: &mut [Intersection]) {
    let mut containers: Vec<EntityId> = Vec::new();

    for x in all.iter_mut() {
        x.n1 = containers
            .last()
            .map_or(1.0, |id| refractive_index(graph, *id));

        if let Some(pos) = containers.iter().position(|id| *id == x.entity) {
            containers.remove(pos);
        } else {
            containers.push(x.entity);
        }

        x.n2 = containers
            .last()
            .map_or(1.0, |id| refractive_index(graph, *id));
    }
}

fn refractive_index(graph: &SceneGraph, id: EntityId) -> f64 {
    graph
        .entity(id)
        .material()
        .map_or(1.0, |m| m.refractive_index)
}
