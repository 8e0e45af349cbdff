//! Mesh primitives: per-shape intersection and normal computation.
//!
//! All meshes live in their own object space; the scene graph transforms
//! rays in and normals out. The primitive set is closed, so dispatch is a
//! plain enum match rather than a trait object in the per-pixel hot loop.

use glint_math::{point, vector, Ray, Tuple, EPSILON};

/// The geometry capability of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mesh {
    /// Unit sphere centered on the origin.
    Sphere,
    /// Infinite plane at y = 0.
    Plane,
    /// Axis-aligned cube spanning [-1, 1] on every axis.
    Cube,
    /// Unit-radius cylinder around the y axis, optionally truncated to an
    /// open y-range and optionally closed with end caps.
    Cylinder {
        minimum: f64,
        maximum: f64,
        capped: bool,
    },
    /// A composite with no surface of its own; intersection recurses through
    /// the owning entity's children instead.
    Group,
}

impl Mesh {
    pub fn sphere() -> Self {
        Mesh::Sphere
    }

    pub fn plane() -> Self {
        Mesh::Plane
    }

    pub fn cube() -> Self {
        Mesh::Cube
    }

    /// An infinite open cylinder.
    pub fn cylinder() -> Self {
        Mesh::Cylinder {
            minimum: f64::NEG_INFINITY,
            maximum: f64::INFINITY,
            capped: false,
        }
    }

    /// A cylinder truncated to (minimum, maximum), open at both ends.
    pub fn truncated_cylinder(minimum: f64, maximum: f64) -> Self {
        Mesh::Cylinder {
            minimum,
            maximum,
            capped: false,
        }
    }

    /// A truncated cylinder closed with end caps.
    pub fn capped_cylinder(minimum: f64, maximum: f64) -> Self {
        Mesh::Cylinder {
            minimum,
            maximum,
            capped: true,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Mesh::Group)
    }

    /// Intersect an object-space ray, returning the parametric roots.
    ///
    /// Roots are unfiltered: negative values are kept so the refractive
    /// bookkeeping can see every boundary crossing along the line.
    pub fn intersect(&self, ray: &Ray) -> Vec<f64> {
        match self {
            Mesh::Sphere => intersect_sphere(ray),
            Mesh::Plane => intersect_plane(ray),
            Mesh::Cube => intersect_cube(ray),
            Mesh::Cylinder {
                minimum,
                maximum,
                capped,
            } => intersect_cylinder(ray, *minimum, *maximum, *capped),
            Mesh::Group => Vec::new(),
        }
    }

    /// The surface normal at an object-space point.
    ///
    /// Groups have no surface; querying them yields the zero vector, which
    /// the scene graph treats as "no contribution".
    pub fn local_normal(&self, p: Tuple) -> Tuple {
        match self {
            Mesh::Sphere => p - point(0.0, 0.0, 0.0),
            Mesh::Plane => vector(0.0, 1.0, 0.0),
            Mesh::Cube => cube_normal(p),
            Mesh::Cylinder {
                minimum, maximum, ..
            } => cylinder_normal(p, *minimum, *maximum),
            Mesh::Group => vector(0.0, 0.0, 0.0),
        }
    }
}

fn intersect_sphere(ray: &Ray) -> Vec<f64> {
    let oc = ray.origin - point(0.0, 0.0, 0.0);
    let a = ray.direction.dot(ray.direction);
    let b = 2.0 * ray.direction.dot(oc);
    let c = oc.dot(oc) - 1.0;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Vec::new();
    }

    let sqrtd = discriminant.sqrt();
    vec![(-b - sqrtd) / (2.0 * a), (-b + sqrtd) / (2.0 * a)]
}

fn intersect_plane(ray: &Ray) -> Vec<f64> {
    if ray.direction.y.abs() < EPSILON {
        // Parallel (or coplanar): no countable roots.
        return Vec::new();
    }
    vec![-ray.origin.y / ray.direction.y]
}

/// Per-axis slab test: entry and exit parameters for one pair of faces.
fn check_axis(origin: f64, direction: f64) -> (f64, f64) {
    let tmin = (-1.0 - origin) / direction;
    let tmax = (1.0 - origin) / direction;
    if tmin > tmax {
        (tmax, tmin)
    } else {
        (tmin, tmax)
    }
}

fn intersect_cube(ray: &Ray) -> Vec<f64> {
    let (xmin, xmax) = check_axis(ray.origin.x, ray.direction.x);
    let (ymin, ymax) = check_axis(ray.origin.y, ray.direction.y);
    let (zmin, zmax) = check_axis(ray.origin.z, ray.direction.z);

    let tmin = xmin.max(ymin).max(zmin);
    let tmax = xmax.min(ymax).min(zmax);

    if tmin > tmax {
        Vec::new()
    } else {
        vec![tmin, tmax]
    }
}

fn cube_normal(p: Tuple) -> Tuple {
    let maxc = p.x.abs().max(p.y.abs()).max(p.z.abs());
    if maxc == p.x.abs() {
        vector(p.x, 0.0, 0.0)
    } else if maxc == p.y.abs() {
        vector(0.0, p.y, 0.0)
    } else {
        vector(0.0, 0.0, p.z)
    }
}

/// Does the ray at parameter t fall within the unit disk of a cap plane?
fn check_cap(ray: &Ray, t: f64) -> bool {
    let x = ray.origin.x + t * ray.direction.x;
    let z = ray.origin.z + t * ray.direction.z;
    x * x + z * z <= 1.0
}

fn intersect_caps(ray: &Ray, minimum: f64, maximum: f64, capped: bool, out: &mut Vec<f64>) {
    if !capped || ray.direction.y.abs() < EPSILON {
        return;
    }

    let t = (minimum - ray.origin.y) / ray.direction.y;
    if check_cap(ray, t) {
        out.push(t);
    }

    let t = (maximum - ray.origin.y) / ray.direction.y;
    if check_cap(ray, t) {
        out.push(t);
    }
}

fn intersect_cylinder(ray: &Ray, minimum: f64, maximum: f64, capped: bool) -> Vec<f64> {
    let mut roots = Vec::new();

    let a = ray.direction.x * ray.direction.x + ray.direction.z * ray.direction.z;
    if a.abs() < EPSILON {
        // Parallel to the axis: only the caps can contribute.
        intersect_caps(ray, minimum, maximum, capped, &mut roots);
        return roots;
    }

    let b = 2.0 * (ray.origin.x * ray.direction.x + ray.origin.z * ray.direction.z);
    let c = ray.origin.x * ray.origin.x + ray.origin.z * ray.origin.z - 1.0;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return roots;
    }

    let sqrtd = discriminant.sqrt();
    let mut t0 = (-b - sqrtd) / (2.0 * a);
    let mut t1 = (-b + sqrtd) / (2.0 * a);
    if t0 > t1 {
        std::mem::swap(&mut t0, &mut t1);
    }

    for t in [t0, t1] {
        let y = ray.origin.y + t * ray.direction.y;
        if minimum < y && y < maximum {
            roots.push(t);
        }
    }

    intersect_caps(ray, minimum, maximum, capped, &mut roots);
    roots
}

fn cylinder_normal(p: Tuple, minimum: f64, maximum: f64) -> Tuple {
    let dist = p.x * p.x + p.z * p.z;

    if dist < 1.0 && p.y >= maximum - EPSILON {
        vector(0.0, 1.0, 0.0)
    } else if dist < 1.0 && p.y <= minimum + EPSILON {
        vector(0.0, -1.0, 0.0)
    } else {
        vector(p.x, 0.0, p.z).normalize()
    }
}
