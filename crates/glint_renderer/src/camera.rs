//! Camera: pixel-ray projection and the parallel render loop.

use std::time::Instant;

use rayon::prelude::*;

use glint_core::{Canvas, Color};
use glint_math::{point, AlgebraError, Matrix4, Ray, Transform, Tuple};

use crate::world::{World, MAX_DEPTH};

/// A pinhole camera projecting one ray per pixel through a view plane one
/// unit in front of the eye.
#[derive(Debug, Clone)]
pub struct Camera {
    hsize: usize,
    vsize: usize,
    field_of_view: f64,
    transform: Transform,
    inverse: Matrix4,
    pixel_size: f64,
    half_width: f64,
    half_height: f64,
}

impl Camera {
    /// Create a camera for an hsize x vsize image with the given horizontal
    /// field of view (radians).
    pub fn new(hsize: usize, vsize: usize, field_of_view: f64) -> Self {
        let half_view = (field_of_view / 2.0).tan();
        let aspect = hsize as f64 / vsize as f64;

        let (half_width, half_height) = if aspect >= 1.0 {
            (half_view, half_view / aspect)
        } else {
            (half_view * aspect, half_view)
        };

        Self {
            hsize,
            vsize,
            field_of_view,
            transform: Transform::new(),
            inverse: Matrix4::IDENTITY,
            pixel_size: (half_width * 2.0) / hsize as f64,
            half_width,
            half_height,
        }
    }

    pub fn hsize(&self) -> usize {
        self.hsize
    }

    pub fn vsize(&self) -> usize {
        self.vsize
    }

    pub fn field_of_view(&self) -> f64 {
        self.field_of_view
    }

    pub fn pixel_size(&self) -> f64 {
        self.pixel_size
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Set the view transform, caching its inverse for ray projection.
    pub fn set_transform(&mut self, t: Transform) -> Result<&mut Self, AlgebraError> {
        self.inverse = t.inverse()?.matrix();
        self.transform = t;
        Ok(self)
    }

    /// Builder form of [`Camera::set_transform`].
    pub fn with_transform(mut self, t: Transform) -> Result<Self, AlgebraError> {
        self.set_transform(t)?;
        Ok(self)
    }

    /// Point the camera at `to` from `from`.
    pub fn with_view(self, from: Tuple, to: Tuple, up: Tuple) -> Result<Self, AlgebraError> {
        self.with_transform(Transform::view(from, to, up))
    }

    /// The world-space ray through the center of pixel (x, y).
    pub fn project_pixel_ray(&self, x: usize, y: usize) -> Ray {
        // Offset from the view-plane edge to the pixel center.
        let xoffset = (x as f64 + 0.5) * self.pixel_size;
        let yoffset = (y as f64 + 0.5) * self.pixel_size;

        // The camera looks toward -z, with +x to the left.
        let world_x = self.half_width - xoffset;
        let world_y = self.half_height - yoffset;

        let pixel = self.inverse * point(world_x, world_y, -1.0);
        let origin = self.inverse * point(0.0, 0.0, 0.0);
        let direction = (pixel - origin).normalize();

        Ray::new(origin, direction)
    }

    /// Render `world` into `canvas` on the rayon worker pool.
    ///
    /// Rows are produced in deterministic row-major order and fan out to the
    /// workers; completion order is unspecified, but every result carries
    /// its (x, y) target, so the merge writes each canvas cell exactly once
    /// and the image is deterministic regardless of scheduling.
    pub fn render<C: Canvas>(&self, world: &World, canvas: &mut C) {
        let start = Instant::now();

        let results: Vec<(usize, usize, Color)> = (0..self.vsize)
            .into_par_iter()
            .flat_map_iter(|y| (0..self.hsize).map(move |x| (x, y)))
            .map(|(x, y)| {
                let ray = self.project_pixel_ray(x, y);
                (x, y, world.limited_cast(&ray, MAX_DEPTH))
            })
            .collect();

        for (x, y, color) in results {
            canvas.set(x, y, color);
        }

        let elapsed = start.elapsed();
        log::info!(
            "rendered {}x{} ({} rays) in {:.2?}",
            self.hsize,
            self.vsize,
            self.hsize * self.vsize,
            elapsed
        );
    }
}
