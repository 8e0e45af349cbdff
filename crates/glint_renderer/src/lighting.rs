//! Phong local illumination.

use glint_core::{Color, Material, PointLight};
use glint_math::Tuple;

/// Phong shading at a point: ambient + diffuse + specular.
///
/// `surface_color` is the already-evaluated surface color at the point (the
/// material's shader output, or its flat color), so the model itself stays a
/// pure function of its inputs.
pub fn phong(
    material: &Material,
    surface_color: Color,
    light: &PointLight,
    light_position: Tuple,
    point: Tuple,
    eye: Tuple,
    normal: Tuple,
) -> Color {
    let effective = surface_color * light.intensity;
    let ambient = effective * material.ambient;

    let light_vector = (light_position - point).normalize();
    let light_dot_normal = light_vector.dot(normal);
    if light_dot_normal < 0.0 {
        // Light is on the other side of the surface.
        return ambient;
    }

    let diffuse = effective * (material.diffuse * light_dot_normal);

    let reflect_dot_eye = (-light_vector).reflect(normal).dot(eye);
    let specular = if reflect_dot_eye <= 0.0 {
        // Reflection points away from the eye.
        Color::BLACK
    } else {
        light.intensity * (material.specular * reflect_dot_eye.powf(material.shininess))
    };

    ambient + diffuse + specular
}

/// Shading for a point in shadow: the ambient term only.
pub fn phong_shadow(material: &Material, surface_color: Color, light: &PointLight) -> Color {
    surface_color * light.intensity * material.ambient
}
