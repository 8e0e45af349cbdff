//! Render a demo scene exercising every primitive and material feature:
//! patterned floor, mirror sphere, glass sphere, a striped cylinder, and a
//! small group of cubes. Writes `cover_scene.png`.
//!
//! Run with `RUST_LOG=info cargo run --release --example cover_scene`.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4};

use anyhow::Result;

use glint_renderer::{
    point, vector, Camera, Color, Frame, Material, Mesh, Shader, Transform, World,
};

fn build_world() -> Result<World> {
    let mut world = World::new();

    let light = world.spawn_light(Color::WHITE);
    world.entity_mut(light).translate(-10.0, 10.0, -10.0)?;
    world.add(light);

    // Checkered floor, slightly reflective.
    let floor = world.spawn_plane();
    let checkers = Shader::with_transform(
        Transform::new().scale(0.75, 0.75, 0.75),
        Shader::cubes(
            Shader::pigment(Color::new(0.9, 0.9, 0.9)),
            Shader::pigment(Color::new(0.2, 0.25, 0.3)),
        ),
    )?;
    world.entity_mut(floor).set_material(
        Material::new()
            .with_shader(checkers)
            .with_specular(0.1)
            .with_reflective(0.15),
    );
    world.add(floor);

    // Mirror sphere in the middle.
    let mirror = world.spawn_sphere();
    world.entity_mut(mirror).set_material(
        Material::new()
            .with_color(Color::new(0.1, 0.1, 0.1))
            .with_diffuse(0.3)
            .with_specular(1.0)
            .with_shininess(300.0)
            .with_reflective(0.9),
    );
    world.entity_mut(mirror).translate(-0.5, 1.0, 0.5)?;
    world.add(mirror);

    // Glass sphere in front.
    let glass = world.spawn_glass_sphere();
    {
        let mut m = Material::glass();
        m.reflective = 0.9;
        m.diffuse = 0.1;
        m.ambient = 0.05;
        m.specular = 1.0;
        m.shininess = 300.0;
        world.entity_mut(glass).set_material(m);
    }
    world
        .entity_mut(glass)
        .scale(0.75, 0.75, 0.75)?
        .translate(1.3, 0.75, -1.0)?;
    world.add(glass);

    // Striped cylinder on the right.
    let cylinder = world.spawn();
    world
        .entity_mut(cylinder)
        .set_mesh(Mesh::capped_cylinder(0.0, 1.0));
    let stripes = Shader::with_transform(
        Transform::new().scale(0.25, 0.25, 0.25).rotate_z(FRAC_PI_2),
        Shader::stripes(
            Shader::pigment(Color::new(0.9, 0.5, 0.2)),
            Shader::pigment(Color::new(0.6, 0.2, 0.1)),
        ),
    )?;
    world
        .entity_mut(cylinder)
        .set_material(Material::new().with_shader(stripes).with_specular(0.4));
    world
        .entity_mut(cylinder)
        .scale(0.6, 1.4, 0.6)?
        .translate(3.0, 0.0, 1.5)?;
    world.add(cylinder);

    // A small group of rotated cubes, sharing the group transform.
    let mut cubes = Vec::new();
    for i in 0..3 {
        let cube = world.spawn();
        world.entity_mut(cube).set_mesh(Mesh::cube());
        world.entity_mut(cube).set_material(
            Material::new()
                .with_color(Color::new(0.3, 0.5, 0.9))
                .with_diffuse(0.8),
        );
        world
            .entity_mut(cube)
            .scale(0.3, 0.3, 0.3)?
            .rotate_y(FRAC_PI_4 * i as f64)?
            .translate(-1.2 * i as f64, 0.3, 0.0)?;
        cubes.push(cube);
    }
    let group = world.spawn_group(&cubes);
    world
        .entity_mut(group)
        .rotate_y(FRAC_PI_4)?
        .translate(-2.0, 0.0, 2.5)?;
    world.add(group);

    world.background = Color::new(0.05, 0.06, 0.08);
    Ok(world)
}

fn main() -> Result<()> {
    env_logger::init();

    let world = build_world()?;

    let camera = Camera::new(960, 540, FRAC_PI_3).with_view(
        point(0.0, 1.8, -6.0),
        point(0.0, 0.8, 0.0),
        vector(0.0, 1.0, 0.0),
    )?;

    let mut frame = Frame::new(camera.hsize(), camera.vsize());
    camera.render(&world, &mut frame);

    frame.write_png("cover_scene.png")?;
    println!("wrote cover_scene.png");
    Ok(())
}
