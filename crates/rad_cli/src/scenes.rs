//! Built-in demonstration scenes.

use anyhow::Result;
use rad_core::{builders, Material, Mesh, Scene, Sphere, Transform};
use rad_math::{DQuat, DVec3};

fn panel(name: &str, corners: [DVec3; 4], material: Material) -> Result<Mesh> {
    Ok(builders::quad(name, corners)?.with_material(material))
}

fn rotated_box(name: &str, size: DVec3, base: DVec3, angle_deg: f64, material: Material) -> Result<Mesh> {
    let half = size * 0.5;
    let mut mesh = builders::cuboid(name, -half, half)?.with_material(material);
    let transform = Transform::from_translation(base + DVec3::new(0.0, half.y, 0.0))
        .with_rotation(DQuat::from_rotation_y(angle_deg.to_radians()));
    mesh.transform(&transform.to_matrix());
    Ok(mesh)
}

/// A closed Cornell-style room, 2 units on a side, with two boxes, a
/// glass ball and a square ceiling light. Every wall faces inward.
pub fn cornell_box() -> Result<Scene> {
    let white = Material::from_rgb8("white", 235, 235, 235);
    let red = Material::from_rgb8("red", 200, 30, 30);
    let green = Material::from_rgb8("green", 40, 180, 50);

    let mut scene = Scene::new("cornell");

    scene.add_mesh(panel(
        "floor",
        [
            DVec3::new(-1.0, 0.0, -1.0),
            DVec3::new(-1.0, 0.0, 1.0),
            DVec3::new(1.0, 0.0, 1.0),
            DVec3::new(1.0, 0.0, -1.0),
        ],
        white.clone(),
    )?);
    scene.add_mesh(panel(
        "ceiling",
        [
            DVec3::new(-1.0, 2.0, -1.0),
            DVec3::new(1.0, 2.0, -1.0),
            DVec3::new(1.0, 2.0, 1.0),
            DVec3::new(-1.0, 2.0, 1.0),
        ],
        white.clone(),
    )?);
    scene.add_mesh(panel(
        "back",
        [
            DVec3::new(-1.0, 0.0, -1.0),
            DVec3::new(1.0, 0.0, -1.0),
            DVec3::new(1.0, 2.0, -1.0),
            DVec3::new(-1.0, 2.0, -1.0),
        ],
        white.clone(),
    )?);
    scene.add_mesh(panel(
        "front",
        [
            DVec3::new(-1.0, 0.0, 1.0),
            DVec3::new(-1.0, 2.0, 1.0),
            DVec3::new(1.0, 2.0, 1.0),
            DVec3::new(1.0, 0.0, 1.0),
        ],
        white.clone(),
    )?);
    scene.add_mesh(panel(
        "left",
        [
            DVec3::new(-1.0, 0.0, -1.0),
            DVec3::new(-1.0, 2.0, -1.0),
            DVec3::new(-1.0, 2.0, 1.0),
            DVec3::new(-1.0, 0.0, 1.0),
        ],
        red,
    )?);
    scene.add_mesh(panel(
        "right",
        [
            DVec3::new(1.0, 0.0, -1.0),
            DVec3::new(1.0, 0.0, 1.0),
            DVec3::new(1.0, 2.0, 1.0),
            DVec3::new(1.0, 2.0, -1.0),
        ],
        green,
    )?);

    scene.add_mesh(rotated_box(
        "tall_box",
        DVec3::new(0.55, 1.2, 0.55),
        DVec3::new(-0.35, 0.0, -0.3),
        17.0,
        white.clone(),
    )?);
    scene.add_mesh(rotated_box(
        "short_box",
        DVec3::new(0.5, 0.6, 0.5),
        DVec3::new(0.35, 0.0, 0.35),
        -18.0,
        white,
    )?);

    scene.add_sphere(Sphere::new(
        DVec3::new(0.35, 0.85, 0.35),
        0.25,
        Material::from_rgb8("glass", 220, 240, 255)
            .with_specular(30.0)
            .with_reflectance(0.1, 0.5, 0.1, 0.8)
            .with_refraction_index(1.5),
    ));

    let mut light = panel(
        "light",
        [
            DVec3::new(-0.25, 1.99, -0.25),
            DVec3::new(0.25, 1.99, -0.25),
            DVec3::new(0.25, 1.99, 0.25),
            DVec3::new(-0.25, 1.99, 0.25),
        ],
        Material::from_rgb8("lamp", 255, 245, 220),
    )?;
    light.make_light();
    scene.add_light(light);

    Ok(scene)
}
