// Copyright 2020 TwoCookingMice

use genoise::core::material::{Material, MaterialParameter};
use genoise::core::scene::Scene;
use genoise::integrators::whitted::WhittedIntegrator;
use genoise::lights::directional::DirectionalLight;
use genoise::lights::point::PointLight;
use genoise::math::constants::Vector3f;
use genoise::renderers::simple::{PixelSampling, SimpleRenderer};
use genoise::sensors::perspective::PerspectiveCamera;
use genoise::shapes::sphere::Sphere;
use genoise::shapes::triangle_mesh::TriangleMesh;

use log::info;
use std::env;
use std::sync::Arc;
use std::time::Instant;

fn build_demo_scene(aspect: f32) -> Scene {
    let mut scene = Scene::new();

    let floor_material = Arc::new(Material::new()
        .with_ambient(MaterialParameter::constant(Vector3f::new(0.1, 0.1, 0.1)))
        .with_diffuse(MaterialParameter::constant(Vector3f::new(0.7, 0.7, 0.7))));
    let mut floor = TriangleMesh::new(floor_material);
    floor.add_vertex(Vector3f::new(-20.0, 0.0, -20.0));
    floor.add_vertex(Vector3f::new(20.0, 0.0, -20.0));
    floor.add_vertex(Vector3f::new(20.0, 0.0, 20.0));
    floor.add_vertex(Vector3f::new(-20.0, 0.0, 20.0));
    assert!(floor.add_face(0, 2, 1));
    assert!(floor.add_face(0, 3, 2));
    for face in floor.into_faces().expect("floor mesh is valid") {
        scene.add_object(face);
    }

    let diffuse = Arc::new(Material::new()
        .with_ambient(MaterialParameter::constant(Vector3f::new(0.1, 0.02, 0.02)))
        .with_diffuse(MaterialParameter::constant(Vector3f::new(0.8, 0.1, 0.1)))
        .with_specular(MaterialParameter::constant(Vector3f::new(0.4, 0.4, 0.4)))
        .with_shininess(64.0));
    scene.add_object(Arc::new(Sphere::new(Vector3f::new(-2.2, 1.0, 0.0), 1.0, diffuse)));

    let mirror = Arc::new(Material::new()
        .with_specular(MaterialParameter::constant(Vector3f::new(0.3, 0.3, 0.3)))
        .with_reflective(MaterialParameter::constant(Vector3f::new(0.9, 0.9, 0.9)))
        .with_shininess(256.0));
    scene.add_object(Arc::new(Sphere::new(Vector3f::new(0.0, 1.0, 0.0), 1.0, mirror)));

    let glass = Arc::new(Material::new()
        .with_specular(MaterialParameter::constant(Vector3f::new(0.2, 0.2, 0.2)))
        .with_transmissive(MaterialParameter::constant(Vector3f::new(0.9, 0.9, 0.9)))
        .with_shininess(128.0)
        .with_index(1.5));
    scene.add_object(Arc::new(Sphere::new(Vector3f::new(2.2, 1.0, 0.0), 1.0, glass)));

    scene.add_light(Box::new(PointLight::with_falloff(
        Vector3f::new(4.0, 8.0, 4.0), Vector3f::new(0.9, 0.9, 0.9),
        0.25, 0.003, 0.0001)));
    scene.add_light(Box::new(DirectionalLight::new(
        Vector3f::new(-0.3, -1.0, -0.4), Vector3f::new(0.25, 0.25, 0.3))));
    scene.set_ambient(Vector3f::new(0.15, 0.15, 0.15));

    scene.set_camera(Box::new(PerspectiveCamera::new(
        Vector3f::new(0.0, 2.0, 8.0),
        Vector3f::new(0.0, 1.0, 0.0),
        Vector3f::new(0.0, 1.0, 0.0),
        std::f32::consts::FRAC_PI_4, aspect)));

    scene.build_bvh();
    scene
}

fn main() {
    env::set_var("RUST_LOG", "info");
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <output.png> [--width N] [--height N] [--max-depth N] [--subsamples N]", args[0]);
        std::process::exit(1);
    }

    let output_path = &args[1];
    let mut width: usize = 512;
    let mut height: usize = 384;
    let mut max_depth: u32 = 5;
    let mut subsamples: u32 = 1;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--width" => {
                i += 1;
                width = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(width);
            }
            "--height" => {
                i += 1;
                height = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(height);
            }
            "--max-depth" => {
                i += 1;
                max_depth = args.get(i).and_then(|v| v.parse::<u32>().ok()).unwrap_or(max_depth);
            }
            "--subsamples" => {
                i += 1;
                subsamples = args.get(i).and_then(|v| v.parse::<u32>().ok()).unwrap_or(subsamples);
            }
            _ => {}
        }
        i += 1;
    }

    let scene = build_demo_scene(width as f32 / height as f32);

    let sampling = if subsamples > 1 {
        PixelSampling::Grid(subsamples)
    } else {
        PixelSampling::Single
    };
    let integrator = Box::new(WhittedIntegrator::new(max_depth));
    let mut renderer = SimpleRenderer::new(integrator, sampling);
    renderer.setup(width, height);

    let start = Instant::now();
    renderer.render(&scene);
    info!("rendered in {:.2}s", start.elapsed().as_secs_f32());

    let buffer = renderer.buffer();
    image::save_buffer(output_path, buffer.bytes(),
                       buffer.width() as u32, buffer.height() as u32,
                       image::ColorType::Rgb8)
        .expect("failed to write output image");
    info!("wrote {}", output_path);
}
