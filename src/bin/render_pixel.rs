use wavepath::core::scene_loader::load_scene;
use wavepath::renderers::engine::PathEngine;
use std::env;
use std::sync::Arc;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <scene.xml> <x> <y> [--passes N] [--max-depth N] [--seed N] [--light-paths]", args[0]);
        std::process::exit(1);
    }

    let scene_path = &args[1];
    let x: usize = args[2].parse().unwrap_or(0);
    let y: usize = args[3].parse().unwrap_or(0);

    let scene = load_scene(scene_path).unwrap_or_else(|e| {
        eprintln!("failed to load scene: {}", e);
        std::process::exit(1);
    });
    let mut settings = scene.settings.clone();

    let mut i = 4;
    while i < args.len() {
        match args[i].as_str() {
            "--passes" => {
                i += 1;
                settings.passes = args.get(i).and_then(|v| v.parse::<u32>().ok()).unwrap_or(settings.passes);
            }
            "--max-depth" => {
                i += 1;
                settings.max_depth = args.get(i).and_then(|v| v.parse::<u32>().ok()).unwrap_or(settings.max_depth);
            }
            "--seed" => {
                i += 1;
                settings.seed = args.get(i).and_then(|v| v.parse::<u64>().ok()).unwrap_or(settings.seed);
            }
            "--light-paths" => settings.light_paths = true,
            _ => {}
        }
        i += 1;
    }

    if x >= settings.width || y >= settings.height {
        eprintln!("Pixel out of bounds: ({}, {}) for size {}x{}", x, y, settings.width, settings.height);
        std::process::exit(2);
    }

    let mut engine = PathEngine::new(Arc::new(scene.shapes), Arc::new(scene.lights), scene.materials, &settings)
        .unwrap_or_else(|e| {
            eprintln!("invalid settings: {}", e);
            std::process::exit(1);
        });
    match scene.camera.transform() {
        Ok(camera) => engine.set_camera_transform(camera),
        Err(e) => {
            eprintln!("invalid camera: {}", e);
            std::process::exit(1);
        }
    }

    if let Err(e) = engine.render(&(&settings).into()) {
        eprintln!("render failed: {}", e);
        std::process::exit(1);
    }

    // (x, y) counts rows from the top, as in the written image.
    let film_y = settings.height - 1 - y;
    let film = engine.film();
    let count = film.sample_count(x, film_y);
    let mean = film.resolve_pixel(x, film_y);
    println!(
        "pixel ({}, {}) passes={} depth={} samples={} -> R {:.6}, G {:.6}, B {:.6}",
        x, y, settings.passes, settings.max_depth, count, mean.x, mean.y, mean.z
    );
}
