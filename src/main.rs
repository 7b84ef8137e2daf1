// Copyright 2020 TwoCookingMice

use wavepath::core::scene_loader::load_scene;
use wavepath::core::settings::PassConfig;
use wavepath::core::tonemap::Tonemap;
use wavepath::io::{exr_utils, png_utils, OutputFormat};
use wavepath::renderers::engine::PathEngine;

use std::env;
use std::error::Error;
use std::sync::Arc;

const USAGE: &str = "<scene.xml> <output.(exr|png)> [--passes N] [--max-depth N] [--survive-rate F] \
                     [--seed N] [--workers N] [--light-paths] [--no-tonemap] [--quiet]";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} {}", args[0], USAGE);
        std::process::exit(1);
    }

    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(2);
    }
}

fn parse_arg<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> Result<T, String> {
    args.get(i)
        .and_then(|v| v.parse::<T>().ok())
        .ok_or_else(|| format!("{} expects a value", flag))
}

fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    let input_path = &args[1];
    let output_path = &args[2];
    let format = OutputFormat::from_path(output_path)?;

    let scene = load_scene(input_path)?;
    let mut settings = scene.settings.clone();
    let mut tonemap = settings.tonemap;
    let mut show_progress = true;

    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--passes" => {
                i += 1;
                settings.passes = parse_arg(args, i, "--passes")?;
            }
            "--max-depth" => {
                i += 1;
                settings.max_depth = parse_arg(args, i, "--max-depth")?;
            }
            "--survive-rate" => {
                i += 1;
                settings.survive_rate = parse_arg(args, i, "--survive-rate")?;
            }
            "--seed" => {
                i += 1;
                settings.seed = parse_arg(args, i, "--seed")?;
            }
            "--workers" => {
                i += 1;
                settings.workers = parse_arg(args, i, "--workers")?;
            }
            "--light-paths" => settings.light_paths = true,
            "--no-tonemap" => tonemap = Tonemap::Identity,
            "--quiet" => show_progress = false,
            other => log::warn!("ignoring unknown argument '{}'", other),
        }
        i += 1;
    }

    let mut engine = PathEngine::new(Arc::new(scene.shapes), Arc::new(scene.lights), scene.materials, &settings)?;
    engine.set_camera_transform(scene.camera.transform()?);

    let mut config = PassConfig::from(&settings);
    config.show_progress = show_progress;
    engine.render(&config)?;

    match format {
        OutputFormat::Exr => {
            let image = engine.get_image(Tonemap::Identity);
            exr_utils::write_exr_to_file(&image, output_path)?;
        }
        OutputFormat::Png => {
            let image = engine.get_image(tonemap);
            png_utils::write_png_to_file(&image, output_path)?;
        }
    }
    Ok(())
}
