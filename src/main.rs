// Copyright 2020 TwoCookingMice

use mctrace::core::scene_loader::load_scene;
use mctrace::core::sensor::Sensor;
use mctrace::integrators::path::PathIntegrator;
use mctrace::io::image_utils::write_image;
use mctrace::math::tonemap::{ Aces, GammaCorrection };
use mctrace::renderers::simple::{ Renderer, RendererOptions, SimpleRenderer };

use anyhow::{ bail, Context, Result };
use std::env;

const USAGE: &str = "<scene.txt> <output.ppm> [--seed N] [--threads N]";

struct Args {
    scene_path: String,
    output_path: String,
    options: RendererOptions,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut positional = Vec::new();
    let mut options = RendererOptions::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                let value = args.get(i).context("--seed needs a value")?;
                options.seed = value.parse().with_context(|| format!("invalid seed `{}`", value))?;
            }
            "--threads" => {
                i += 1;
                let value = args.get(i).context("--threads needs a value")?;
                options.threads = value.parse().with_context(|| format!("invalid thread count `{}`", value))?;
                if options.threads == 0 {
                    bail!("thread count must be positive");
                }
            }
            flag if flag.starts_with("--") => bail!("unknown option `{}`", flag),
            path => positional.push(path.to_string()),
        }
        i += 1;
    }

    if positional.len() != 2 {
        bail!("expected exactly two paths, got {}", positional.len());
    }
    let output_path = positional.pop().unwrap_or_default();
    let scene_path = positional.pop().unwrap_or_default();
    Ok(Args { scene_path, output_path, options })
}

fn run(args: Args) -> Result<()> {
    let description = load_scene(&args.scene_path)
        .with_context(|| format!("failed to load scene {}", args.scene_path))?;
    let settings = description.settings;
    log::info!("{}, depth {}.", description.camera.describe(), settings.max_depth);

    let integrator = Box::new(PathIntegrator::new(settings.max_depth, settings.samples_per_pixel));
    let renderer = SimpleRenderer::new(integrator, args.options);
    let image = renderer.render(&description.scene, &description.camera);

    let bytes = image.to_rgb8(&Aces, &GammaCorrection::default());
    write_image(&args.output_path, image.width(), image.height(), &bytes)
        .with_context(|| format!("failed to write image {}", args.output_path))?;
    log::info!("Image written to {}.", args.output_path);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let argv: Vec<String> = env::args().collect();
    let program = argv.first().map(String::as_str).unwrap_or("mctrace");
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("Usage: {} {}", program, USAGE);
            std::process::exit(1);
        }
    };

    run(args)
}
