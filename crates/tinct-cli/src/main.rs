//! Tinct — command-line host for the color transfer engine.
//!
//! Decodes images from disk, hands them to `tinct-core`, and writes the
//! graded image as PNG or the baked look as a `.cube` LUT.

mod args;
mod config;
mod image_loader;

use anyhow::{Context, Result};
use clap::Parser;
use tinct_core::{ColorGradingEngine, CubeGeometry, CubeLut, encode, generate_identity};
use tracing::info;
use tracing_subscriber::EnvFilter;

use args::{ApplyLutArgs, Cli, Command, GradeArgs, LutArgs, TransferArgs};
use config::AppConfig;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;
    if let Some(path) = &cli.config {
        config.merge_file(path)?;
    }

    match cli.command {
        Command::Grade(args) => run_grade(config, args),
        Command::Lut(args) => run_lut(config, args),
        Command::ApplyLut(args) => run_apply_lut(args),
    }
}

fn apply_transfer_args(config: &mut AppConfig, args: &TransferArgs) {
    config.apply_overrides(args.method.map(Into::into), args.preserve_luminance, args.intensity);
}

fn run_grade(mut config: AppConfig, args: GradeArgs) -> Result<()> {
    apply_transfer_args(&mut config, &args.transfer);
    config.validate()?;

    let target = image_loader::load_image(&args.target)
        .with_context(|| format!("loading target {}", args.target.display()))?;
    let reference = image_loader::load_image(&args.reference)
        .with_context(|| format!("loading reference {}", args.reference.display()))?;

    // Degenerate-channel warnings are already logged by the engine.
    let graded = ColorGradingEngine::new().process(&target, &reference, config.transfer)?;

    image_loader::save_png(&graded, &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!(
        "{} image written to {}",
        config.transfer.method.label(),
        args.output.display()
    );
    Ok(())
}

fn run_lut(mut config: AppConfig, args: LutArgs) -> Result<()> {
    apply_transfer_args(&mut config, &args.transfer);
    if let Some(level) = args.level {
        config.cube_level = level;
    }
    if let Some(title) = args.title {
        config.lut_title = title;
    }
    config.validate()?;

    let reference = image_loader::load_image(&args.reference)
        .with_context(|| format!("loading reference {}", args.reference.display()))?;

    let geometry = CubeGeometry::from_level(config.cube_level)?;
    let identity = generate_identity(geometry.level)?;
    let graded = ColorGradingEngine::new().apply_to_cube(&identity, &reference, config.transfer)?;
    let text = encode(&graded, geometry.resolution, &config.lut_title)?;

    std::fs::write(&args.output, text).with_context(|| format!("writing {}", args.output.display()))?;
    info!(
        "{}^3 {} LUT '{}' written to {}",
        geometry.resolution,
        config.transfer.method.label(),
        config.lut_title,
        args.output.display()
    );

    if let Some(path) = &args.cube_image {
        image_loader::save_png(&graded, path).with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}

fn run_apply_lut(args: ApplyLutArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.lut).with_context(|| format!("reading {}", args.lut.display()))?;
    let lut = CubeLut::from_cube_str(&text).with_context(|| format!("parsing {}", args.lut.display()))?;
    let input = image_loader::load_image(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;

    let output = lut.apply_image(&input);
    image_loader::save_png(&output, &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!("applied {}^3 LUT to {}", lut.size, args.input.display());
    Ok(())
}
