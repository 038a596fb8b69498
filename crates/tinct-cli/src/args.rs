//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tinct_core::TransferMethod;

#[derive(Debug, Parser)]
#[command(name = "tinct", version, about = "Transfer the colors of a reference image and bake them into .cube LUTs")]
pub struct Cli {
    /// JSON config file layered over defaults and TINCT_* variables.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Grade a target image with the colors of a reference image.
    Grade(GradeArgs),
    /// Bake the reference's look into a 3D LUT (.cube).
    Lut(LutArgs),
    /// Apply an existing .cube LUT to an image.
    ApplyLut(ApplyLutArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Method {
    /// CDF-quantile histogram matching (dramatic)
    Histogram,
    /// Mean/std alignment in L*a*b* (natural)
    Reinhard,
}

impl From<Method> for TransferMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Histogram => TransferMethod::Histogram,
            Method::Reinhard => TransferMethod::Reinhard,
        }
    }
}

/// Transfer options shared by `grade` and `lut`.
#[derive(Debug, Args)]
pub struct TransferArgs {
    /// Transfer method
    #[arg(long, value_enum)]
    pub method: Option<Method>,

    /// Keep the target's lightness and transfer color only
    #[arg(long, value_name = "BOOL")]
    pub preserve_luminance: Option<bool>,

    /// Blend strength between original (0.0) and full transfer (1.0)
    #[arg(long)]
    pub intensity: Option<f32>,
}

#[derive(Debug, Args)]
pub struct GradeArgs {
    /// Image to recolor
    #[arg(short, long)]
    pub target: PathBuf,

    /// Image whose colors are transferred
    #[arg(short, long)]
    pub reference: PathBuf,

    /// Output PNG path
    #[arg(short, long)]
    pub output: PathBuf,

    #[command(flatten)]
    pub transfer: TransferArgs,
}

#[derive(Debug, Args)]
pub struct LutArgs {
    /// Image whose colors are transferred
    #[arg(short, long)]
    pub reference: PathBuf,

    /// Output .cube path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Identity cube level L (grid L², image L³ × L³)
    #[arg(long)]
    pub level: Option<u32>,

    /// Title written into the LUT
    #[arg(long)]
    pub title: Option<String>,

    /// Also write the graded identity cube as PNG
    #[arg(long, value_name = "FILE")]
    pub cube_image: Option<PathBuf>,

    #[command(flatten)]
    pub transfer: TransferArgs,
}

#[derive(Debug, Args)]
pub struct ApplyLutArgs {
    /// .cube file to apply
    #[arg(short, long)]
    pub lut: PathBuf,

    /// Image to transform
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output PNG path
    #[arg(short, long)]
    pub output: PathBuf,
}
