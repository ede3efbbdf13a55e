//! Command-line interface implementation

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::codec::{self, OutputFormat};
use crate::error::PipelineError;
use crate::fetch::HttpFetcher;
use crate::pipeline;
use crate::upscale::UpscaleOptions;

const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;

/// Iconforge - generate pixel-art sprites from SVG icon sources
#[derive(Parser)]
#[command(name = "iconforge")]
#[command(about = "Iconforge - generate pixel-art sprites from SVG icon sources")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve embedded assets, rasterize and upscale an SVG icon
    Upscale {
        /// Input SVG file
        input: PathBuf,

        /// Upscale factor (2, 3 or 4)
        #[arg(short, long, default_value = "4")]
        factor: u32,

        /// Output file. If omitted: {input}.{format}
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output encoding; inferred from the output extension if omitted
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Override the base rasterization size (pixels per side)
        #[arg(long)]
        size: Option<u32>,

        /// Disable diagonal smoothing (plain nearest-neighbor replication)
        #[arg(long)]
        no_blend: bool,

        /// Copy alpha unblended from source pixels (no cutout fringing)
        #[arg(long)]
        no_alpha_scale: bool,
    },

    /// Print the opaque bounding box of a raster image as JSON
    Crop {
        /// Input raster file (PNG, WEBP, ...)
        input: PathBuf,
    },

    /// Re-encode a raster image to PNG, optionally shrinking to fit a box
    Convert {
        /// Input raster file (PNG, WEBP, ...)
        input: PathBuf,

        /// Output file. If omitted: {input}.png
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Shrink the image to fit within this many pixels per side
        #[arg(long)]
        max_dim: Option<u32>,
    },
}

/// Run the CLI application
pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Upscale { input, factor, output, format, size, no_blend, no_alpha_scale } => {
            run_upscale(&input, factor, output, format, size, no_blend, no_alpha_scale).await
        }
        Commands::Crop { input } => run_crop(&input),
        Commands::Convert { input, output, max_dim } => run_convert(&input, output, max_dim),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Execute the upscale command
async fn run_upscale(
    input: &Path,
    factor: u32,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
    size: Option<u32>,
    no_blend: bool,
    no_alpha_scale: bool,
) -> Result<(), PipelineError> {
    let svg = fs::read_to_string(input)?;
    let options = UpscaleOptions { blend_colors: !no_blend, scale_alpha: !no_alpha_scale };

    let buffer =
        pipeline::resolve_and_upscale_with(&HttpFetcher::new(), &svg, factor, &options, size)
            .await?;

    let format = resolve_format(format, output.as_deref());
    let output = output.unwrap_or_else(|| input.with_extension(format.extension()));
    let bytes = codec::encode_image(&buffer, format)?;
    fs::write(&output, bytes)?;

    println!(
        "Wrote {}x{} {} sprite to {}",
        buffer.width(),
        buffer.height(),
        format,
        output.display()
    );
    Ok(())
}

/// Pick the output encoding: explicit flag first, then the output file
/// extension, then PNG.
fn resolve_format(format: Option<OutputFormat>, output: Option<&Path>) -> OutputFormat {
    format
        .or_else(|| {
            output
                .and_then(|p| p.extension())
                .and_then(|ext| ext.to_str())
                .and_then(OutputFormat::from_extension)
        })
        .unwrap_or_default()
}

/// Execute the crop command
fn run_crop(input: &Path) -> Result<(), PipelineError> {
    let bytes = fs::read(input)?;
    let buffer = codec::decode_image(&bytes)?;
    let bbox = pipeline::extract_bounding_box(&buffer);

    // Keep the output machine-readable: one JSON object on stdout.
    println!("{}", serde_json::to_string(&bbox).unwrap_or_default());
    Ok(())
}

/// Execute the convert command
fn run_convert(
    input: &Path,
    output: Option<PathBuf>,
    max_dim: Option<u32>,
) -> Result<(), PipelineError> {
    let bytes = fs::read(input)?;
    let mut buffer = codec::decode_image(&bytes)?;
    if let Some(max_dim) = max_dim {
        buffer = codec::shrink_to_fit(&buffer, max_dim);
    }

    let output = output.unwrap_or_else(|| input.with_extension("png"));
    let png = codec::encode_image(&buffer, OutputFormat::Png)?;
    fs::write(&output, png)?;

    println!(
        "Wrote {}x{} png to {}",
        buffer.width(),
        buffer.height(),
        output.display()
    );
    Ok(())
}
