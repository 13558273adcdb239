use clap::Parser;
use image::ImageReader;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

use mapreader::DetectionPipeline;

#[derive(Parser)]
#[command(name = "mapreader")]
#[command(about = "Find the position and bearing of the red pointer on a photographed map")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Save intermediate stage images to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let img = ImageReader::open(&args.image_path)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {}", args.image_path.display(), e))?
        .decode()
        .map_err(|e| anyhow::anyhow!("failed to decode image: {}", e))?;

    let mut pipeline = DetectionPipeline::new();
    if let Some(debug_dir) = args.debug_out {
        pipeline = pipeline.with_debug(debug_dir)?;
    }

    match pipeline.detect(&img.to_rgb8()) {
        Ok(reading) => {
            println!("The filename to work on is {}.", args.image_path.display());
            println!("POSITION {:.3} {:.3}", reading.position.x, reading.position.y);
            println!("BEARING {:.1}", reading.bearing.degrees());
        }
        Err(err) => {
            // The harness reads the absence of POSITION/BEARING as a
            // failure for this image; keep stdout clean and say why on
            // stderr.
            eprintln!("{err}");
        }
    }

    Ok(())
}
