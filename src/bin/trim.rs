use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tryon_studio::services::trimmer::{self, DEFAULT_ALPHA_THRESHOLD};

/// Crop an image to the bounding box of its non-transparent pixels.
#[derive(Parser, Debug)]
#[command(name = "trim", version)]
struct Cli {
    /// Input image (PNG, JPEG or WebP).
    input: PathBuf,

    /// Output PNG path.
    output: PathBuf,

    /// Alpha values at or below this count as transparent.
    #[arg(long, default_value_t = DEFAULT_ALPHA_THRESHOLD)]
    threshold: u8,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let bytes = std::fs::read(&cli.input)
        .with_context(|| format!("read {}", cli.input.display()))?;
    let trimmed = trimmer::trim_png(&bytes, cli.threshold)
        .with_context(|| format!("trim {}", cli.input.display()))?;
    std::fs::write(&cli.output, trimmed)
        .with_context(|| format!("write {}", cli.output.display()))?;

    Ok(())
}
