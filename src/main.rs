//! rechroma CLI - colorize black-and-white images.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rechroma::model::AssetPaths;
use rechroma::{Config, Session};

/// Colorize a black-and-white image with a pretrained network.
#[derive(Parser, Debug)]
#[command(name = "rechroma")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input image path (JPEG or PNG).
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Directory the colorized image is written to.
    #[arg(short, long, default_value = "colorized", value_name = "DIR")]
    output_dir: PathBuf,

    /// Directory holding the model assets.
    #[arg(long, default_value = "model", value_name = "DIR")]
    model_dir: PathBuf,

    /// Output JPEG quality (1-100).
    #[arg(short, long, default_value = "95", value_name = "INT")]
    quality: u8,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("rechroma={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = run(&args) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(args: &Args) -> Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }

    let config = Config {
        assets: AssetPaths::from_dir(&args.model_dir),
        output_dir: args.output_dir.clone(),
        output_quality: args.quality,
    };

    let mut session = Session::new(config).context("Failed to initialize colorizer")?;

    session.open(&args.input).context("Failed to open image")?;
    session.colorize().context("Failed to colorize image")?;
    let saved = session.save().context("Failed to save image")?;

    println!(
        "Successfully colorized {} -> {}",
        args.input.display(),
        saved.display()
    );

    Ok(())
}
