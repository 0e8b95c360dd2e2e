//! mathocr command-line front end
//!
//! Normalizes formula images into fixed-height binarized strips.
//!
//! # Usage
//!
//! ```bash
//! mathocr normalize formula.jpg
//! mathocr normalize scans/*.png -o out --target-height 48 --report
//! mathocr normalize formula.jpg --config normalizer.json
//! mathocr config > normalizer.json
//! ```
//!
//! Set `RUST_LOG=debug` to see per-stage logging.

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mathocr")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Normalize formula images for recognition", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize one or more images and save them as PNG
    Normalize {
        /// Images to normalize
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory for the output files (defaults to next to each input)
        #[arg(long, short = 'o', env = "MATHOCR_OUTPUT_DIR")]
        output_dir: Option<PathBuf>,

        /// JSON configuration file; flags below override its values
        #[arg(long, env = "MATHOCR_CONFIG")]
        config: Option<PathBuf>,

        /// Output height in pixels
        #[arg(long)]
        target_height: Option<u32>,

        /// Adaptive threshold neighborhood size (odd, >= 3)
        #[arg(long)]
        block_size: Option<u32>,

        /// Adaptive threshold constant
        #[arg(long, allow_hyphen_values = true)]
        constant: Option<i32>,

        /// Smoothing kernel size (odd)
        #[arg(long)]
        kernel: Option<u32>,

        /// Smoothing sigma (0 derives it from the kernel size)
        #[arg(long)]
        sigma: Option<f32>,

        /// Print a JSON report line per image
        #[arg(long)]
        report: bool,
    },
    /// Print the default configuration as JSON
    Config,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    mathocr::utils::init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Normalize {
            inputs,
            output_dir,
            config,
            target_height,
            block_size,
            constant,
            kernel,
            sigma,
            report,
        } => {
            let overrides = cli::ConfigOverrides {
                target_height,
                block_size,
                constant,
                kernel,
                sigma,
            };
            let config = cli::build_config(config.as_deref(), &overrides)?;
            cli::normalize_files(&inputs, output_dir.as_deref(), &config, report)?;
        }
        Commands::Config => {
            println!("{}", mathocr::pipeline::NormalizerConfig::default().to_json()?);
        }
    }

    Ok(())
}
