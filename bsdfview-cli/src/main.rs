//! bsdfview command-line interface.
//!
//! Inspects, converts and queries BSDF point files without a viewer.
#![allow(
    clippy::uninlined_format_args,
    clippy::cast_precision_loss,
    clippy::too_many_lines
)]

use clap::{Parser, Subcommand, ValueEnum};

use bsdfview_algorithms::{Extremum, PointsStats, StatsSlice};
use bsdfview_io::{Dataset, LoadQueue, LoadQueueConfig};
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("{0}")]
    Io(#[from] bsdfview_io::Error),

    #[error("Core error: {0}")]
    Core(#[from] bsdfview_core::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{failed} of {total} datasets could not be loaded")]
    LoadFailed { failed: usize, total: usize },
}

/// Which extremum to look for.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExtremeArg {
    /// Highest intensity
    Highest,
    /// Lowest intensity
    Lowest,
}

impl From<ExtremeArg> for Extremum {
    fn from(arg: ExtremeArg) -> Self {
        match arg {
            ExtremeArg::Highest => Extremum::Highest,
            ExtremeArg::Lowest => Extremum::Lowest,
        }
    }
}

/// Inspect and edit measured BSDF point files.
#[derive(Parser)]
#[command(name = "bsdfview")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (error, warn, info, debug, trace); `RUST_LOG` overrides it
    #[arg(long, global = true, default_value = "warn")]
    log_level: log::LevelFilter,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show header information of a BSDF file
    Info {
        /// Input file
        input: PathBuf,
    },

    /// Print intensity statistics
    Stats {
        /// Input file
        input: PathBuf,

        /// Wavelength index (spectral files)
        #[arg(short, long, default_value = "0")]
        wavelength: usize,

        /// Select the lowest or highest point before computing selection stats
        #[arg(long, value_enum)]
        selection_extreme: Option<ExtremeArg>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Re-write a file in canonical six-decimal form (drops duplicates)
    Convert {
        /// Input file
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Find the point of highest (or lowest) intensity
    Extreme {
        /// Input file
        input: PathBuf,

        /// Look for the lowest point instead
        #[arg(long)]
        lowest: bool,

        /// Wavelength index (spectral files)
        #[arg(short, long, default_value = "0")]
        wavelength: usize,
    },

    /// Load several files concurrently and report each as it finishes
    Load {
        /// Input files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Worker threads (0 = one per core)
        #[arg(short, long, default_value = "0")]
        threads: usize,
    },
}

fn print_slice(label: &str, slice: &StatsSlice) {
    if slice.is_empty() {
        println!("{label}: no points");
        return;
    }
    println!(
        "{label}: {} points, min {:.6}, max {:.6}, average {:.6}",
        slice.points_count, slice.min_intensity, slice.max_intensity, slice.average_intensity
    );
}

fn stats_json(dataset: &Dataset) -> serde_json::Value {
    fn snapshot(stats: &PointsStats) -> serde_json::Value {
        serde_json::json!({
            "points_count": stats.points_count,
            "current": stats.current,
            "slices": stats.slices,
        })
    }
    serde_json::json!({
        "name": dataset.name(),
        "wavelength_index": dataset.wavelength_index(),
        "wavelength": dataset.wavelength_label(),
        "points": snapshot(dataset.points_stats()),
        "selection": snapshot(dataset.selection_stats()),
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Info { input } => {
            let dataset = Dataset::open(&input)?;
            let cloud = dataset.cloud();
            let metadata = cloud.metadata();

            println!("File: {}", input.display());
            println!("Name: {}", dataset.display_name());
            for (key, value) in metadata.summary() {
                println!("{}: {}", key, value);
            }
            println!("Wavelengths: {}", cloud.intensity_count());
            if metadata.is_spectral() {
                let first = metadata.wavelength_nm(0).unwrap_or_default();
                let last = metadata
                    .wavelength_nm(cloud.intensity_count() - 1)
                    .unwrap_or_default();
                println!("Wavelength range: {:.0} - {:.0} nm", first, last);
            }
            println!("Header lines: {}", metadata.raw_lines().len());
            println!("Duplicates skipped: {}", dataset.report().duplicates.len());
        }

        Commands::Stats {
            input,
            wavelength,
            selection_extreme,
            json,
        } => {
            let mut dataset = Dataset::open(&input)?;
            dataset.set_wavelength_index(wavelength)?;
            if let Some(extreme) = selection_extreme {
                dataset.select_extreme_point(extreme.into())?;
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&stats_json(&dataset))?);
            } else {
                if let Some(label) = dataset.wavelength_label() {
                    println!("Wavelength: {} (index {})", label, wavelength);
                }
                print_slice("All", &dataset.points_stats().current);
                print_slice("Selection", &dataset.selection_stats().current);
            }
        }

        Commands::Convert { input, output } => {
            let start = Instant::now();
            let mut dataset = Dataset::open(&input)?;
            dataset.save(&output)?;
            println!(
                "Wrote {} points to {} in {:.2?}",
                dataset.points_count(),
                output.display(),
                start.elapsed()
            );
            let skipped = dataset.report().duplicates.len();
            if skipped > 0 {
                println!("Dropped {} duplicate points", skipped);
            }
        }

        Commands::Extreme {
            input,
            lowest,
            wavelength,
        } => {
            let mut dataset = Dataset::open(&input)?;
            dataset.set_wavelength_index(wavelength)?;
            let extremum = if lowest {
                Extremum::Lowest
            } else {
                Extremum::Highest
            };
            match dataset.select_extreme_point(extremum)? {
                Some(index) => {
                    let cloud = dataset.cloud();
                    println!(
                        "Point {}: theta {:.6}, phi {:.6}, intensity {:.6}",
                        index,
                        cloud.theta(index),
                        cloud.phi(index),
                        cloud.intensity(index, wavelength)
                    );
                }
                None => println!("No points"),
            }
        }

        Commands::Load { inputs, threads } => {
            let start = Instant::now();
            let total = inputs.len();
            let mut queue = LoadQueue::new(LoadQueueConfig::new().with_num_threads(threads))?;
            queue.open_files(&inputs);

            let mut failed = 0usize;
            while let Some(result) = queue.recv_blocking() {
                if let Some(message) = result.error_message() {
                    eprintln!("{}", message);
                    failed += 1;
                    continue;
                }
                if let Ok(dataset) = &result.outcome {
                    println!(
                        "{}: {} points, average intensity {:.6}",
                        dataset.display_name(),
                        dataset.points_count(),
                        dataset.average_intensity()
                    );
                }
            }
            log::info!("loaded {} files in {:.2?}", total, start.elapsed());

            if failed > 0 {
                return Err(CliError::LoadFailed { failed, total });
            }
        }
    }

    Ok(())
}
