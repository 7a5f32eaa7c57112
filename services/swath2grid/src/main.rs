//! Swath-to-grid conversion CLI.
//!
//! Converts a directory of swath products (per-pixel lat/lon geolocation)
//! into regularly gridded GeoTIFF rasters, one file per (scene, layer,
//! mode). Pre-gridded product families pass through with their embedded
//! georeferencing.

mod pipeline;
mod scenes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use swath_common::OutputMode;
use swath_grid::ResampleConfig;

#[derive(Parser, Debug)]
#[command(name = "swath2grid")]
#[command(about = "Convert swath products to gridded GeoTIFF rasters")]
struct Args {
    /// Output projection: UTM or GEO
    output_projection: String,

    /// Input directory containing .h5 scenes, ending in a path separator
    input_directory: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("error: failed to initialize logging");
        return ExitCode::FAILURE;
    }

    let (mode, input_dir) = match validate_args(&args) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::from(2);
        }
    };

    match run(mode, &input_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "run failed");
            ExitCode::FAILURE
        }
    }
}

/// Validate the positional arguments; any failure here is an argument
/// error (exit code 2), not a processing failure.
fn validate_args(args: &Args) -> std::result::Result<(OutputMode, PathBuf), String> {
    if args.input_directory.contains('\'')
        || args.input_directory.contains('"')
        || args.output_projection.contains('\'')
        || args.output_projection.contains('"')
    {
        return Err("do not include quotes in the arguments".to_string());
    }

    let mode: OutputMode = args
        .output_projection
        .parse()
        .map_err(|e: swath_common::mode::ModeParseError| e.to_string())?;

    if !args.input_directory.ends_with('/') && !args.input_directory.ends_with('\\') {
        return Err("input_directory must end with a path separator".to_string());
    }
    let input_dir = PathBuf::from(&args.input_directory);
    if !input_dir.is_dir() {
        return Err("input_directory provided does not exist or was not found".to_string());
    }

    Ok((mode, input_dir))
}

fn run(mode: OutputMode, input_dir: &Path) -> Result<()> {
    // Without the container backend no scene can be opened; fail the run
    // up front instead of warning once per scene and exiting 0.
    if cfg!(not(feature = "netcdf")) {
        anyhow::bail!(
            "built without the netcdf feature, cannot open .h5 containers; \
             rebuild with --features netcdf"
        );
    }

    let config = ResampleConfig::from_env();
    config
        .validate()
        .context("invalid resample configuration")?;

    let scenes = scenes::scan(input_dir)?;
    if scenes.is_empty() {
        info!("no scenes found, nothing to do");
        return Ok(());
    }

    let out_dir = input_dir.join("output");
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    info!(
        scenes = scenes.len(),
        mode = %mode,
        output = %out_dir.display(),
        "starting batch"
    );

    let total = scenes.len();
    let counter = AtomicUsize::new(0);
    scenes.par_iter().for_each(|scene| {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        info!("Processing: {} ({} of {})", scene.name, n, total);
        if let Err(e) = pipeline::process_scene_file(scene, mode, &config, &out_dir) {
            warn!(scene = %scene.name, error = %e, "skipping scene");
        }
    });

    Ok(())
}
