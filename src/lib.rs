//! Stagecoord: stage coordinates from point annotations on microscopy images.
//!
//! Stagecoord resolves a selection of images (directly, or through the
//! datasets that contain them), reads the pixel-to-stage conversion matrix
//! from each image's acquisition metadata, and reports the physical stage
//! position of every point annotation in micrometers. Two companion
//! commands overwrite calibration fields of the same selections.
//!
//! # Modules
//!
//! - [`model`]: Store object types (Image, Dataset, Roi, Shape, etc.)
//! - [`store`]: The object store interface and its in-memory backend
//! - [`select`]: Resolving identifiers to the images to process
//! - [`metadata`]: Acquisition metadata maps
//! - [`transform`]: Conversion matrix parsing and pixel-to-stage mapping
//! - [`geometry`]: Point annotation extraction
//! - [`calculate`]: The stage coordinate batch and its report
//! - [`fix`]: Pixel size and min/max overwrite batches
//! - [`error`]: Error types for stagecoord operations

pub mod batch;
pub mod calculate;
pub mod error;
pub mod fix;
pub mod geometry;
pub mod metadata;
pub mod model;
pub mod select;
pub mod store;
pub mod transform;

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

pub use batch::BatchOutcome;
pub use error::{ImageError, StageError};

use calculate::StageReport;
use fix::{FixReport, DEFAULT_PIXEL_SIZE_NM};
use model::Length;
use store::snapshot::{read_snapshot, write_snapshot};
use store::MemoryStore;

/// The stagecoord CLI application.
#[derive(Parser)]
#[command(name = "stagecoord")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Calculate stage coordinates of point annotations, in micrometers.
    StageCoords(StageCoordsArgs),
    /// Set the physical pixel size of images.
    FixPixelSize(FixPixelSizeArgs),
    /// Copy the 'Min'/'Max' metadata into the global range of channel 0.
    FixMinMax(SelectionArgs),
}

/// Which images to process, and where they are stored.
#[derive(clap::Args)]
struct SelectionArgs {
    /// Store snapshot file (JSON, or YAML with a .yaml/.yml extension).
    #[arg(long, env = "STAGECOORD_STORE")]
    store: PathBuf,

    /// Pick images by 'Image' ID or by the ID of their 'Dataset'.
    #[arg(long = "data-type", default_value = "Image")]
    data_type: String,

    /// Comma-separated list of Image or Dataset IDs to process.
    #[arg(
        long,
        value_delimiter = ',',
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    ids: Vec<u64>,
}

/// Arguments for the stage-coords subcommand.
#[derive(clap::Args)]
struct StageCoordsArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Output format for the report ('text', 'json', or 'csv').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the fix-pixel-size subcommand.
#[derive(clap::Args)]
struct FixPixelSizeArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Pixel size to set, in nanometers.
    #[arg(long = "size-nm", default_value_t = DEFAULT_PIXEL_SIZE_NM)]
    size_nm: f64,
}

/// Report output formats of the stage-coords subcommand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

impl OutputFormat {
    fn parse(s: &str) -> Result<Self, StageError> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(StageError::UnsupportedOutput(format!(
                "'{}' (supported: text, json, csv)",
                other
            ))),
        }
    }
}

/// Run the stagecoord CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), StageError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::StageCoords(args)) => run_stage_coords(args),
        Some(Commands::FixPixelSize(args)) => run_fix_pixel_size(args),
        Some(Commands::FixMinMax(args)) => run_fix_min_max(args),
        None => {
            println!("stagecoord {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Stage coordinates from point annotations on microscopy images.");
            println!();
            println!("Run 'stagecoord --help' for usage information.");
            Ok(())
        }
    }
}

/// Install the tracing subscriber used by the binary.
///
/// Log output goes to stderr, filtered by `RUST_LOG` (default `warn`).
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Execute the stage-coords subcommand.
fn run_stage_coords(args: StageCoordsArgs) -> Result<(), StageError> {
    let format = OutputFormat::parse(&args.output)?;
    let selection = args.selection;
    let store = MemoryStore::new(read_snapshot(&selection.store)?);

    let outcome =
        calculate::calculate_stage_coordinates(&store, &selection.data_type, &selection.ids)?;

    match format {
        OutputFormat::Text => {
            if let Some(report) = outcome.report() {
                print!("{}", report);
            }
            println!("{}", outcome.message());
        }
        OutputFormat::Json => {
            let output = StageOutput {
                message: outcome.message(),
                report: outcome.report(),
            };
            let json = serde_json::to_string_pretty(&output).map_err(StageError::ReportJson)?;
            println!("{}", json);
        }
        OutputFormat::Csv => {
            if let Some(report) = outcome.report() {
                let mut writer = csv::Writer::from_writer(io::stdout());
                for row in report.rows() {
                    writer.serialize(row)?;
                }
                writer.flush()?;
            }
            // stdout holds only the table.
            eprintln!("{}", outcome.message());
        }
    }

    Ok(())
}

/// JSON document printed by `stage-coords --output json`.
#[derive(Serialize)]
struct StageOutput<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a StageReport>,
}

/// Execute the fix-pixel-size subcommand.
fn run_fix_pixel_size(args: FixPixelSizeArgs) -> Result<(), StageError> {
    let size = Length::nanometers(args.size_nm);
    run_fix_command(args.selection, |store, data_type, ids| {
        fix::fix_pixel_size(store, data_type, ids, size)
    })
}

/// Execute the fix-min-max subcommand.
fn run_fix_min_max(args: SelectionArgs) -> Result<(), StageError> {
    run_fix_command(args, fix::fix_min_max)
}

/// Load the snapshot, run an overwrite batch, and save the snapshot back if
/// anything changed.
fn run_fix_command<F>(selection: SelectionArgs, fix: F) -> Result<(), StageError>
where
    F: FnOnce(&mut MemoryStore, &str, &[u64]) -> Result<BatchOutcome<FixReport>, StageError>,
{
    let mut store = MemoryStore::new(read_snapshot(&selection.store)?);
    let outcome = fix(&mut store, &selection.data_type, &selection.ids)?;

    if let Some(report) = outcome.report() {
        if report.updated_count() > 0 {
            write_snapshot(&selection.store, store.snapshot())?;
        }
        print!("{}", report);
    }
    println!("{}", outcome.message());
    io::stdout().flush()?;
    Ok(())
}
