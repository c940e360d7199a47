//! The main library for the `labelplot` application.
//!
//! This crate turns a CSV file with `String`, `Dim1` and `Dim2` columns into a
//! PNG scatter plot where every point carries its label. The flow is a single
//! pass: resolve the output path, load the CSV, validate and extract the
//! columns, draw, then write the image.
//!
//! The library is structured into several modules:
//! - `cli`: Defines the command-line interface.
//! - `output`: Output path resolution and directory creation.
//! - `data_loader`: Reads the CSV into a DataFrame.
//! - `processing`: Validates the frame and extracts labelled points.
//! - `plotter`: Draws the chart and encodes it as PNG.
//! - `glyph_backend`: Font-independent text rendering for the plotter.
//! - `error`: Defines the application's custom error type.

use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub mod cli;
pub mod data_loader;
pub mod error;
pub mod glyph_backend;
pub mod output;
pub mod plotter;
pub mod processing;

use crate::cli::Cli;
use crate::error::AppError;
use crate::output::{RandomSuffix, SuffixSource};
use crate::plotter::PlotStyle;

/// The main entry point for the application logic.
///
/// Resolves the output target (substituting a generated file name when the
/// target is a directory), then renders the plot.
///
/// # Returns
///
/// The path the image was written to.
///
/// # Errors
///
/// Returns an error if loading, validation, rendering or writing fails.
pub fn run(cli: &Cli) -> Result<PathBuf, AppError> {
    run_with_suffixes(cli, &mut RandomSuffix)
}

/// Same as `run`, with the default file name suffix drawn from `suffixes`.
pub fn run_with_suffixes(
    cli: &Cli,
    suffixes: &mut impl SuffixSource,
) -> Result<PathBuf, AppError> {
    let resolved = output::resolve_output_path(&cli.output_image_path, suffixes);
    if resolved.substituted {
        println!(
            "Output path is a directory, adding default file name: {}",
            resolved.path.display()
        );
    }

    render_pipeline(&cli.input_csv_path, &resolved.path, cli.debug)?;
    Ok(resolved.path)
}

/// Renders the labelled scatter plot of `input_path` into `output_path`.
///
/// 1. Creates the parent directory of `output_path` if needed.
/// 2. Loads the CSV and checks it has the `String`, `Dim1` and `Dim2` columns.
/// 3. Draws the chart in memory.
/// 4. Writes the PNG. Nothing is written if any earlier step failed.
///
/// # Errors
///
/// Returns an error if any step fails. The error is never printed here.
pub fn render(input_path: &Path, output_path: &Path) -> Result<(), AppError> {
    render_pipeline(input_path, output_path, false)
}

fn render_pipeline(input_path: &Path, output_path: &Path, debug: bool) -> Result<(), AppError> {
    if let Some(dir) = output::ensure_parent_dir(output_path)? {
        println!("Created directory: {}", dir.display());
    }

    let df = data_loader::load_dataframe(input_path)?;
    if debug {
        describe_frame(&df);
    }
    let plot_data = processing::prepare_plot_data(&df)?;
    drop(df);

    if plot_data.skipped_rows > 0 {
        warn!(
            skipped = plot_data.skipped_rows,
            "some rows were not plotted"
        );
    }

    let image = plotter::render_scatter(&plot_data, &PlotStyle::default())?;
    plotter::save_png(&image, output_path)?;

    info!(path = %output_path.display(), points = plot_data.points.len(), "plot written");
    Ok(())
}

/// Prints the detected columns and shape of the input, for `--debug`.
fn describe_frame(df: &DataFrame) {
    println!("  -> Detected columns:");
    for s in df.get_columns() {
        println!("     - {}: {:?}", s.name(), s.dtype());
    }
    println!("  -> Shape: {} rows x {} cols", df.height(), df.width());
}
