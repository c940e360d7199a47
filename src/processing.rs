//! This module handles validation and extraction of the plotted columns.
//!
//! It takes a raw DataFrame, checks that it has the expected shape, and pulls
//! the label, `Dim1` and `Dim2` columns out by name. Each row becomes one
//! `LabelledPoint`, so a label can never drift away from its coordinates.

use crate::error::AppError;
use polars::prelude::*;
use std::ops::Range;
use tracing::warn;

/// Column holding the text drawn next to each point.
pub const LABEL_COLUMN: &str = "String";
/// Column used for the X-axis.
pub const X_COLUMN: &str = "Dim1";
/// Column used for the Y-axis.
pub const Y_COLUMN: &str = "Dim2";

/// Minimum number of columns an input must have.
pub const MIN_COLUMNS: usize = 3;

/// One row of the input, ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledPoint {
    pub label: String,
    pub x: f64,
    pub y: f64,
}

/// A container for everything the plotter needs.
///
/// This struct is the output of `prepare_plot_data` and the input of the `plotter` module.
#[derive(Debug, Clone)]
pub struct PlotData {
    /// Points in file order.
    pub points: Vec<LabelledPoint>,
    /// Number of input rows dropped because a coordinate was missing or not finite.
    pub skipped_rows: usize,
}

/// Validates the DataFrame and extracts the labelled points.
///
/// Columns are looked up by name; their position and any extra columns are irrelevant.
///
/// # Errors
///
/// * `AppError::TooFewColumns` if the frame has fewer than three columns.
/// * `AppError::ColumnNotFound` if `String`, `Dim1` or `Dim2` is absent.
/// * `AppError::Polars` if a coordinate column holds values that are not numbers.
pub fn prepare_plot_data(df: &DataFrame) -> Result<PlotData, AppError> {
    if df.width() < MIN_COLUMNS {
        return Err(AppError::TooFewColumns(df.width()));
    }

    let labels = required_column(df, LABEL_COLUMN)?.cast(&DataType::String)?;
    let xs = numeric_column(df, X_COLUMN)?;
    let ys = numeric_column(df, Y_COLUMN)?;

    let mut points = Vec::with_capacity(df.height());
    let mut skipped_rows = 0;

    for (row, ((label, x), y)) in labels
        .str()?
        .into_iter()
        .zip(xs.f64()?.into_iter())
        .zip(ys.f64()?.into_iter())
        .enumerate()
    {
        match (x, y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => points.push(LabelledPoint {
                label: label.unwrap_or_default().to_string(),
                x,
                y,
            }),
            _ => {
                // Row numbers are 1-based and skip the header, to match what an editor shows
                warn!(row = row + 2, "skipping row without finite Dim1/Dim2 values");
                skipped_rows += 1;
            }
        }
    }

    Ok(PlotData {
        points,
        skipped_rows,
    })
}

fn required_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series, AppError> {
    df.column(name)
        .map_err(|_| AppError::ColumnNotFound(name.to_string()))
}

/// Casts a coordinate column to `Float64`. Text that does not parse is an error, not a null.
fn numeric_column(df: &DataFrame, name: &str) -> Result<Series, AppError> {
    let series = required_column(df, name)?;
    Ok(series.strict_cast(&DataType::Float64)?)
}

impl PlotData {
    /// X-axis range covering every point, padded by 5% on each side.
    pub fn x_range(&self) -> Range<f64> {
        padded_range(self.points.iter().map(|p| p.x))
    }

    /// Y-axis range covering every point, padded by 5% on each side.
    pub fn y_range(&self) -> Range<f64> {
        padded_range(self.points.iter().map(|p| p.y))
    }
}

fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    if (max - min).abs() < f64::EPSILON {
        return (min - 0.5)..(max + 0.5);
    }

    let pad = (max - min) * 0.05;
    (min - pad)..(max + pad)
}
