use crate::error::AppError;
use polars::prelude::*;
use std::path::Path;
use tracing::debug;

/// Loads a CSV file into a Polars DataFrame, using the first row as the header.
pub fn load_dataframe(path: &Path) -> Result<DataFrame, AppError> {
    if !path.is_file() {
        return Err(AppError::InputNotFound(path.to_path_buf()));
    }

    // Infer column types from every row, not just the leading sample, so a late
    // `0.5` in an integer-looking column or a late word in a numeric-looking
    // label column does not fail the parse
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
        .map_err(AppError::from)?;

    debug!(
        path = %path.display(),
        rows = df.height(),
        cols = df.width(),
        "loaded csv"
    );
    Ok(df)
}
