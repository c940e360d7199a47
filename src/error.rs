use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("CSV file '{0}' not found")]
    InputNotFound(PathBuf),

    #[error("CSV file must have at least three columns: String, Dim1, Dim2.")]
    TooFewColumns(usize),

    #[error("Column '{0}' not found in the data")]
    ColumnNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data processing error (Polars): {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("Drawing error: {0}")]
    Drawing(String),

    #[error("Failed to encode PNG: {0}")]
    Image(#[from] image::ImageError),
}
