//! Integration tests for the CSV-to-PNG pipeline

use labelplot::cli::Cli;
use labelplot::error::AppError;
use labelplot::output::FixedSuffix;
use labelplot::{render, run_with_suffixes};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn assert_png(path: &Path) {
    let bytes = fs::read(path).expect("output should exist");
    assert!(bytes.len() > PNG_SIGNATURE.len());
    assert_eq!(&bytes[..8], PNG_SIGNATURE);
}

fn cli(input: &Path, output: &Path) -> Cli {
    Cli {
        input_csv_path: input.to_path_buf(),
        output_image_path: output.to_path_buf(),
        debug: false,
    }
}

#[test]
fn test_writes_png_and_creates_parent() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("out").join("plot.png");

    render(&fixture("words.csv"), &out).expect("Should render");

    assert!(tmp.path().join("out").is_dir());
    assert_png(&out);
}

#[test]
fn test_columns_are_found_by_name() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("shuffled.png");

    render(&fixture("shuffled_columns.csv"), &out).expect("Should render");
    assert_png(&out);
}

#[test]
fn test_too_few_columns_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("plot.png");

    let err = render(&fixture("two_columns.csv"), &out).unwrap_err();
    assert!(matches!(err, AppError::TooFewColumns(2)));
    assert_eq!(
        err.to_string(),
        "CSV file must have at least three columns: String, Dim1, Dim2."
    );
    assert!(!out.exists());
}

#[test]
fn test_non_numeric_coordinates_write_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("plot.png");

    let err = render(&fixture("non_numeric.csv"), &out).unwrap_err();
    assert!(matches!(err, AppError::Polars(_)));
    assert!(!out.exists());
}

#[test]
fn test_missing_input_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("plot.png");

    let err = render(&tmp.path().join("nope.csv"), &out).unwrap_err();
    assert!(matches!(err, AppError::InputNotFound(_)));
    assert!(!out.exists());
}

#[test]
fn test_directory_target_gets_generated_name() {
    let tmp = tempfile::tempdir().unwrap();

    let written = run_with_suffixes(
        &cli(&fixture("words.csv"), tmp.path()),
        &mut FixedSuffix(42),
    )
    .expect("Should render");

    assert_eq!(written, tmp.path().join("scatter_plot.png42"));
    assert_png(&written);
}

#[test]
fn test_same_input_to_two_paths() {
    let tmp = tempfile::tempdir().unwrap();
    let first = tmp.path().join("first.png");
    let second = tmp.path().join("second.png");

    render(&fixture("words.csv"), &first).unwrap();
    render(&fixture("words.csv"), &second).unwrap();

    assert_png(&first);
    assert_png(&second);
}

#[test]
fn test_late_float_and_late_text_label_after_many_integer_rows() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("long.csv");
    let mut csv = String::from("String,Dim1,Dim2\n");
    for i in 0..150 {
        csv.push_str(&format!("{i},{i},{i}\n"));
    }
    csv.push_str("late,0.5,0.5\n");
    fs::write(&input, csv).unwrap();

    let out = tmp.path().join("long.png");
    render(&input, &out).expect("Should render");
    assert_png(&out);
}
