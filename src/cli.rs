use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render a labelled scatter plot of the String/Dim1/Dim2 columns of a CSV file as a PNG.",
    override_usage = "labelplot <input_csv_path> <output_image_path>",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// The CSV file to plot. Must contain `String`, `Dim1` and `Dim2` columns.
    #[arg(value_name = "input_csv_path")]
    pub input_csv_path: PathBuf,

    /// Where to write the PNG.
    /// If this is an existing directory, a default file name is generated inside it.
    #[arg(value_name = "output_image_path")]
    pub output_image_path: PathBuf,

    /// Print debug info about detected columns and types
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}
