//! Output path handling: default file names for directory targets and parent
//! directory creation.

use crate::error::AppError;
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Base file name used when the output target is a directory.
pub const DEFAULT_FILE_NAME: &str = "scatter_plot.png";

/// Source of the numeric suffix appended to generated file names.
pub trait SuffixSource {
    fn next_suffix(&mut self) -> u8;
}

/// Draws suffixes from the thread-local RNG.
#[derive(Debug, Default)]
pub struct RandomSuffix;

impl SuffixSource for RandomSuffix {
    fn next_suffix(&mut self) -> u8 {
        rand::thread_rng().gen_range(0..=u8::MAX)
    }
}

/// Always yields the same suffix.
#[derive(Debug, Clone, Copy)]
pub struct FixedSuffix(pub u8);

impl SuffixSource for FixedSuffix {
    fn next_suffix(&mut self) -> u8 {
        self.0
    }
}

/// The path an image will actually be written to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOutput {
    pub path: PathBuf,
    /// True if `path` was generated because the requested target was a directory.
    pub substituted: bool,
}

/// Resolves the requested output path.
///
/// A path naming an existing directory becomes `<dir>/scatter_plot.png<N>`
/// with `N` taken from `suffixes`. The number follows the extension, so the
/// generated name has no `.png` extension of its own. Any other path is used
/// as is.
pub fn resolve_output_path(requested: &Path, suffixes: &mut impl SuffixSource) -> ResolvedOutput {
    if requested.is_dir() {
        let name = format!("{}{}", DEFAULT_FILE_NAME, suffixes.next_suffix());
        ResolvedOutput {
            path: requested.join(name),
            substituted: true,
        }
    } else {
        ResolvedOutput {
            path: requested.to_path_buf(),
            substituted: false,
        }
    }
}

/// Creates the parent directory of `output` if it is missing.
///
/// Returns the directory when it had to be created, `None` when it already
/// existed or `output` has no parent component.
pub fn ensure_parent_dir(output: &Path) -> Result<Option<PathBuf>, AppError> {
    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => return Ok(None),
    };

    if parent.exists() {
        return Ok(None);
    }

    fs::create_dir_all(parent)?;
    debug!(dir = %parent.display(), "created output directory");
    Ok(Some(parent.to_path_buf()))
}
