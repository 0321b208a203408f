//! Output destination selection
//!
//! The front end decides how an output path is obtained (flag, prompt,
//! native dialog). The session only sees "a path or nothing"; nothing means
//! the user cancelled.

use std::path::{Path, PathBuf};

/// Extension given to output paths chosen without one
pub const GCODE_EXTENSION: &str = "gcode";

/// Source of the output G-code path
pub trait OutputChooser {
    /// Ask for an output path, `None` when the user cancels
    fn choose_output(&mut self) -> Option<PathBuf>;
}

impl<F> OutputChooser for F
where
    F: FnMut() -> Option<PathBuf>,
{
    fn choose_output(&mut self) -> Option<PathBuf> {
        self()
    }
}

/// A path decided up front, e.g. from a command-line flag
#[derive(Debug, Clone, Default)]
pub struct FixedOutput(pub Option<PathBuf>);

impl FixedOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(Some(path.into()))
    }
}

impl OutputChooser for FixedOutput {
    fn choose_output(&mut self) -> Option<PathBuf> {
        self.0.clone()
    }
}

/// Append `.gcode` when the chosen path has no extension
pub fn with_default_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(GCODE_EXTENSION)
    }
}
