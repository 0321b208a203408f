//! Error handling for SliceKit
//!
//! Provides the error taxonomy of a slicing attempt:
//! - Validation errors (parameter text that does not parse or is out of range)
//! - Missing input (no model selected)
//! - Slicer errors (configuration write, spawn, non-zero exit, timeout)
//!
//! Cancelling the output chooser is not an error and has no variant here.
//! All error types use `thiserror` for ergonomic error handling.

use crate::params::ParameterField;
use std::path::PathBuf;
use thiserror::Error;

/// Validation error type
///
/// Raised while turning the user's parameter text into a configuration
/// document. Nothing is written and no process is started when one occurs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Field text is not a real number
    #[error("{field} must be a number, got '{value}'")]
    InvalidNumber {
        /// The offending field.
        field: ParameterField,
        /// The text as entered.
        value: String,
    },

    /// Field text is not a whole number
    #[error("{field} must be a whole number, got '{value}'")]
    InvalidInteger {
        /// The offending field.
        field: ParameterField,
        /// The text as entered.
        value: String,
    },

    /// Integer field outside its inclusive range
    #[error("{field} out of range: {value} (valid: {min}..={max})")]
    OutOfRange {
        /// The offending field.
        field: ParameterField,
        /// The parsed value.
        value: i64,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },

    /// Real field that must be strictly positive and finite
    #[error("{field} must be greater than zero, got {value}")]
    NotPositive {
        /// The offending field.
        field: ParameterField,
        /// The parsed value.
        value: f64,
    },
}

impl ValidationError {
    /// The field this error refers to
    pub fn field(&self) -> ParameterField {
        match self {
            Self::InvalidNumber { field, .. }
            | Self::InvalidInteger { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::NotPositive { field, .. } => *field,
        }
    }
}

/// Main error type for a slicing attempt
#[derive(Error, Debug)]
pub enum SliceError {
    /// Parameter validation failed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No source model has been selected
    #[error("No input model selected")]
    NoInputSelected,

    /// The configuration document could not be written or read back
    #[error("Failed to write slicer configuration {}: {source}", path.display())]
    ConfigWrite {
        /// Scratch path of the configuration document.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The slicer executable could not be started
    #[error("Failed to start slicer {}: {source}", program.display())]
    SpawnFailed {
        /// The executable that was launched.
        program: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The slicer ran and exited unsuccessfully
    #[error("Slicer exited with {}{}", describe_code(*code), describe_stderr(stderr))]
    ProcessFailed {
        /// Exit code, `None` when terminated by a signal.
        code: Option<i32>,
        /// Captured standard error of the slicer.
        stderr: String,
    },

    /// The slicer did not finish within the configured timeout
    #[error("Slicer timed out after {timeout_secs}s")]
    Timeout {
        /// The configured timeout in seconds.
        timeout_secs: u64,
    },
}

fn describe_code(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

fn describe_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

impl SliceError {
    /// Check if this is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(self, SliceError::Validation(_))
    }

    /// Check if this error came from running the external slicer
    pub fn is_slicer_error(&self) -> bool {
        matches!(
            self,
            SliceError::ConfigWrite { .. }
                | SliceError::SpawnFailed { .. }
                | SliceError::ProcessFailed { .. }
                | SliceError::Timeout { .. }
        )
    }
}

/// Result type using SliceError
pub type Result<T> = std::result::Result<T, SliceError>;
