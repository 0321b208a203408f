//! # SliceKit
//!
//! Collects print parameters (layer height, infill density, print speed,
//! model rotation), writes them as a slicer configuration file and runs an
//! external slicer (PrusaSlicer by default) to turn an STL model into G-code.
//!
//! ## Architecture
//!
//! SliceKit is organized as a workspace with multiple crates:
//!
//! 1. **slicekit-core** - Job parameters, quality presets, rotation state, configuration document
//! 2. **slicekit-settings** - Settings file, environment overrides, slicer argument grammar
//! 3. **slicekit-slicer** - Slicer invocation, output choosers, slicing session
//! 4. **slicekit** - Command-line front end, native dialogs and logging

pub mod cli;
pub mod dialogs;
pub mod interactive;

pub use slicekit_core::{
    validate_and_build_config, Axis, ConfigurationDocument, JobParameters, ParameterField,
    ParameterInput, QualityMode, RotationDirection, RotationState, SliceError, ValidationError,
};
pub use slicekit_settings::{Config, SlicerSettings};
pub use slicekit_slicer::{
    status_for, FixedOutput, OutputChooser, SliceOutcome, SliceSession, SlicerInvoker,
    StatusLevel, StatusMessage,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, so stdout carries only command results
/// - RUST_LOG environment variable support (INFO and above by default)
/// - JSON lines instead of the human-readable format when `json` is set
pub fn init_logging(json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    if json {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_level(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}
