//! SliceKit Settings Crate
//!
//! Handles application configuration: where the slicer executable lives,
//! where the scratch configuration document is written, the slicer's
//! argument grammar, and the default job parameters.

pub mod config;
pub mod error;

pub use config::{
    Config, DefaultParameters, SlicerSettings, ARG_CONFIG, ARG_INPUT, ARG_OUTPUT, ENV_CONFIG_PATH,
    ENV_SLICER,
};
pub use error::{ConfigError, SettingsError, SettingsResult};
