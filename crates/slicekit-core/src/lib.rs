//! # SliceKit Core
//!
//! Core types for SliceKit: the job parameters a user edits, the rotation
//! state accumulated from orientation actions, and the configuration
//! document handed to the external slicer.

pub mod config_doc;
pub mod error;
pub mod params;
pub mod rotation;

pub use config_doc::{format_real, validate_and_build_config, ConfigEntry, ConfigurationDocument};
pub use error::{Result, SliceError, ValidationError};
pub use params::{JobParameters, ParameterField, ParameterInput, QualityMode};
pub use rotation::{Axis, RotationDirection, RotationState, QUARTER_TURN};
