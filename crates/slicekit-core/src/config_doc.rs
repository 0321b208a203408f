//! Slicer configuration document
//!
//! Builds the `key = value` text the external slicer loads with `--load`.
//! Lines are always emitted in the same order: `layer_height`,
//! `fill_density` (suffixed with `%`), `speed_print`, then `rotate_x`,
//! `rotate_y`, `rotate_z`.
//!
//! Reals are written in shortest round-trip form with at least one
//! fractional digit (`0.2`, `60.0`), so the output is byte-stable for a
//! given input.

use crate::error::ValidationError;
use crate::params::{JobParameters, ParameterField, ParameterInput};
use crate::rotation::RotationState;
use std::fmt;

/// A single `key = value` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
}

impl ConfigEntry {
    fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for ConfigEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.key, self.value)
    }
}

/// Ordered configuration document handed to the slicer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationDocument {
    entries: Vec<ConfigEntry>,
}

impl ConfigurationDocument {
    /// Build the document from validated parameters and rotations
    pub fn from_parameters(params: &JobParameters, rotations: &RotationState) -> Self {
        let mut entries = vec![
            ConfigEntry::new(
                ParameterField::LayerHeight.config_key(),
                format_real(params.layer_height),
            ),
            ConfigEntry::new(
                ParameterField::InfillDensity.config_key(),
                format!("{}%", params.infill_density),
            ),
            ConfigEntry::new(
                ParameterField::PrintSpeed.config_key(),
                format_real(params.print_speed),
            ),
        ];

        for (axis, angle) in rotations.iter() {
            entries.push(ConfigEntry::new(
                format!("rotate_{}", axis.key()),
                angle.to_string(),
            ));
        }

        Self { entries }
    }

    /// Entries in document order
    pub fn entries(&self) -> &[ConfigEntry] {
        &self.entries
    }

    /// Value for a key, if present
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }

    /// Rendered lines without terminators
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    /// Full document text, one newline-terminated line per entry
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ConfigurationDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

/// Validate the parameter text and build the configuration document
///
/// Pure: nothing is written. Any parse failure or out-of-range value is
/// returned as a [`ValidationError`] and no document is produced.
pub fn validate_and_build_config(
    input: &ParameterInput,
    rotations: &RotationState,
) -> Result<ConfigurationDocument, ValidationError> {
    let params = input.parse()?;
    tracing::debug!(?params, ?rotations, "Building slicer configuration");
    Ok(ConfigurationDocument::from_parameters(&params, rotations))
}

/// Format a real in shortest round-trip form, keeping a fractional digit
pub fn format_real(value: f64) -> String {
    let text = format!("{:?}", value);
    if text.contains(['.', 'e', 'E']) || !value.is_finite() {
        text
    } else {
        format!("{}.0", text)
    }
}
