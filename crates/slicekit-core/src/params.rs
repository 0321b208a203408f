//! Job parameters
//!
//! The three numeric print settings a user edits (layer height, infill
//! density, print speed), both as raw field text and as validated values,
//! plus the named quality presets that fill all three at once.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Inclusive bounds for infill density, in percent
pub const INFILL_DENSITY_RANGE: (i64, i64) = (0, 100);

/// One of the editable job parameter fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterField {
    /// Layer height in millimeters
    LayerHeight,
    /// Infill density in percent
    InfillDensity,
    /// Print speed in mm/s
    PrintSpeed,
}

impl ParameterField {
    /// All fields in document order
    pub const ALL: [ParameterField; 3] = [
        ParameterField::LayerHeight,
        ParameterField::InfillDensity,
        ParameterField::PrintSpeed,
    ];

    /// Key written to the slicer configuration document
    pub fn config_key(&self) -> &'static str {
        match self {
            Self::LayerHeight => "layer_height",
            Self::InfillDensity => "fill_density",
            Self::PrintSpeed => "speed_print",
        }
    }

    /// Display unit
    pub fn unit(&self) -> &'static str {
        match self {
            Self::LayerHeight => "mm",
            Self::InfillDensity => "%",
            Self::PrintSpeed => "mm/s",
        }
    }
}

impl fmt::Display for ParameterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LayerHeight => write!(f, "Layer height"),
            Self::InfillDensity => write!(f, "Infill density"),
            Self::PrintSpeed => write!(f, "Print speed"),
        }
    }
}

impl FromStr for ParameterField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "layer_height" | "layer" | "height" => Ok(Self::LayerHeight),
            "infill_density" | "fill_density" | "infill" | "density" => Ok(Self::InfillDensity),
            "print_speed" | "speed_print" | "speed" => Ok(Self::PrintSpeed),
            _ => Err(format!("Unknown parameter: {}", s)),
        }
    }
}

/// Validated job parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JobParameters {
    /// Layer height in millimeters, > 0
    pub layer_height: f64,
    /// Infill density in percent, 0..=100
    pub infill_density: u8,
    /// Print speed in mm/s, > 0
    pub print_speed: f64,
}

impl Default for JobParameters {
    fn default() -> Self {
        Self {
            layer_height: 0.2,
            infill_density: 20,
            print_speed: 60.0,
        }
    }
}

impl JobParameters {
    /// Check the numeric invariants on already-typed values
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_positive(ParameterField::LayerHeight, self.layer_height)?;
        ensure_density(i64::from(self.infill_density))?;
        ensure_positive(ParameterField::PrintSpeed, self.print_speed)?;
        Ok(())
    }
}

/// Raw text of the parameter fields, as the user typed it
///
/// Text is only parsed when a configuration document is built, so a field
/// can hold anything in between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterInput {
    pub layer_height: String,
    pub infill_density: String,
    pub print_speed: String,
}

impl Default for ParameterInput {
    fn default() -> Self {
        Self::from_parameters(&JobParameters::default())
    }
}

impl From<JobParameters> for ParameterInput {
    fn from(params: JobParameters) -> Self {
        Self::from_parameters(&params)
    }
}

impl ParameterInput {
    /// Create field text from typed parameters
    pub fn from_parameters(params: &JobParameters) -> Self {
        Self {
            layer_height: params.layer_height.to_string(),
            infill_density: params.infill_density.to_string(),
            print_speed: params.print_speed.to_string(),
        }
    }

    /// Current text of a field
    pub fn get(&self, field: ParameterField) -> &str {
        match field {
            ParameterField::LayerHeight => &self.layer_height,
            ParameterField::InfillDensity => &self.infill_density,
            ParameterField::PrintSpeed => &self.print_speed,
        }
    }

    /// Replace the text of a field
    pub fn set(&mut self, field: ParameterField, text: impl Into<String>) {
        let text = text.into();
        match field {
            ParameterField::LayerHeight => self.layer_height = text,
            ParameterField::InfillDensity => self.infill_density = text,
            ParameterField::PrintSpeed => self.print_speed = text,
        }
    }

    /// Overwrite all fields from a quality preset
    ///
    /// Returns false for [`QualityMode::Custom`], which leaves the fields alone.
    pub fn apply_quality(&mut self, mode: QualityMode) -> bool {
        match mode.preset() {
            Some(params) => {
                *self = Self::from_parameters(&params);
                true
            }
            None => false,
        }
    }

    /// Parse and validate every field
    pub fn parse(&self) -> Result<JobParameters, ValidationError> {
        let layer_height = parse_real(ParameterField::LayerHeight, &self.layer_height)?;
        let infill_density = parse_density(&self.infill_density)?;
        let print_speed = parse_real(ParameterField::PrintSpeed, &self.print_speed)?;

        Ok(JobParameters {
            layer_height,
            infill_density,
            print_speed,
        })
    }
}

fn parse_real(field: ParameterField, text: &str) -> Result<f64, ValidationError> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidNumber {
            field,
            value: text.to_string(),
        })?;
    ensure_positive(field, value)?;
    Ok(value)
}

fn parse_density(text: &str) -> Result<u8, ValidationError> {
    let field = ParameterField::InfillDensity;
    let value: i64 = text
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidInteger {
            field,
            value: text.to_string(),
        })?;
    ensure_density(value)?;
    // In range 0..=100, so the narrowing cannot fail.
    u8::try_from(value).map_err(|_| ValidationError::OutOfRange {
        field,
        value,
        min: INFILL_DENSITY_RANGE.0,
        max: INFILL_DENSITY_RANGE.1,
    })
}

fn ensure_positive(field: ParameterField, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NotPositive { field, value })
    }
}

fn ensure_density(value: i64) -> Result<(), ValidationError> {
    let (min, max) = INFILL_DENSITY_RANGE;
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: ParameterField::InfillDensity,
            value,
            min,
            max,
        })
    }
}

/// Print quality preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityMode {
    /// Keep whatever the user entered
    #[default]
    Custom,
    /// Thick layers, sparse infill, fast
    Draft,
    /// Balanced defaults
    Normal,
    /// Thin layers, denser infill, slow
    HighQuality,
}

impl QualityMode {
    /// All modes in menu order
    pub const ALL: [QualityMode; 4] = [
        QualityMode::Custom,
        QualityMode::Draft,
        QualityMode::Normal,
        QualityMode::HighQuality,
    ];

    /// Parameters this mode sets, `None` for Custom
    pub fn preset(&self) -> Option<JobParameters> {
        match self {
            Self::Custom => None,
            Self::Draft => Some(JobParameters {
                layer_height: 0.3,
                infill_density: 10,
                print_speed: 80.0,
            }),
            Self::Normal => Some(JobParameters::default()),
            Self::HighQuality => Some(JobParameters {
                layer_height: 0.1,
                infill_density: 30,
                print_speed: 40.0,
            }),
        }
    }
}

impl fmt::Display for QualityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom => write!(f, "Custom"),
            Self::Draft => write!(f, "Draft"),
            Self::Normal => write!(f, "Normal"),
            Self::HighQuality => write!(f, "High Quality"),
        }
    }
}

impl FromStr for QualityMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect();
        match normalized.as_str() {
            "custom" => Ok(Self::Custom),
            "draft" => Ok(Self::Draft),
            "normal" => Ok(Self::Normal),
            "highquality" | "high" | "hq" => Ok(Self::HighQuality),
            _ => Err(format!("Unknown quality mode: {}", s)),
        }
    }
}
