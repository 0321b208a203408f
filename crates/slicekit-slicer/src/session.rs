//! Slicing session
//!
//! Everything a user sets up before slicing: the selected model, the text
//! of the parameter fields, the quality mode and the accumulated rotations.
//! Each action returns a [`StatusMessage`]; [`SliceSession::slice`] runs the
//! linear flow
//!
//! select input -> validate -> choose output -> write config -> invoke
//!
//! and stops at the first step that fails. Errors never escape
//! [`SliceSession::slice_with_status`]; they become one status line.

use crate::chooser::{with_default_extension, OutputChooser};
use crate::invoker::{ProcessRunner, SliceReport, SlicerInvoker};
use crate::status::StatusMessage;
use slicekit_core::{
    validate_and_build_config, Axis, ConfigurationDocument, ParameterField, ParameterInput,
    QualityMode, Result, RotationDirection, RotationState, SliceError,
};
use slicekit_settings::Config;
use std::path::{Path, PathBuf};

/// How a slicing attempt ended, when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SliceOutcome {
    /// The slicer exited successfully
    Completed(SliceReport),
    /// No output path was chosen
    Cancelled,
}

/// State of one interactive slicing session
#[derive(Debug, Clone, Default)]
pub struct SliceSession {
    input: Option<PathBuf>,
    params: ParameterInput,
    quality: QualityMode,
    rotations: RotationState,
}

impl SliceSession {
    /// Session with the given field text, no input and zero rotation
    pub fn new(params: ParameterInput) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Session seeded with the configured default parameters
    pub fn from_config(config: &Config) -> Self {
        let mut session = Self::new(config.defaults.job_parameters().into());
        session.quality = config.defaults.quality;
        session
    }

    /// Selected input model
    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    /// Select (or clear) the input model
    pub fn select_input(&mut self, path: Option<PathBuf>) -> StatusMessage {
        self.input = path;
        match &self.input {
            Some(path) => {
                tracing::info!("Selected input model {}", path.display());
                StatusMessage::info(format!("Selected file: {}", file_name(path)))
            }
            None => StatusMessage::info("No file selected"),
        }
    }

    /// Current field text
    pub fn params(&self) -> &ParameterInput {
        &self.params
    }

    /// Replace the text of one field
    ///
    /// A manual edit leaves any preset, so the mode becomes Custom.
    pub fn set_param(&mut self, field: ParameterField, text: impl Into<String>) -> StatusMessage {
        let text = text.into();
        let message = format!("{} set to {}", field, text);
        self.params.set(field, text);
        self.quality = QualityMode::Custom;
        StatusMessage::info(message)
    }

    /// Current quality mode
    pub fn quality(&self) -> QualityMode {
        self.quality
    }

    /// Select a quality mode, overwriting the fields unless it is Custom
    pub fn apply_quality(&mut self, mode: QualityMode) -> StatusMessage {
        self.params.apply_quality(mode);
        self.quality = mode;
        StatusMessage::info(format!("Quality mode set to {}.", mode))
    }

    /// Accumulated rotations
    pub fn rotations(&self) -> &RotationState {
        &self.rotations
    }

    /// Rotate the model a quarter turn about `axis`
    pub fn rotate(&mut self, axis: Axis, direction: RotationDirection) -> StatusMessage {
        let delta = self.rotations.rotate(axis, direction);
        tracing::debug!(%axis, delta, total = self.rotations.angle(axis), "Rotated model");
        StatusMessage::info(format!("Rotated {} by {} degrees.", axis, delta))
    }

    /// Return all axes to zero
    pub fn reset_rotations(&mut self) -> StatusMessage {
        self.rotations.reset();
        StatusMessage::info("Rotations reset to default (0 degrees for all axes).")
    }

    /// Validate the fields and build the configuration document
    pub fn build_config(&self) -> Result<ConfigurationDocument> {
        Ok(validate_and_build_config(&self.params, &self.rotations)?)
    }

    /// Run the full slicing flow
    ///
    /// Fails with [`SliceError::NoInputSelected`] before anything else when
    /// no model is selected; the chooser is only asked once the parameters
    /// are valid.
    pub fn slice<C, R>(&self, chooser: &mut C, invoker: &SlicerInvoker<R>) -> Result<SliceOutcome>
    where
        C: OutputChooser + ?Sized,
        R: ProcessRunner,
    {
        let input = self.input.as_deref().ok_or(SliceError::NoInputSelected)?;
        let document = self.build_config()?;

        let Some(output) = chooser.choose_output() else {
            return Ok(SliceOutcome::Cancelled);
        };
        let output = with_default_extension(&output);

        let report = invoker.invoke_external_slicer(&document, input, &output)?;
        Ok(SliceOutcome::Completed(report))
    }

    /// Run the slicing flow and fold the result into a status message
    pub fn slice_with_status<C, R>(
        &self,
        chooser: &mut C,
        invoker: &SlicerInvoker<R>,
    ) -> StatusMessage
    where
        C: OutputChooser + ?Sized,
        R: ProcessRunner,
    {
        status_for(&self.slice(chooser, invoker))
    }
}

/// Translate a slicing result into the status shown to the user
///
/// Slicer failures are logged with full detail here; the status line itself
/// stays generic.
pub fn status_for(result: &Result<SliceOutcome>) -> StatusMessage {
    match result {
        Ok(SliceOutcome::Completed(report)) => StatusMessage::success(format!(
            "Slicing completed! G-code saved as {}.",
            report.output_name()
        )),
        Ok(SliceOutcome::Cancelled) => {
            tracing::warn!("Slicing canceled, no output file chosen");
            StatusMessage::warning("Slicing canceled.")
        }
        Err(SliceError::NoInputSelected) => {
            StatusMessage::error("Please select an STL file first.")
        }
        Err(SliceError::Validation(e)) => StatusMessage::error(format!(
            "Invalid input: {}. Please enter valid numbers within the acceptable range.",
            e
        )),
        Err(e) => {
            tracing::error!("Error: {}", e);
            StatusMessage::error("Error during slicing. Please check the console for details.")
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
