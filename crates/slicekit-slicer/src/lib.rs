//! # SliceKit Slicer
//!
//! Runs the external slicer: writes the configuration document, launches
//! the executable with the configured argument grammar and reports the
//! outcome. [`SliceSession`] holds the state a user builds up (input model,
//! parameter text, rotations) and turns every action into a status message.

pub mod chooser;
pub mod invoker;
pub mod session;
pub mod status;

pub use chooser::{with_default_extension, FixedOutput, OutputChooser, GCODE_EXTENSION};
pub use invoker::{
    invoke_external_slicer, ProcessOutput, ProcessRunner, SliceReport, SlicerInvoker,
    SystemRunner,
};
pub use session::{status_for, SliceOutcome, SliceSession};
pub use status::{StatusLevel, StatusMessage};
