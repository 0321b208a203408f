//! Native file dialogs for the model and output paths

use rfd::FileDialog;
use slicekit_slicer::{OutputChooser, GCODE_EXTENSION};
use std::path::PathBuf;

/// Open a file dialog to select an STL model
pub fn pick_model() -> Option<PathBuf> {
    let path = FileDialog::new()
        .add_filter("STL Files", &["stl", "STL"])
        .add_filter("All Files", &["*"])
        .set_title("Select 3D Model")
        .pick_file();
    tracing::debug!("Model dialog returned {:?}", path);
    path
}

/// Save dialog for the G-code output; closing it cancels the slice
#[derive(Debug, Clone, Copy, Default)]
pub struct SaveDialog;

impl OutputChooser for SaveDialog {
    fn choose_output(&mut self) -> Option<PathBuf> {
        FileDialog::new()
            .add_filter("G-code Files", &[GCODE_EXTENSION])
            .set_title("Save G-code")
            .save_file()
    }
}
