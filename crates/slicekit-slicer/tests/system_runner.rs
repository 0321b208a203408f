// Real process tests for SystemRunner, using the POSIX shell as a stand-in slicer.
#![cfg(unix)]

use slicekit_core::{ConfigurationDocument, JobParameters, RotationState, SliceError};
use slicekit_settings::SlicerSettings;
use slicekit_slicer::{invoke_external_slicer, SlicerInvoker};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn document() -> ConfigurationDocument {
    ConfigurationDocument::from_parameters(&JobParameters::default(), &RotationState::new())
}

// `sh -c SCRIPT $0 $1 $2` receives config, input and output as positional parameters.
fn shell_settings(dir: &TempDir, script: &str) -> SlicerSettings {
    SlicerSettings {
        executable: PathBuf::from("sh"),
        config_path: dir.path().join("config.ini"),
        args: vec![
            "-c".to_string(),
            script.to_string(),
            "{config}".to_string(),
            "{input}".to_string(),
            "{output}".to_string(),
        ],
        timeout_secs: None,
    }
}

#[test]
fn test_child_sees_written_config() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.gcode");
    let settings = shell_settings(&dir, "test -f \"$0\" && cp \"$0\" \"$2\"");

    let report = SlicerInvoker::new(settings)
        .invoke_external_slicer(&document(), &dir.path().join("model.stl"), &output)
        .unwrap();

    assert_eq!(report.output, output);
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        document().render()
    );
}

#[test]
fn test_exit_code_and_stderr_captured() {
    let dir = TempDir::new().unwrap();
    let settings = shell_settings(&dir, "echo 'no printable objects' >&2; exit 3");

    let err = SlicerInvoker::new(settings)
        .invoke_external_slicer(
            &document(),
            &dir.path().join("model.stl"),
            &dir.path().join("out.gcode"),
        )
        .unwrap_err();

    match err {
        SliceError::ProcessFailed { code, stderr } => {
            assert_eq!(code, Some(3));
            assert_eq!(stderr.trim(), "no printable objects");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_non_utf8_stderr_is_kept() {
    let dir = TempDir::new().unwrap();
    let settings = shell_settings(&dir, "printf 'Fehler: Datei \\374ber\\n' >&2; exit 2");

    let err = SlicerInvoker::new(settings)
        .invoke_external_slicer(
            &document(),
            &dir.path().join("model.stl"),
            &dir.path().join("out.gcode"),
        )
        .unwrap_err();

    match err {
        SliceError::ProcessFailed { code, stderr } => {
            assert_eq!(code, Some(2));
            assert_eq!(stderr, "Fehler: Datei \u{FFFD}ber\n");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_background_child_does_not_hold_up_result() {
    let dir = TempDir::new().unwrap();
    let mut settings = shell_settings(&dir, "echo 'giving up' >&2; sleep 6 & exit 1");
    settings.timeout_secs = Some(1);

    let started = Instant::now();
    let err = SlicerInvoker::new(settings)
        .invoke_external_slicer(
            &document(),
            &dir.path().join("model.stl"),
            &dir.path().join("out.gcode"),
        )
        .unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(3));
    match err {
        SliceError::ProcessFailed { code, stderr } => {
            assert_eq!(code, Some(1));
            assert_eq!(stderr.trim(), "giving up");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_background_child_without_timeout() {
    let dir = TempDir::new().unwrap();
    let settings = shell_settings(&dir, "sleep 6 & exit 0");

    let started = Instant::now();
    SlicerInvoker::new(settings)
        .invoke_external_slicer(
            &document(),
            &dir.path().join("model.stl"),
            &dir.path().join("out.gcode"),
        )
        .unwrap();
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[test]
fn test_timeout_kills_slicer() {
    let dir = TempDir::new().unwrap();
    let mut settings = shell_settings(&dir, "sleep 30");
    settings.timeout_secs = Some(1);

    let err = SlicerInvoker::new(settings)
        .invoke_external_slicer(
            &document(),
            &dir.path().join("model.stl"),
            &dir.path().join("out.gcode"),
        )
        .unwrap_err();

    assert!(matches!(err, SliceError::Timeout { timeout_secs: 1 }));
}

#[test]
fn test_missing_executable() {
    let dir = TempDir::new().unwrap();
    let err = invoke_external_slicer(
        &dir.path().join("no-such-slicer"),
        &dir.path().join("config.ini"),
        &document(),
        &dir.path().join("model.stl"),
        &dir.path().join("out.gcode"),
    )
    .unwrap_err();

    assert!(matches!(err, SliceError::SpawnFailed { .. }));
    // The configuration is written before the spawn is attempted
    assert!(dir.path().join("config.ini").exists());
}

#[test]
fn test_default_grammar_with_true() {
    let dir = TempDir::new().unwrap();
    let report = invoke_external_slicer(
        &PathBuf::from("true"),
        &dir.path().join("cfg").join("config.ini"),
        &document(),
        &dir.path().join("model.stl"),
        &dir.path().join("out.gcode"),
    )
    .unwrap();
    assert_eq!(report.output_name(), "out.gcode");
}
