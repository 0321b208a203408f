// Settings file tests
// Load/save of TOML and JSON settings, partial files and format errors.

use slicekit_core::QualityMode;
use slicekit_settings::{Config, ConfigError, SettingsError};
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_toml_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.slicer.executable = PathBuf::from("/opt/PrusaSlicer/prusa-slicer");
    config.slicer.timeout_secs = Some(600);
    config.defaults.quality = QualityMode::HighQuality;

    config.save_to_file(&path).unwrap();
    let loaded = Config::load_from_file(&path).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_json_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let mut config = Config::default();
    config.defaults.infill_density = 45;
    config.save_to_file(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("\"infill_density\": 45"));
    assert_eq!(Config::load_from_file(&path).unwrap(), config);
}

#[test]
fn test_partial_toml_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[slicer]
executable = "C:/Program Files/Prusa3D/PrusaSlicer/prusa-slicer-console.exe"

[defaults]
quality = "draft"
"#,
    )
    .unwrap();

    let config = Config::load_from_file(&path).unwrap();
    assert_eq!(
        config.slicer.executable,
        PathBuf::from("C:/Program Files/Prusa3D/PrusaSlicer/prusa-slicer-console.exe")
    );
    assert_eq!(config.slicer.args, Config::default().slicer.args);
    assert_eq!(config.slicer.timeout_secs, None);
    assert_eq!(config.defaults.job_parameters().print_speed, 80.0);
}

#[test]
fn test_invalid_file_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[slicer]\nargs = [\"--slice\", \"{input}\"]\n").unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Config(ConfigError::MissingPlaceholder(_))
    ));
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");

    let err = Config::default().save_to_file(&path).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Config(ConfigError::UnsupportedFormat(_))
    ));
    assert!(!path.exists());
}

#[test]
fn test_explicit_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.toml");

    let err = Config::load_or_default(Some(&path)).unwrap_err();
    assert!(matches!(err, SettingsError::Read { .. }));
}

#[test]
fn test_malformed_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[slicer\nexecutable = ").unwrap();

    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::TomlParse(_))
    ));
}

#[test]
fn test_save_under_a_file_reports_directory() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "").unwrap();
    let path = blocker.join("config.toml");

    match Config::default().save_to_file(&path) {
        Err(SettingsError::CreateDir { path: failed, .. }) => assert_eq!(failed, blocker),
        other => panic!("unexpected result {:?}", other),
    }
}
