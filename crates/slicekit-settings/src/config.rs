//! Configuration and settings management for SliceKit
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats stored in the platform config directory.
//!
//! Configuration is organized into logical sections:
//! - Slicer settings (executable, scratch config path, argument grammar, timeout)
//! - Default job parameters (optionally from a quality preset)
//!
//! Values are layered: file, then environment (`SLICEKIT_SLICER`,
//! `SLICEKIT_CONFIG_PATH`), then whatever the caller sets explicitly.

use crate::error::{ConfigError, SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use slicekit_core::{JobParameters, QualityMode};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Placeholder replaced with the configuration document path
pub const ARG_CONFIG: &str = "{config}";
/// Placeholder replaced with the input model path
pub const ARG_INPUT: &str = "{input}";
/// Placeholder replaced with the output G-code path
pub const ARG_OUTPUT: &str = "{output}";

/// Environment variable overriding the slicer executable
pub const ENV_SLICER: &str = "SLICEKIT_SLICER";
/// Environment variable overriding the scratch configuration path
pub const ENV_CONFIG_PATH: &str = "SLICEKIT_CONFIG_PATH";

const APP_DIR: &str = "slicekit";
const CONFIG_FILE: &str = "config.toml";
const SCRATCH_FILE: &str = "slice_config.ini";

/// External slicer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlicerSettings {
    /// Slicer executable, absolute or resolved through PATH
    pub executable: PathBuf,
    /// Where the configuration document is written before each run
    pub config_path: PathBuf,
    /// Argument template; must contain `{config}`, `{input}` and `{output}`
    pub args: Vec<String>,
    /// Kill the slicer after this many seconds; unset waits forever
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for SlicerSettings {
    fn default() -> Self {
        Self {
            executable: PathBuf::from(default_executable()),
            config_path: default_scratch_path(),
            args: default_args(),
            timeout_secs: None,
        }
    }
}

impl SlicerSettings {
    /// Expand the argument template for one run
    pub fn expand_args(&self, config: &Path, input: &Path, output: &Path) -> Vec<OsString> {
        self.args
            .iter()
            .map(|arg| match arg.as_str() {
                ARG_CONFIG => config.as_os_str().to_os_string(),
                ARG_INPUT => input.as_os_str().to_os_string(),
                ARG_OUTPUT => output.as_os_str().to_os_string(),
                other => OsString::from(
                    other
                        .replace(ARG_CONFIG, &config.to_string_lossy())
                        .replace(ARG_INPUT, &input.to_string_lossy())
                        .replace(ARG_OUTPUT, &output.to_string_lossy()),
                ),
            })
            .collect()
    }
}

fn default_executable() -> &'static str {
    if cfg!(target_os = "windows") {
        "prusa-slicer-console.exe"
    } else {
        "prusa-slicer"
    }
}

fn default_scratch_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
        .join(SCRATCH_FILE)
}

/// PrusaSlicer command line: slice, export G-code, load config, input, output
fn default_args() -> Vec<String> {
    [
        "--slice",
        "--export-gcode",
        "--load",
        ARG_CONFIG,
        ARG_INPUT,
        "--output",
        ARG_OUTPUT,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Job parameters a new session starts with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultParameters {
    /// Preset applied over the explicit values unless Custom
    pub quality: QualityMode,
    /// Layer height in mm
    pub layer_height: f64,
    /// Infill density in percent
    pub infill_density: u8,
    /// Print speed in mm/s
    pub print_speed: f64,
}

impl Default for DefaultParameters {
    fn default() -> Self {
        let params = JobParameters::default();
        Self {
            quality: QualityMode::Custom,
            layer_height: params.layer_height,
            infill_density: params.infill_density,
            print_speed: params.print_speed,
        }
    }
}

impl DefaultParameters {
    /// Resolve to concrete job parameters
    pub fn job_parameters(&self) -> JobParameters {
        self.quality.preset().unwrap_or(JobParameters {
            layer_height: self.layer_height,
            infill_density: self.infill_density,
            print_speed: self.print_speed,
        })
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// External slicer settings
    pub slicer: SlicerSettings,
    /// Default job parameters
    pub defaults: DefaultParameters,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform location of the config file
    pub fn default_path() -> SettingsResult<PathBuf> {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or(SettingsError::NoConfigDirectory)?;
        Ok(base.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from an explicit path, or from the default location if it exists
    ///
    /// A missing default file is not an error; built-in defaults are used.
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::load_from_file(&path)
                } else {
                    tracing::debug!("No settings file at {}, using defaults", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = match extension(path).as_deref() {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or("(none)").to_string(),
                )
                .into())
            }
        };

        config.validate()?;
        tracing::info!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match extension(path).as_deref() {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or("(none)").to_string(),
                )
                .into())
            }
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(path, content).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Render as the TOML a settings file would contain
    pub fn to_toml_string(&self) -> SettingsResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.slicer.executable.as_os_str().is_empty() {
            return Err(invalid("slicer.executable", "must not be empty"));
        }

        if self.slicer.config_path.as_os_str().is_empty() {
            return Err(invalid("slicer.config_path", "must not be empty"));
        }

        for placeholder in [ARG_CONFIG, ARG_INPUT, ARG_OUTPUT] {
            if !self.slicer.args.iter().any(|arg| arg.contains(placeholder)) {
                return Err(ConfigError::MissingPlaceholder(placeholder.to_string()).into());
            }
        }

        if self.slicer.timeout_secs == Some(0) {
            return Err(ConfigError::ZeroTimeout.into());
        }

        self.defaults
            .job_parameters()
            .validate()
            .map_err(|e| invalid("defaults", &e.to_string()))?;

        Ok(())
    }

    /// Apply `SLICEKIT_SLICER` / `SLICEKIT_CONFIG_PATH` from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var_os(name));
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<OsString>,
    {
        if let Some(value) = lookup(ENV_SLICER).filter(|v| !v.is_empty()) {
            tracing::debug!("{} overrides slicer executable", ENV_SLICER);
            self.slicer.executable = PathBuf::from(value);
        }
        if let Some(value) = lookup(ENV_CONFIG_PATH).filter(|v| !v.is_empty()) {
            tracing::debug!("{} overrides config path", ENV_CONFIG_PATH);
            self.slicer.config_path = PathBuf::from(value);
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

fn invalid(key: &str, reason: &str) -> SettingsError {
    SettingsError::InvalidSetting {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
