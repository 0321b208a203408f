//! External slicer invocation
//!
//! Writes the configuration document to the scratch path, reads it back
//! for the log, then runs the slicer executable and waits for it. Exit code
//! zero is success; anything else is a failure for this attempt. There is
//! no retry.
//!
//! The process itself is started through [`ProcessRunner`] so the write /
//! argument / exit-code handling can be exercised without a real slicer.

use slicekit_core::{ConfigurationDocument, Result, SliceError};
use slicekit_settings::SlicerSettings;
use std::ffi::OsString;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{ChildStderr, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Result of running a child process to completion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    /// Captured standard error
    pub stderr: String,
}

impl ProcessOutput {
    /// True for exit code zero
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Starts a program and blocks until it exits
pub trait ProcessRunner {
    /// Run `program` with `args`; kill it and return [`SliceError::Timeout`]
    /// if `timeout` elapses first
    fn run(
        &self,
        program: &Path,
        args: &[OsString],
        timeout: Option<Duration>,
    ) -> Result<ProcessOutput>;
}

/// Runs programs with `std::process`
///
/// The child's stdout goes to our stdout, stderr is captured for
/// diagnostics. Stderr is collected until the pipe closes, but never past
/// the timeout deadline or [`STDERR_GRACE`] after the child exits, so a
/// detached grandchild holding the pipe open cannot stall the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

/// How long to keep collecting stderr after the slicer has exited
pub const STDERR_GRACE: Duration = Duration::from_millis(500);

impl ProcessRunner for SystemRunner {
    fn run(
        &self,
        program: &Path,
        args: &[OsString],
        timeout: Option<Duration>,
    ) -> Result<ProcessOutput> {
        let spawn_err = |source| SliceError::SpawnFailed {
            program: program.to_path_buf(),
            source,
        };

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        let deadline = timeout.map(|limit| Instant::now() + limit);
        let stderr_rx = child.stderr.take().map(spawn_stderr_reader);

        let status = match (timeout, deadline) {
            (Some(limit), Some(deadline)) => loop {
                match child.try_wait().map_err(spawn_err)? {
                    Some(status) => break status,
                    None if Instant::now() >= deadline => {
                        tracing::warn!(
                            "Slicer exceeded {}s, killing process {}",
                            limit.as_secs(),
                            child.id()
                        );
                        let _ = child.kill();
                        let _ = child.wait();
                        if let Some(rx) = &stderr_rx {
                            let partial = collect_stderr(rx, Instant::now());
                            if !partial.is_empty() {
                                tracing::debug!("Slicer stderr before kill: {}", partial.trim_end());
                            }
                        }
                        return Err(SliceError::Timeout {
                            timeout_secs: limit.as_secs(),
                        });
                    }
                    None => std::thread::sleep(POLL_INTERVAL),
                }
            },
            _ => child.wait().map_err(spawn_err)?,
        };

        let grace_end = Instant::now() + STDERR_GRACE;
        let until = deadline.map_or(grace_end, |deadline| deadline.min(grace_end));
        let stderr = stderr_rx
            .map(|rx| collect_stderr(&rx, until))
            .unwrap_or_default();

        Ok(ProcessOutput {
            code: status.code(),
            stderr,
        })
    }
}

/// Forward stderr in chunks as it arrives
fn spawn_stderr_reader(mut pipe: ChildStderr) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut chunk = [0u8; 4096];
        loop {
            match pipe.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    if tx.send(chunk[..n].to_vec()).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::debug!("Stopped reading slicer stderr: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

/// Gather whatever stderr arrives before the pipe closes or `until` passes
///
/// Bytes that are not UTF-8 (localized messages in a legacy codepage) are
/// kept as replacement characters.
fn collect_stderr(rx: &Receiver<Vec<u8>>, until: Instant) -> String {
    let mut bytes = Vec::new();
    loop {
        let left = until.saturating_duration_since(Instant::now());
        match rx.recv_timeout(left) {
            Ok(chunk) => bytes.extend_from_slice(&chunk),
            Err(RecvTimeoutError::Timeout) => {
                tracing::debug!("Slicer stderr still open, keeping {} bytes", bytes.len());
                break;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

/// A successful slicing run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceReport {
    /// The G-code file the slicer wrote
    pub output: PathBuf,
    /// Where the configuration document was written
    pub config_path: PathBuf,
    /// Wall-clock time spent in the slicer
    pub elapsed: Duration,
}

impl SliceReport {
    /// File name of the output, for status messages
    pub fn output_name(&self) -> String {
        self.output
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.output.display().to_string())
    }
}

/// Runs the configured slicer
#[derive(Debug, Clone)]
pub struct SlicerInvoker<R = SystemRunner> {
    settings: SlicerSettings,
    runner: R,
}

impl SlicerInvoker<SystemRunner> {
    /// Invoker that starts real processes
    pub fn new(settings: SlicerSettings) -> Self {
        Self::with_runner(settings, SystemRunner)
    }
}

impl<R: ProcessRunner> SlicerInvoker<R> {
    /// Invoker with a custom process runner
    pub fn with_runner(settings: SlicerSettings, runner: R) -> Self {
        Self { settings, runner }
    }

    /// Current slicer settings
    pub fn settings(&self) -> &SlicerSettings {
        &self.settings
    }

    /// The process runner
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Write the configuration document and run the slicer on `input`
    ///
    /// Blocks until the slicer exits (or the configured timeout passes).
    pub fn invoke_external_slicer(
        &self,
        document: &ConfigurationDocument,
        input: &Path,
        output: &Path,
    ) -> Result<SliceReport> {
        let config_path = &self.settings.config_path;
        write_config(document, config_path)?;

        let args = self.settings.expand_args(config_path, input, output);
        let program = &self.settings.executable;
        tracing::info!(
            "Slicing {} -> {} with {}",
            input.display(),
            output.display(),
            program.display()
        );
        tracing::debug!(?args, "Slicer arguments");

        let started = Instant::now();
        let timeout = self.settings.timeout_secs.map(Duration::from_secs);
        let result = self.runner.run(program, &args, timeout)?;
        let elapsed = started.elapsed();

        if !result.success() {
            return Err(SliceError::ProcessFailed {
                code: result.code,
                stderr: result.stderr,
            });
        }

        tracing::info!(
            "Slicing finished in {:.1}s, G-code saved as {}",
            elapsed.as_secs_f64(),
            output.display()
        );

        Ok(SliceReport {
            output: output.to_path_buf(),
            config_path: config_path.clone(),
            elapsed,
        })
    }
}

/// Run the default PrusaSlicer command line with explicit paths
pub fn invoke_external_slicer(
    executable: &Path,
    config_path: &Path,
    document: &ConfigurationDocument,
    input: &Path,
    output: &Path,
) -> Result<SliceReport> {
    let settings = SlicerSettings {
        executable: executable.to_path_buf(),
        config_path: config_path.to_path_buf(),
        ..SlicerSettings::default()
    };
    SlicerInvoker::new(settings).invoke_external_slicer(document, input, output)
}

/// Overwrite the scratch file with the document and log what landed on disk
fn write_config(document: &ConfigurationDocument, path: &Path) -> Result<()> {
    let io_err = |source| SliceError::ConfigWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, document.render()).map_err(io_err)?;

    let written = std::fs::read_to_string(path).map_err(io_err)?;
    tracing::info!(
        "Configuration file contents ({}):\n{}",
        path.display(),
        written.trim_end()
    );
    Ok(())
}
