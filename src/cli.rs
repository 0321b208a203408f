//! Command-line front end
//!
//! Parses arguments, layers settings (file, environment, flags) and runs
//! one of the subcommands against a [`SliceSession`].

use crate::dialogs::{pick_model, SaveDialog};
use crate::interactive::{self, StdinPrompt};
use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use slicekit_core::{Axis, ParameterField, QualityMode, RotationDirection};
use slicekit_settings::Config;
use slicekit_slicer::{FixedOutput, OutputChooser, SliceSession, SlicerInvoker, StatusMessage};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

/// Slice STL models with an external slicer
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"),
    about,
    long_about = None
)]
pub struct Cli {
    /// Settings file (.toml or .json); defaults to the platform config directory
    #[arg(long, global = true, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Slice a model once and exit
    Slice(SliceArgs),
    /// Print the configuration document without running the slicer
    Config(JobArgs),
    /// Line-oriented session: select, edit, rotate and slice repeatedly
    Interactive(InteractiveArgs),
    /// Show or create the settings file
    #[command(subcommand)]
    Settings(SettingsCommand),
}

/// Job parameter and rotation flags shared by `slice` and `config`
#[derive(Args, Debug, Clone, Default)]
pub struct JobArgs {
    /// Quality preset applied before the individual parameter flags
    #[arg(short, long, value_name = "MODE")]
    pub quality: Option<QualityMode>,

    /// Layer height in mm
    #[arg(long, value_name = "MM")]
    pub layer_height: Option<String>,

    /// Infill density in percent (0-100)
    #[arg(long, value_name = "PERCENT")]
    pub infill: Option<String>,

    /// Print speed in mm/s
    #[arg(long, value_name = "MM_S")]
    pub speed: Option<String>,

    /// Quarter-turn rotation, repeatable: x, x+, x-, y:cw, z:ccw ...
    #[arg(short = 'r', long = "rotate", value_name = "AXIS[DIR]")]
    pub rotations: Vec<RotateArg>,
}

/// Slicer overrides shared by the commands that run the slicer
#[derive(Args, Debug, Clone, Default)]
pub struct SlicerArgs {
    /// Slicer executable
    #[arg(long, value_name = "PATH")]
    pub slicer: Option<PathBuf>,

    /// Scratch path for the configuration document
    #[arg(long, value_name = "PATH")]
    pub config_path: Option<PathBuf>,

    /// Kill the slicer after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Use native file dialogs for the model and output paths
    #[arg(long)]
    pub dialogs: bool,
}

#[derive(Args, Debug)]
pub struct SliceArgs {
    /// Input model (.stl)
    #[arg(value_name = "MODEL")]
    pub model: Option<PathBuf>,

    /// Output G-code path; prompted for when omitted
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub job: JobArgs,

    #[command(flatten)]
    pub slicer: SlicerArgs,
}

#[derive(Args, Debug)]
pub struct InteractiveArgs {
    /// Model to start with
    #[arg(value_name = "MODEL")]
    pub model: Option<PathBuf>,

    #[command(flatten)]
    pub slicer: SlicerArgs,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print the effective settings as TOML
    Show,
    /// Write a settings file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// A single quarter turn requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotateArg {
    pub axis: Axis,
    pub direction: RotationDirection,
}

impl FromStr for RotateArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let axis: Axis = chars
            .next()
            .ok_or_else(|| "Empty rotation".to_string())?
            .to_string()
            .parse()?;
        let rest = chars.as_str().trim_start_matches(':');
        let direction = if rest.is_empty() {
            RotationDirection::Clockwise
        } else {
            rest.parse()?
        };
        Ok(Self { axis, direction })
    }
}

impl JobArgs {
    /// Apply preset, field overrides and rotations to a session, in that order
    pub fn apply(&self, session: &mut SliceSession) {
        if let Some(mode) = self.quality {
            session.apply_quality(mode);
        }
        let fields = [
            (ParameterField::LayerHeight, &self.layer_height),
            (ParameterField::InfillDensity, &self.infill),
            (ParameterField::PrintSpeed, &self.speed),
        ];
        for (field, value) in fields {
            if let Some(text) = value {
                session.set_param(field, text.clone());
            }
        }
        for rotation in &self.rotations {
            session.rotate(rotation.axis, rotation.direction);
        }
    }
}

impl SlicerArgs {
    /// Layer the flags over the loaded settings
    pub fn apply(&self, config: &mut Config) {
        if let Some(slicer) = &self.slicer {
            config.slicer.executable = slicer.clone();
        }
        if let Some(path) = &self.config_path {
            config.slicer.config_path = path.clone();
        }
        if let Some(secs) = self.timeout {
            config.slicer.timeout_secs = Some(secs);
        }
    }
}

/// Load settings from file and environment
pub fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    let mut config = Config::load_or_default(path).context("Failed to load settings")?;
    config.apply_env_overrides();
    Ok(config)
}

/// Run the parsed command line
pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Command::Slice(args) => run_slice(cli.settings, args),
        Command::Config(job) => run_config(cli.settings, job),
        Command::Interactive(args) => run_interactive(cli.settings, args),
        Command::Settings(cmd) => run_settings(cli.settings, cmd),
    }
}

fn effective_config(
    settings: Option<PathBuf>,
    overrides: &SlicerArgs,
) -> anyhow::Result<Config> {
    let mut config = load_config(settings.as_deref())?;
    overrides.apply(&mut config);
    config.validate().context("Invalid slicer settings")?;
    Ok(config)
}

fn run_slice(settings: Option<PathBuf>, args: SliceArgs) -> anyhow::Result<ExitCode> {
    let config = effective_config(settings, &args.slicer)?;
    let mut session = SliceSession::from_config(&config);

    let model = match args.model {
        Some(model) => Some(model),
        None if args.slicer.dialogs => pick_model(),
        None => None,
    };
    report(&session.select_input(model));
    args.job.apply(&mut session);

    let mut chooser: Box<dyn OutputChooser> = match args.output {
        Some(path) => Box::new(FixedOutput::new(path)),
        None if args.slicer.dialogs => Box::new(SaveDialog),
        None => Box::new(StdinPrompt::default()),
    };

    let invoker = SlicerInvoker::new(config.slicer.clone());
    let status = session.slice_with_status(chooser.as_mut(), &invoker);
    Ok(finish(&status))
}

fn run_config(settings: Option<PathBuf>, job: JobArgs) -> anyhow::Result<ExitCode> {
    let config = load_config(settings.as_deref())?;
    let mut session = SliceSession::from_config(&config);
    job.apply(&mut session);

    match session.build_config() {
        Ok(document) => {
            print!("{}", document);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Invalid input: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run_interactive(settings: Option<PathBuf>, args: InteractiveArgs) -> anyhow::Result<ExitCode> {
    let config = effective_config(settings, &args.slicer)?;
    let mut session = SliceSession::from_config(&config);
    if args.model.is_some() {
        report(&session.select_input(args.model));
    }
    let invoker = SlicerInvoker::new(config.slicer.clone());

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    interactive::run_loop(
        &mut session,
        &invoker,
        args.slicer.dialogs,
        stdin.lock(),
        stdout.lock(),
    )?;
    Ok(ExitCode::SUCCESS)
}

fn run_settings(settings: Option<PathBuf>, cmd: SettingsCommand) -> anyhow::Result<ExitCode> {
    match cmd {
        SettingsCommand::Show => {
            let config = load_config(settings.as_deref())?;
            print!("{}", config.to_toml_string()?);
        }
        SettingsCommand::Init { force } => {
            let path = match settings {
                Some(path) => path,
                None => Config::default_path()?,
            };
            if path.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            Config::default()
                .save_to_file(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote default settings to {}", path.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Print a status line
pub fn report(status: &StatusMessage) {
    println!("[{}] {}", status.level, status);
}

fn finish(status: &StatusMessage) -> ExitCode {
    report(status);
    if status.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
