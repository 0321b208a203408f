//! Interactive session
//!
//! A line-oriented stand-in for the slicing window: each line is one user
//! action (select a model, edit a field, pick a quality mode, rotate, reset,
//! slice) and answers with one status line. The loop never stops on an
//! action error; only `quit` or end of input ends it.

use crate::dialogs::{pick_model, SaveDialog};
use slicekit_core::{Axis, ParameterField, QualityMode, RotationDirection};
use slicekit_slicer::{
    FixedOutput, OutputChooser, ProcessRunner, SliceSession, SlicerInvoker, StatusMessage,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const HELP: &str = "\
Commands:
  open [PATH]              select the input model (no PATH: dialog or clear)
  set FIELD VALUE          layer_height | infill_density | print_speed
  quality MODE             custom | draft | normal | high
  rotate AXIS [cw|ccw]     quarter turn about x, y or z
  reset                    zero all rotations
  show                     print the current session
  preview                  print the configuration document
  slice [OUTPUT]           run the slicer (no OUTPUT: prompt or dialog)
  help                     this text
  quit                     leave";

/// One parsed line of input
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Open(Option<PathBuf>),
    Set(ParameterField, String),
    Quality(QualityMode),
    Rotate(Axis, RotationDirection),
    Reset,
    Show,
    Preview,
    Slice(Option<PathBuf>),
    Help,
    Quit,
}

/// Parse a line; blank lines yield `Ok(None)`
pub fn parse_action(line: &str) -> Result<Option<Action>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };
    let path_arg = || (!rest.is_empty()).then(|| PathBuf::from(rest));

    let action = match command.to_lowercase().as_str() {
        "open" | "select" => Action::Open(path_arg()),
        "set" => {
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| "usage: set FIELD VALUE".to_string())?;
            Action::Set(field.parse()?, value.trim().to_string())
        }
        "quality" => Action::Quality(rest.parse()?),
        "rotate" => {
            let mut parts = rest.split_whitespace();
            let axis: Axis = parts
                .next()
                .ok_or_else(|| "usage: rotate AXIS [cw|ccw]".to_string())?
                .parse()?;
            let direction = match parts.next() {
                Some(dir) => dir.parse()?,
                None => RotationDirection::Clockwise,
            };
            Action::Rotate(axis, direction)
        }
        "reset" => Action::Reset,
        "show" => Action::Show,
        "preview" => Action::Preview,
        "slice" => Action::Slice(path_arg()),
        "help" | "?" => Action::Help,
        "quit" | "exit" | "q" => Action::Quit,
        other => return Err(format!("Unknown command '{}', try 'help'", other)),
    };
    Ok(Some(action))
}

/// Asks for the output path on stdin
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinPrompt;

impl OutputChooser for StdinPrompt {
    fn choose_output(&mut self) -> Option<PathBuf> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        prompt_output(&mut input, &mut io::stdout())
    }
}

/// Asks for the output path on the session's own input stream
struct LinePrompt<'a, R, W> {
    input: &'a mut R,
    output: &'a mut W,
}

impl<R: BufRead, W: Write> OutputChooser for LinePrompt<'_, R, W> {
    fn choose_output(&mut self) -> Option<PathBuf> {
        prompt_output(&mut *self.input, &mut *self.output)
    }
}

/// Blank line or end of input cancels
fn prompt_output<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Option<PathBuf> {
    write!(output, "Save G-code as (blank to cancel): ").ok()?;
    output.flush().ok()?;

    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => {
            let line = line.trim();
            (!line.is_empty()).then(|| PathBuf::from(line))
        }
    }
}

/// Run the session until `quit` or end of input
pub fn run_loop<R, W, P>(
    session: &mut SliceSession,
    invoker: &SlicerInvoker<P>,
    dialogs: bool,
    mut input: R,
    mut output: W,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    P: ProcessRunner,
{
    writeln!(output, "SliceKit interactive session. Type 'help' for commands.")?;

    loop {
        write!(output, "> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let action = match parse_action(&line) {
            Ok(Some(action)) => action,
            Ok(None) => continue,
            Err(e) => {
                write_status(&mut output, &StatusMessage::error(e))?;
                continue;
            }
        };

        let status = match action {
            Action::Open(path) => {
                let path = match path {
                    Some(path) => Some(path),
                    None if dialogs => pick_model(),
                    None => None,
                };
                session.select_input(path)
            }
            Action::Set(field, value) => session.set_param(field, value),
            Action::Quality(mode) => session.apply_quality(mode),
            Action::Rotate(axis, direction) => session.rotate(axis, direction),
            Action::Reset => session.reset_rotations(),
            Action::Show => {
                write_session(&mut output, session)?;
                continue;
            }
            Action::Preview => match session.build_config() {
                Ok(document) => {
                    write!(output, "{}", document)?;
                    continue;
                }
                Err(e) => StatusMessage::error(format!("Invalid input: {}", e)),
            },
            Action::Slice(Some(path)) => {
                session.slice_with_status(&mut FixedOutput::new(path), invoker)
            }
            Action::Slice(None) if dialogs => session.slice_with_status(&mut SaveDialog, invoker),
            Action::Slice(None) => {
                let mut prompt = LinePrompt {
                    input: &mut input,
                    output: &mut output,
                };
                session.slice_with_status(&mut prompt, invoker)
            }
            Action::Help => {
                writeln!(output, "{}", HELP)?;
                continue;
            }
            Action::Quit => break,
        };

        write_status(&mut output, &status)?;
    }

    Ok(())
}

fn write_status<W: Write>(output: &mut W, status: &StatusMessage) -> io::Result<()> {
    writeln!(output, "[{}] {}", status.level, status)
}

fn write_session<W: Write>(output: &mut W, session: &SliceSession) -> io::Result<()> {
    match session.input() {
        Some(path) => writeln!(output, "Model:          {}", path.display())?,
        None => writeln!(output, "Model:          (none)")?,
    }
    writeln!(output, "Quality mode:   {}", session.quality())?;
    for field in ParameterField::ALL {
        writeln!(
            output,
            "{:<15} {} {}",
            format!("{}:", field),
            session.params().get(field),
            field.unit()
        )?;
    }
    let rotations = session.rotations();
    writeln!(
        output,
        "Rotation:       X {}  Y {}  Z {}",
        rotations.x, rotations.y, rotations.z
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use slicekit_core::Result;
    use slicekit_settings::SlicerSettings;
    use slicekit_slicer::ProcessOutput;
    use std::cell::RefCell;
    use std::ffi::OsString;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingRunner {
        calls: RefCell<Vec<Vec<OsString>>>,
    }

    impl ProcessRunner for RecordingRunner {
        fn run(
            &self,
            _program: &Path,
            args: &[OsString],
            _timeout: Option<Duration>,
        ) -> Result<ProcessOutput> {
            self.calls.borrow_mut().push(args.to_vec());
            Ok(ProcessOutput {
                code: Some(0),
                stderr: String::new(),
            })
        }
    }

    fn run_script(script: &str, dir: &TempDir) -> (String, usize, SliceSession) {
        let settings = SlicerSettings {
            config_path: dir.path().join("config.ini"),
            ..SlicerSettings::default()
        };
        let invoker = SlicerInvoker::with_runner(settings, RecordingRunner::default());
        let mut session = SliceSession::default();
        let mut out = Vec::new();
        run_loop(&mut session, &invoker, false, script.as_bytes(), &mut out).unwrap();
        let calls = invoker.runner().calls.borrow().len();
        (String::from_utf8(out).unwrap(), calls, session)
    }

    #[test]
    fn test_parse_actions() {
        assert_eq!(parse_action("   "), Ok(None));
        assert_eq!(
            parse_action("open /models/my part.stl"),
            Ok(Some(Action::Open(Some(PathBuf::from("/models/my part.stl")))))
        );
        assert_eq!(parse_action("open"), Ok(Some(Action::Open(None))));
        assert_eq!(
            parse_action("set infill 35"),
            Ok(Some(Action::Set(
                ParameterField::InfillDensity,
                "35".to_string()
            )))
        );
        assert_eq!(
            parse_action("rotate y ccw"),
            Ok(Some(Action::Rotate(
                Axis::Y,
                RotationDirection::CounterClockwise
            )))
        );
        assert_eq!(
            parse_action("quality high quality"),
            Ok(Some(Action::Quality(QualityMode::HighQuality)))
        );
        assert!(parse_action("set infill").is_err());
        assert!(parse_action("rotate w").is_err());
        assert!(parse_action("fly").is_err());
    }

    #[test]
    fn test_slice_without_model() {
        let dir = TempDir::new().unwrap();
        let (out, calls, _) = run_script("slice out.gcode\nquit\n", &dir);
        assert!(out.contains("[error] Please select an STL file first."));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_full_session() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("part.gcode");
        let script = format!(
            "open /models/part.stl\n\
             quality draft\n\
             set infill 101\n\
             slice {out}\n\
             set infill 25\n\
             rotate x\n\
             rotate x\n\
             rotate x\n\
             rotate x\n\
             rotate z ccw\n\
             slice\n\
             \n\
             slice\n\
             {out}\n\
             reset\n\
             show\n",
            out = output.display()
        );

        let (out, calls, session) = run_script(&script, &dir);

        assert!(out.contains("[info] Selected file: part.stl"));
        assert!(out.contains("[info] Quality mode set to Draft."));
        assert!(out.contains("[error] Invalid input: Infill density out of range: 101"));
        assert!(out.contains("[info] Rotated Z by -90 degrees."));
        assert!(out.contains("[warning] Slicing canceled."));
        assert!(out.contains("[ok] Slicing completed! G-code saved as part.gcode."));
        assert!(out.contains("[info] Rotations reset to default (0 degrees for all axes)."));
        assert!(out.contains("Rotation:       X 0  Y 0  Z 0"));
        assert_eq!(calls, 1);

        let written = std::fs::read_to_string(dir.path().join("config.ini")).unwrap();
        assert_eq!(
            written,
            "layer_height = 0.3\nfill_density = 25%\nspeed_print = 80.0\nrotate_x = 360\nrotate_y = 0\nrotate_z = -90\n"
        );
        assert!(session.rotations().is_zero());
    }

    #[test]
    fn test_bad_command_keeps_going() {
        let dir = TempDir::new().unwrap();
        let (out, _, session) = run_script("jump\nrotate y\n", &dir);
        assert!(out.contains("[error] Unknown command 'jump'"));
        assert_eq!(session.rotations().y, 90);
    }

    #[test]
    fn test_prompt_output() {
        let mut out = Vec::new();
        assert_eq!(
            prompt_output(&mut "  /tmp/a.gcode \n".as_bytes(), &mut out),
            Some(PathBuf::from("/tmp/a.gcode"))
        );
        assert_eq!(prompt_output(&mut "\n".as_bytes(), &mut out), None);
        assert_eq!(prompt_output(&mut "".as_bytes(), &mut out), None);
    }
}
