//! External command execution
//!
//! Everything sfp does to the outside world (python, pip, kedro) goes
//! through a [`CommandRunner`], so the bootstrap flow can be driven by a
//! scripted runner in tests.

use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};

use tracing::debug;

use crate::error::{SfpError, Result};

/// Description of a command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    stdin: Option<Vec<u8>>,
}

impl Invocation {
    /// Create an invocation of the given program
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            stdin: None,
        }
    }

    /// Add a single argument
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string_lossy().into_owned()));
        self
    }

    /// Set the working directory
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Feed data to the child's stdin
    pub fn stdin(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(data.into());
        self
    }

    /// Program name
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Working directory, if set
    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Command line as a single string, for messages
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }
        cmd
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the command exited successfully
    pub success: bool,
    /// Exit code, if the process exited normally
    pub code: Option<i32>,
    /// Captured stdout (empty when the output went to the terminal)
    pub stdout: String,
    /// Captured stderr (empty when the output went to the terminal)
    pub stderr: String,
}

impl CommandOutput {
    /// A successful output with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed output with the given stderr
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Runs external commands
pub trait CommandRunner {
    /// Run a command and capture its output
    fn output(&self, invocation: &Invocation) -> Result<CommandOutput>;

    /// Run a command with stdout/stderr attached to the terminal
    fn interactive(&self, invocation: &Invocation) -> Result<CommandOutput>;
}

/// Runner backed by real processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    fn spawn_error(invocation: &Invocation, e: std::io::Error) -> SfpError {
        SfpError::command(invocation.display(), e.to_string())
    }
}

impl CommandRunner for SystemRunner {
    fn output(&self, invocation: &Invocation) -> Result<CommandOutput> {
        debug!("running `{}`", invocation.display());
        let mut cmd = invocation.build_command();
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        if invocation.stdin.is_some() {
            cmd.stdin(Stdio::piped());
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| Self::spawn_error(invocation, e))?;

        let output = feed_and_wait(child, invocation.stdin.as_deref())?;
        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn interactive(&self, invocation: &Invocation) -> Result<CommandOutput> {
        debug!("running `{}` (interactive)", invocation.display());
        let mut cmd = invocation.build_command();
        if invocation.stdin.is_some() {
            cmd.stdin(Stdio::piped());
        }
        // stderr is captured so failures can be reported
        cmd.stderr(Stdio::piped());
        if crate::ui::stdout_reserved() {
            cmd.stdout(Stdio::from(std::io::stderr()));
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| Self::spawn_error(invocation, e))?;

        let output = feed_and_wait(child, invocation.stdin.as_deref())?;
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !stderr.is_empty() {
            eprint!("{}", stderr);
        }

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::new(),
            stderr,
        })
    }
}

/// Write `data` to the child's stdin, then wait for it
///
/// A child that exits before reading everything still has its status and
/// stderr collected; the broken pipe is not an error.
fn feed_and_wait(mut child: Child, data: Option<&[u8]>) -> Result<Output> {
    let written = match (data, child.stdin.take()) {
        (Some(data), Some(mut stdin)) => stdin.write_all(data),
        _ => Ok(()),
    };
    let output = child.wait_with_output()?;
    match written {
        Err(e) if e.kind() != io::ErrorKind::BrokenPipe => Err(e.into()),
        _ => Ok(output),
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! Scripted runner for tests

    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;

    /// Expected command line and the canned response for it
    type Script = VecDeque<(String, Result<CommandOutput>)>;

    /// Replays canned outputs in order and records every invocation
    #[derive(Default)]
    pub struct ScriptedRunner {
        script: RefCell<Script>,
        pub calls: RefCell<Vec<Invocation>>,
    }

    impl ScriptedRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Expect `command` next and answer with `output`
        pub fn expect(self, command: &str, output: CommandOutput) -> Self {
            self.script
                .borrow_mut()
                .push_back((command.to_string(), Ok(output)));
            self
        }

        /// Expect `command` next and fail to spawn it
        pub fn expect_missing(self, command: &str) -> Self {
            self.script.borrow_mut().push_back((
                command.to_string(),
                Err(SfpError::command(command, "No such file or directory")),
            ));
            self
        }

        pub fn remaining(&self) -> usize {
            self.script.borrow().len()
        }

        fn next(&self, invocation: &Invocation) -> Result<CommandOutput> {
            self.calls.borrow_mut().push(invocation.clone());
            let (expected, output) = self
                .script
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| panic!("unexpected command `{}`", invocation.display()));
            assert_eq!(expected, invocation.display());
            output
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn output(&self, invocation: &Invocation) -> Result<CommandOutput> {
            self.next(invocation)
        }

        fn interactive(&self, invocation: &Invocation) -> Result<CommandOutput> {
            self.next(invocation)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_display() {
        let inv = Invocation::new("kedro")
            .arg("new")
            .args(["--starter=standalone-datacatalog"])
            .stdin("demo\n");
        assert_eq!(inv.display(), "kedro new --starter=standalone-datacatalog");
        assert_eq!(inv.get_args().len(), 2);
        assert_eq!(Invocation::new("pip").display(), "pip");
    }

    #[test]
    fn test_missing_program_is_command_error() {
        let err = SystemRunner
            .output(&Invocation::new("sfp-definitely-not-a-real-program"))
            .unwrap_err();
        assert!(matches!(err, SfpError::Command { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_captures_output() {
        let out = SystemRunner
            .output(&Invocation::new("sh").args(["-c", "read x; echo got $x; exit 3"]).stdin("abc\n"))
            .unwrap();
        assert!(!out.success);
        assert_eq!(out.code, Some(3));
        assert_eq!(out.stdout.trim(), "got abc");
    }

    #[cfg(unix)]
    #[test]
    fn test_child_exiting_before_reading_stdin() {
        let data = "x".repeat(1 << 20);
        let inv = Invocation::new("sh")
            .args(["-c", "echo boom >&2; exit 4"])
            .stdin(data);

        let out = SystemRunner.output(&inv).unwrap();
        assert_eq!(out.code, Some(4));
        assert_eq!(out.stderr.trim(), "boom");

        let out = SystemRunner.interactive(&inv).unwrap();
        assert_eq!(out.code, Some(4));
        assert_eq!(out.stderr.trim(), "boom");
    }
}
