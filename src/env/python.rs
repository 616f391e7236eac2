//! Python interpreter detection

use serde::Serialize;
use tracing::debug;

use crate::error::{SfpError, Result};
use crate::process::{CommandRunner, Invocation};

const PREFIX_SNIPPET: &str = "import sys; print(sys.prefix)";

/// A working Python interpreter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PythonEnv {
    /// Command used to invoke the interpreter
    pub command: String,
    /// Version banner, e.g. `Python 3.11.4`
    pub version: String,
    /// `sys.prefix` of the interpreter's environment
    pub prefix: Option<String>,
}

impl PythonEnv {
    /// Check that `command` runs and query its environment
    pub fn detect(runner: &impl CommandRunner, command: &str) -> Result<Self> {
        let version = match runner.output(&Invocation::new(command).arg("--version")) {
            Ok(out) if out.success => {
                // python 2 prints the banner on stderr
                let banner = if out.stdout.trim().is_empty() { &out.stderr } else { &out.stdout };
                banner.trim().to_string()
            }
            Ok(out) => {
                debug!("`{} --version` exited with {:?}", command, out.code);
                return Err(SfpError::PythonNotInstalled);
            }
            Err(SfpError::Command { reason, .. }) => {
                debug!("`{}` could not be started: {}", command, reason);
                return Err(SfpError::PythonNotInstalled);
            }
            Err(e) => return Err(e),
        };

        let prefix_out = runner.output(&Invocation::new(command).args(["-c", PREFIX_SNIPPET]))?;
        let prefix = prefix_out.stdout.trim();

        Ok(Self {
            command: command.to_string(),
            version,
            prefix: if prefix.is_empty() { None } else { Some(prefix.to_string()) },
        })
    }

    /// Version number without the `Python ` banner
    pub fn version_number(&self) -> &str {
        self.version
            .strip_prefix("Python")
            .map(str::trim)
            .unwrap_or(&self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::fake::ScriptedRunner;
    use crate::process::CommandOutput;

    #[test]
    fn test_detect_reads_version_and_prefix() {
        let runner = ScriptedRunner::new()
            .expect("python3 --version", CommandOutput::ok("Python 3.11.4\n"))
            .expect(
                "python3 -c import sys; print(sys.prefix)",
                CommandOutput::ok("/home/user/.venv\n"),
            );

        let env = PythonEnv::detect(&runner, "python3").unwrap();
        assert_eq!(env.version, "Python 3.11.4");
        assert_eq!(env.version_number(), "3.11.4");
        assert_eq!(env.prefix.as_deref(), Some("/home/user/.venv"));
        assert_eq!(runner.remaining(), 0);
    }

    #[test]
    fn test_version_on_stderr() {
        let mut banner = CommandOutput::ok("");
        banner.stderr = "Python 2.7.18\n".into();
        let runner = ScriptedRunner::new()
            .expect("python --version", banner)
            .expect("python -c import sys; print(sys.prefix)", CommandOutput::ok(""));

        let env = PythonEnv::detect(&runner, "python").unwrap();
        assert_eq!(env.version, "Python 2.7.18");
        assert_eq!(env.prefix, None);
    }

    #[test]
    fn test_missing_interpreter() {
        let runner = ScriptedRunner::new().expect_missing("python3 --version");
        let err = PythonEnv::detect(&runner, "python3").unwrap_err();
        assert!(matches!(err, SfpError::PythonNotInstalled));
    }

    #[test]
    fn test_failing_interpreter() {
        let runner = ScriptedRunner::new()
            .expect("python3 --version", CommandOutput::failed(9009, "not found"));
        let err = PythonEnv::detect(&runner, "python3").unwrap_err();
        assert!(matches!(err, SfpError::PythonNotInstalled));
    }
}
