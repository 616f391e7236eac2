//! Environment health checks
//!
//! `sfp doctor` checks the tools the bootstrap flow depends on:
//!
//! - the Python interpreter (required)
//! - pip (required)
//! - kedro (optional, pip can install it)
//!
//! Probes run concurrently on blocking tasks.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::config::Config;
use crate::env;
use crate::error::Result;
use crate::process::{CommandRunner, Invocation, SystemRunner};

/// Result of a single tool check
#[derive(Debug, Clone, Serialize)]
pub struct ToolCheck {
    /// Tool name as invoked
    pub name: String,
    /// Whether the tool answered `--version`
    pub passed: bool,
    /// Resolved path on `PATH`
    pub path: Option<PathBuf>,
    /// First line of the version output
    pub version: Option<String>,
    /// Failure reason
    pub message: Option<String>,
    /// Whether the bootstrap needs this tool
    pub required: bool,
    /// How long the probe took
    #[serde(with = "millis")]
    pub duration: Duration,
}

/// Summary of all checks
#[derive(Debug, Clone, Default, Serialize)]
pub struct DoctorReport {
    /// Operating system
    pub os: String,
    /// Whether the platform counts as unix
    pub unix: bool,
    /// Individual checks, in probe order
    pub checks: Vec<ToolCheck>,
}

impl DoctorReport {
    /// Whether every required check passed
    pub fn all_required_passed(&self) -> bool {
        self.checks.iter().filter(|c| c.required).all(|c| c.passed)
    }

    /// Number of failed required checks
    pub fn required_failed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.required && !c.passed).count()
    }
}

/// Probe one tool
pub fn check_tool(runner: &impl CommandRunner, name: &str, required: bool) -> ToolCheck {
    let start = Instant::now();
    let path = which::which(name).ok();

    let (passed, version, message) = match runner.output(&Invocation::new(name).arg("--version")) {
        Ok(out) if out.success => {
            let text = if out.stdout.trim().is_empty() { &out.stderr } else { &out.stdout };
            (true, text.lines().next().map(|l| l.trim().to_string()), None)
        }
        Ok(out) => (false, None, Some(format!("exited with status {:?}", out.code))),
        Err(e) => (false, None, Some(e.to_string())),
    };

    ToolCheck {
        name: name.to_string(),
        passed,
        path,
        version,
        message,
        required,
        duration: start.elapsed(),
    }
}

/// Run every check concurrently
pub async fn doctor(config: &Config) -> Result<DoctorReport> {
    let unix = env::is_unix_os();
    let tools = [
        (config.python_command(unix), true),
        (config.pip_command(), true),
        (config.scaffold.kedro.clone(), false),
    ];

    let handles: Vec<_> = tools
        .into_iter()
        .map(|(name, required)| {
            tokio::task::spawn_blocking(move || check_tool(&SystemRunner, &name, required))
        })
        .collect();

    let mut checks = Vec::with_capacity(handles.len());
    for handle in handles {
        checks.push(handle.await?);
    }

    Ok(DoctorReport {
        os: std::env::consts::OS.to_string(),
        unix,
        checks,
    })
}

mod millis {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::fake::ScriptedRunner;
    use crate::process::CommandOutput;

    #[test]
    fn test_check_tool_pass() {
        let runner = ScriptedRunner::new()
            .expect("pip --version", CommandOutput::ok("pip 24.0 from /usr/lib\nextra\n"));
        let check = check_tool(&runner, "pip", true);
        assert!(check.passed);
        assert_eq!(check.version.as_deref(), Some("pip 24.0 from /usr/lib"));
        assert!(check.message.is_none());
    }

    #[test]
    fn test_check_tool_missing() {
        let runner = ScriptedRunner::new().expect_missing("kedro --version");
        let check = check_tool(&runner, "kedro", false);
        assert!(!check.passed);
        assert!(check.message.is_some());
    }

    #[test]
    fn test_optional_failures_do_not_count() {
        let ok = |name: &str| ToolCheck {
            name: name.into(),
            passed: true,
            path: None,
            version: None,
            message: None,
            required: true,
            duration: Duration::ZERO,
        };
        let mut report = DoctorReport::default();
        report.checks.push(ok("python3"));
        report.checks.push(ToolCheck { passed: false, required: false, ..ok("kedro") });
        assert!(report.all_required_passed());

        report.checks.push(ToolCheck { passed: false, ..ok("pip") });
        assert!(!report.all_required_passed());
        assert_eq!(report.required_failed_count(), 1);
    }

    #[test]
    fn test_report_serializes() {
        let report = DoctorReport::default();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"checks\":[]"));
    }

    #[tokio::test]
    async fn test_doctor_probes_three_tools() {
        let mut config = Config::default();
        config.general.python = Some("sfp-missing-python".into());
        config.general.pip = Some("sfp-missing-pip".into());
        config.scaffold.kedro = "sfp-missing-kedro".into();

        let report = doctor(&config).await.unwrap();
        assert_eq!(report.checks.len(), 3);
        assert!(!report.all_required_passed());
        assert!(!report.checks[2].required);
    }
}
