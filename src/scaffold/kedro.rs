//! Kedro project creation

use std::path::Path;

use crate::error::{SfpError, Result};
use crate::process::{CommandRunner, Invocation};

use super::ProjectName;

/// Creates projects with `kedro new`
#[derive(Debug, Clone)]
pub struct KedroStarter {
    program: String,
    starter: String,
}

impl KedroStarter {
    /// Use `program` with the given starter template
    pub fn new(program: impl Into<String>, starter: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            starter: starter.into(),
        }
    }

    /// Invocation that creates `name` inside `workdir`
    pub fn invocation(&self, workdir: &Path, name: &ProjectName) -> Invocation {
        Invocation::new(&self.program)
            .arg("new")
            .arg(format!("--starter={}", self.starter))
            .cwd(workdir)
            .stdin(format!("{}\n", name))
    }

    /// Run `kedro new`, answering its project name prompt
    pub fn create(
        &self,
        runner: &impl CommandRunner,
        workdir: &Path,
        name: &ProjectName,
    ) -> Result<()> {
        let out = match runner.interactive(&self.invocation(workdir, name)) {
            Ok(out) => out,
            Err(SfpError::Command { reason, .. }) => return Err(SfpError::Kedro(reason)),
            Err(e) => return Err(e),
        };

        if out.success {
            Ok(())
        } else {
            let message = out.stderr.trim();
            Err(SfpError::Kedro(if message.is_empty() {
                format!("kedro exited with status {:?}", out.code)
            } else {
                message.to_string()
            }))
        }
    }
}

impl Default for KedroStarter {
    fn default() -> Self {
        Self::new("kedro", "standalone-datacatalog")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::fake::ScriptedRunner;
    use crate::process::CommandOutput;

    #[test]
    fn test_invocation_feeds_name() {
        let name = ProjectName::parse("demo").unwrap();
        let inv = KedroStarter::default().invocation(Path::new("/work"), &name);
        assert_eq!(inv.display(), "kedro new --starter=standalone-datacatalog");
        assert_eq!(inv.get_cwd(), Some(Path::new("/work")));
    }

    #[test]
    fn test_create_success_and_failure() {
        let name = ProjectName::parse("demo").unwrap();
        let runner = ScriptedRunner::new()
            .expect("kedro new --starter=spaceflights", CommandOutput::ok(""))
            .expect("kedro new --starter=spaceflights", CommandOutput::failed(1, "starter not found\n"))
            .expect("kedro new --starter=spaceflights", CommandOutput::failed(2, ""));
        let kedro = KedroStarter::new("kedro", "spaceflights");

        kedro.create(&runner, Path::new("."), &name).unwrap();
        assert_eq!(runner.calls.borrow()[0].get_cwd(), Some(Path::new(".")));

        let err = kedro.create(&runner, Path::new("."), &name).unwrap_err();
        assert_eq!(err.to_string(), "Can't create Kedro project: starter not found");

        let err = kedro.create(&runner, Path::new("."), &name).unwrap_err();
        assert!(err.to_string().contains("Some(2)"));
    }

    #[test]
    fn test_missing_kedro() {
        let name = ProjectName::parse("demo").unwrap();
        let runner = ScriptedRunner::new().expect_missing("kedro new --starter=standalone-datacatalog");
        let err = KedroStarter::default().create(&runner, Path::new("."), &name).unwrap_err();
        assert!(matches!(err, SfpError::Kedro(_)));
    }
}
