use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::ToolError;

/// A single external command: program, arguments and extra environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Wraps this invocation in `sudo`, keeping its environment.
    #[must_use]
    pub fn with_sudo(self) -> Self {
        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.push(self.program);
        args.extend(self.args);
        Self {
            program: "sudo".to_string(),
            args,
            env: self.env,
        }
    }

    #[must_use]
    pub fn command_line(&self) -> String {
        let mut parts = Vec::with_capacity(self.env.len() + self.args.len() + 1);
        for (key, value) in &self.env {
            parts.push(format!("{key}={value}"));
        }
        parts.push(self.program.clone());
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    pub success: bool,
    pub code: Option<i32>,
}

impl RunStatus {
    #[must_use]
    pub fn succeeded() -> Self {
        Self {
            success: true,
            code: Some(0),
        }
    }

    #[must_use]
    pub fn failed(code: i32) -> Self {
        Self {
            success: false,
            code: Some(code),
        }
    }
}

impl From<std::process::ExitStatus> for RunStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            success: status.success(),
            code: status.code(),
        }
    }
}

#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Resolves `program` through `PATH`.
    fn locate(&self, program: &str) -> Option<PathBuf>;

    async fn run(&self, invocation: &Invocation) -> Result<RunStatus, ToolError>;

    fn is_available(&self, program: &str) -> bool {
        self.locate(program).is_some()
    }

    /// Like [`ToolRunner::run`], but a non-zero exit becomes
    /// [`ToolError::CommandFailed`].
    async fn run_checked(&self, invocation: &Invocation) -> Result<(), ToolError> {
        let status = self.run(invocation).await?;
        if status.success {
            Ok(())
        } else {
            Err(ToolError::CommandFailed {
                command: invocation.command_line(),
                code: status.code,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeRunner;

    #[test]
    fn command_line_renders_env_program_and_args() {
        let invocation = Invocation::new("sh")
            .arg("/tmp/install.sh")
            .arg("--unattended")
            .env("RUNZSH", "no");

        assert_eq!(
            invocation.command_line(),
            "RUNZSH=no sh /tmp/install.sh --unattended"
        );
    }

    #[test]
    fn with_sudo_prepends_program() {
        let invocation = Invocation::new("apt-get")
            .args(["install", "-y", "zsh"])
            .with_sudo();

        assert_eq!(invocation.program, "sudo");
        assert_eq!(invocation.args, vec!["apt-get", "install", "-y", "zsh"]);
    }

    #[tokio::test]
    async fn run_checked_maps_failure_to_command_failed() {
        let runner = FakeRunner::new().fail_when("git pull");
        let invocation = Invocation::new("git").args(["pull", "--ff-only"]);

        let result = runner.run_checked(&invocation).await;

        assert_eq!(
            result,
            Err(ToolError::CommandFailed {
                command: "git pull --ff-only".to_string(),
                code: Some(1),
            })
        );
    }

    #[tokio::test]
    async fn is_available_defaults_to_locate() {
        let runner = FakeRunner::new().with_program("git");

        assert!(runner.is_available("git"));
        assert!(!runner.is_available("wget"));
    }
}
