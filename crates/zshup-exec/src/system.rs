use async_trait::async_trait;
use log::{debug, info};
use std::path::PathBuf;
use tokio::process::Command;

use crate::error::ToolError;
use crate::traits::{Invocation, RunStatus, ToolRunner};

/// Runs commands on the host with inherited stdio, so package managers and
/// `chsh` can prompt the user directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl ToolRunner for SystemRunner {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }

    async fn run(&self, invocation: &Invocation) -> Result<RunStatus, ToolError> {
        info!("Running: {}", invocation.command_line());

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        for (key, value) in &invocation.env {
            cmd.env(key, value);
        }

        let status = cmd.status().await.map_err(|error| {
            if error.kind() == std::io::ErrorKind::NotFound {
                ToolError::NotFound {
                    program: invocation.program.clone(),
                }
            } else {
                ToolError::from(error)
            }
        })?;

        debug!("{} exit status: {status:?}", invocation.program);
        Ok(RunStatus::from(status))
    }
}
