use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use zshup_exec::{Invocation, ToolRunner};

use crate::config::ProvisionConfig;
use crate::error::StageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpTool {
    Curl,
    Wget,
}

impl HttpTool {
    pub const PRIORITY: [HttpTool; 2] = [HttpTool::Curl, HttpTool::Wget];

    #[must_use]
    pub fn binary(self) -> &'static str {
        match self {
            HttpTool::Curl => "curl",
            HttpTool::Wget => "wget",
        }
    }

    pub fn detect(runner: &dyn ToolRunner) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|tool| runner.is_available(tool.binary()))
    }

    #[must_use]
    pub fn download_invocation(self, url: &str, dest: &Path) -> Invocation {
        let dest = dest.display().to_string();
        match self {
            HttpTool::Curl => Invocation::new("curl").args(["-fsSL", url, "-o", dest.as_str()]),
            HttpTool::Wget => Invocation::new("wget").args(["-qO", dest.as_str(), url]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameworkStatus {
    AlreadyInstalled,
    Installed { tool: HttpTool },
}

/// Installs Oh My Zsh unless its home directory already exists. The installer
/// runs unattended and must not start zsh or touch the login shell; that is
/// left to [`crate::switch_login_shell`].
pub async fn ensure_framework(
    runner: &dyn ToolRunner,
    config: &ProvisionConfig,
) -> Result<FrameworkStatus, StageError> {
    let framework_dir = &config.paths.framework_dir;
    if framework_dir.exists() {
        info!("Oh My Zsh already installed at {}", framework_dir.display());
        return Ok(FrameworkStatus::AlreadyInstalled);
    }

    let tool = HttpTool::detect(runner).ok_or(StageError::NoHttpClient)?;
    info!("Downloading Oh My Zsh installer with {}", tool.binary());

    let script_path = temp_script_path("oh-my-zsh-install", "sh");
    let result = async {
        runner
            .run_checked(&tool.download_invocation(&config.installer_url, &script_path))
            .await
            .map_err(|error| StageError::framework_install("download", error))?;

        runner
            .run_checked(&installer_invocation(&script_path, framework_dir))
            .await
            .map_err(|error| StageError::framework_install("installer", error))
    }
    .await;

    if let Err(error) = tokio::fs::remove_file(&script_path).await {
        debug!("Could not remove {}: {error}", script_path.display());
    }
    result?;

    info!("Oh My Zsh installed at {}", framework_dir.display());
    Ok(FrameworkStatus::Installed { tool })
}

fn installer_invocation(script: &Path, framework_dir: &Path) -> Invocation {
    Invocation::new("sh")
        .arg(script.display().to_string())
        .arg("--unattended")
        .env("RUNZSH", "no")
        .env("CHSH", "no")
        .env("ZSH", framework_dir.display().to_string())
}

fn temp_script_path(prefix: &str, ext: &str) -> PathBuf {
    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    std::env::temp_dir().join(format!("{prefix}-{}-{nonce}.{ext}", std::process::id()))
}
