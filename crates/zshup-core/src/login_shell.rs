use log::info;
use std::path::{Path, PathBuf};
use zshup_exec::{Invocation, ToolRunner};

use crate::config::INTERPRETER;
use crate::error::StageError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginShellStatus {
    AlreadyDefault(PathBuf),
    Changed(PathBuf),
}

/// Runs `chsh -s <zsh>` unless `current` already resolves to the same binary.
/// `chsh` gets the `PATH` location rather than the symlink target, since
/// only the former is listed in `/etc/shells` and survives package upgrades.
/// `chsh` may prompt for a password; its failure is fatal.
pub async fn switch_login_shell(
    runner: &dyn ToolRunner,
    current: Option<&Path>,
) -> Result<LoginShellStatus, StageError> {
    let zsh = runner
        .locate(INTERPRETER)
        .ok_or(StageError::InterpreterUnresolved)?;
    let resolved = canonical_or_self(&zsh);

    if current.is_some_and(|shell| canonical_or_self(shell) == resolved) {
        info!("{} is already the login shell", zsh.display());
        return Ok(LoginShellStatus::AlreadyDefault(zsh));
    }

    info!("Changing login shell to {}", zsh.display());
    let chsh = Invocation::new("chsh").args(["-s".to_string(), zsh.display().to_string()]);
    runner
        .run_checked(&chsh)
        .await
        .map_err(StageError::ChangeShell)?;

    Ok(LoginShellStatus::Changed(zsh))
}

fn canonical_or_self(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
