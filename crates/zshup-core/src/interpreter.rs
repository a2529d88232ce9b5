use log::{debug, info, warn};
use std::path::PathBuf;
use zshup_exec::{Invocation, ToolRunner};

use crate::config::INTERPRETER;
use crate::error::StageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    AptGet,
    Dnf,
    Yum,
    Pacman,
    Zypper,
    Apk,
    Brew,
}

impl PackageManager {
    /// Probe order; the first one found wins.
    pub const PRIORITY: [PackageManager; 7] = [
        PackageManager::AptGet,
        PackageManager::Dnf,
        PackageManager::Yum,
        PackageManager::Pacman,
        PackageManager::Zypper,
        PackageManager::Apk,
        PackageManager::Brew,
    ];

    #[must_use]
    pub fn binary(self) -> &'static str {
        match self {
            PackageManager::AptGet => "apt-get",
            PackageManager::Dnf => "dnf",
            PackageManager::Yum => "yum",
            PackageManager::Pacman => "pacman",
            PackageManager::Zypper => "zypper",
            PackageManager::Apk => "apk",
            PackageManager::Brew => "brew",
        }
    }

    pub fn detect(runner: &dyn ToolRunner) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|manager| runner.is_available(manager.binary()))
    }

    /// Homebrew refuses to run as root, so it never gets `sudo`.
    #[must_use]
    pub fn wants_sudo(self) -> bool {
        self != PackageManager::Brew
    }

    /// Non-interactive commands that install `package`, run in order.
    #[must_use]
    pub fn install_invocations(self, package: &str, use_sudo: bool) -> Vec<Invocation> {
        let binary = self.binary();
        let invocations = match self {
            PackageManager::AptGet => vec![
                Invocation::new(binary).arg("update"),
                Invocation::new(binary).args(["install", "-y", package]),
            ],
            PackageManager::Dnf | PackageManager::Yum => {
                vec![Invocation::new(binary).args(["install", "-y", package])]
            }
            PackageManager::Pacman => vec![
                Invocation::new(binary).args(["-S", "--noconfirm", "--needed", package]),
            ],
            PackageManager::Zypper => {
                vec![Invocation::new(binary).args(["--non-interactive", "install", package])]
            }
            PackageManager::Apk => vec![Invocation::new(binary).args(["add", package])],
            PackageManager::Brew => vec![Invocation::new(binary).args(["install", package])],
        };

        if use_sudo && self.wants_sudo() {
            invocations.into_iter().map(Invocation::with_sudo).collect()
        } else {
            invocations
        }
    }
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.binary())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpreterStatus {
    AlreadyInstalled(PathBuf),
    Installed {
        manager: PackageManager,
        path: PathBuf,
    },
}

/// Makes sure zsh is on `PATH`, installing it with the first package manager
/// found. There is a single attempt: a failing install command is not retried
/// with another manager, and only the final lookup decides success.
pub async fn ensure_interpreter(runner: &dyn ToolRunner) -> Result<InterpreterStatus, StageError> {
    if let Some(path) = runner.locate(INTERPRETER) {
        info!("{INTERPRETER} already installed at {}", path.display());
        return Ok(InterpreterStatus::AlreadyInstalled(path));
    }

    let Some(manager) = PackageManager::detect(runner) else {
        let tried = PackageManager::PRIORITY
            .iter()
            .map(|manager| manager.binary())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(StageError::NoPackageManager { tried });
    };

    let use_sudo = runner.is_available("sudo");
    info!("Installing {INTERPRETER} with {manager}");
    debug!("sudo available: {use_sudo}");

    for invocation in manager.install_invocations(INTERPRETER, use_sudo) {
        if let Err(error) = runner.run_checked(&invocation).await {
            warn!("{manager} could not install {INTERPRETER}: {error}");
            break;
        }
    }

    match runner.locate(INTERPRETER) {
        Some(path) => {
            info!("{INTERPRETER} installed at {}", path.display());
            Ok(InterpreterStatus::Installed { manager, path })
        }
        None => Err(StageError::InterpreterMissingAfterInstall {
            manager: manager.binary(),
        }),
    }
}
