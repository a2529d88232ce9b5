use chrono::Local;
use log::{info, warn};
use zshup_core::{
    FrameworkStatus, InterpreterStatus, LoginShellStatus, PluginReport, ProvisionConfig,
    ensure_framework, ensure_interpreter, fetch_plugins, switch_login_shell,
    update_configuration,
};
use zshup_exec::ToolRunner;

use crate::error::AppError;

const STAGE_COUNT: usize = 5;

fn announce(step: usize, title: &str) {
    info!("[{step}/{STAGE_COUNT}] {title}");
}

/// Runs every stage in order and stops at the first fatal error.
pub async fn run(runner: &dyn ToolRunner, config: &ProvisionConfig) -> Result<(), AppError> {
    announce(1, "Checking for zsh");
    match ensure_interpreter(runner)
        .await
        .map_err(|error| AppError::stage("zsh installation", error))?
    {
        InterpreterStatus::AlreadyInstalled(path) => {
            info!("zsh already installed at {}", path.display());
        }
        InterpreterStatus::Installed { manager, path } => {
            info!("Installed zsh at {} using {manager}", path.display());
        }
    }

    announce(2, "Checking for Oh My Zsh");
    if let FrameworkStatus::Installed { tool } = ensure_framework(runner, config)
        .await
        .map_err(|error| AppError::stage("Oh My Zsh installation", error))?
    {
        info!("Installed Oh My Zsh (downloaded with {})", tool.binary());
    }

    announce(3, "Fetching plugins");
    let reports = fetch_plugins(runner, config).await;
    summarize_plugins(&reports);

    announce(4, "Updating .zshrc");
    let update = update_configuration(config, Local::now())
        .map_err(|error| AppError::stage(".zshrc update", error))?;
    if let Some(backup) = &update.backup {
        info!("Previous configuration saved to {}", backup.display());
    }

    announce(5, "Checking login shell");
    if config.change_login_shell {
        let status = switch_login_shell(runner, config.login_shell.as_deref())
            .await
            .map_err(|error| AppError::stage("login shell change", error))?;
        if let LoginShellStatus::Changed(path) = status {
            info!(
                "Login shell changed to {}; log out and back in to use it",
                path.display()
            );
        }
    } else {
        info!("Leaving the login shell unchanged (disabled in settings)");
    }

    info!("zsh setup complete. Restart your terminal or run `exec zsh` to apply it.");
    Ok(())
}

fn summarize_plugins(reports: &[PluginReport]) {
    let failed: Vec<&str> = reports
        .iter()
        .filter(|report| report.outcome.is_failure())
        .map(|report| report.name.as_str())
        .collect();

    info!(
        "{} of {} plugins ready",
        reports.len() - failed.len(),
        reports.len()
    );
    if !failed.is_empty() {
        warn!("Continuing without: {}", failed.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use zshup_core::{ProvisionConfig, StageError};
    use zshup_exec::fake::FakeRunner;
    use zshup_platform::ProvisionPaths;

    use super::run;
    use crate::error::AppError;

    const FAKE_ZSH: &str = "/opt/zshup-test/bin/zsh";

    fn config_in(home: &Path) -> ProvisionConfig {
        ProvisionConfig::new(ProvisionPaths::resolve(home.to_path_buf(), None))
            .with_login_shell(Some(PathBuf::from(FAKE_ZSH)))
    }

    fn provisioned_home() -> tempfile::TempDir {
        let home = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(home.path().join(".oh-my-zsh")).expect("create framework dir");
        home
    }

    #[tokio::test]
    async fn run_with_everything_present_only_clones_plugins() {
        let home = provisioned_home();
        let config = config_in(home.path());
        let runner = FakeRunner::new()
            .with_program_at("zsh", FAKE_ZSH)
            .with_program("git");

        run(&runner, &config).await.expect("run succeeds");

        let commands = runner.command_lines();
        assert_eq!(commands.len(), 4);
        assert!(commands.iter().all(|line| line.starts_with("git clone --depth=1 ")));

        let zshrc = std::fs::read_to_string(home.path().join(".zshrc")).expect("zshrc written");
        assert!(zshrc.starts_with(
            "plugins=(git zsh-autosuggestions zsh-completions zsh-history-substring-search zsh-syntax-highlighting)\n"
        ));
    }

    #[tokio::test]
    async fn second_run_leaves_zshrc_unchanged() {
        let home = provisioned_home();
        let config = config_in(home.path());
        let zshrc = home.path().join(".zshrc");
        std::fs::write(&zshrc, "export EDITOR=vim\nplugins=(git)\n").expect("seed zshrc");
        let runner = FakeRunner::new()
            .with_program_at("zsh", FAKE_ZSH)
            .with_program("git");

        run(&runner, &config).await.expect("first run");
        let first = std::fs::read_to_string(&zshrc).expect("read zshrc");
        run(&runner, &config).await.expect("second run");
        let second = std::fs::read_to_string(&zshrc).expect("read zshrc");

        assert_eq!(first, second);
        assert!(first.starts_with("export EDITOR=vim\nplugins=(git "));
    }

    #[tokio::test]
    async fn disabled_login_shell_change_never_runs_chsh() {
        let home = provisioned_home();
        let config = config_in(home.path())
            .with_login_shell(Some(PathBuf::from("/bin/bash")))
            .with_change_login_shell(false);
        let runner = FakeRunner::new()
            .with_program_at("zsh", FAKE_ZSH)
            .with_program("git");

        run(&runner, &config).await.expect("run succeeds");

        assert!(
            runner
                .command_lines()
                .iter()
                .all(|line| !line.starts_with("chsh"))
        );
    }

    #[tokio::test]
    async fn missing_package_manager_stops_the_run() {
        let home = tempfile::tempdir().expect("create temp dir");
        let config = config_in(home.path());
        let runner = FakeRunner::new();

        let result = run(&runner, &config).await;

        assert!(matches!(
            result,
            Err(AppError::Stage {
                source: StageError::NoPackageManager { .. },
                ..
            })
        ));
        assert!(runner.calls().is_empty());
        assert!(!home.path().join(".zshrc").exists());
    }
}
