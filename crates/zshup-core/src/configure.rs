use chrono::{DateTime, Local};
use log::info;
use zshup_shell::{ZshrcUpdate, update_zshrc};

use crate::config::ProvisionConfig;
use crate::error::StageError;

/// Backs up `.zshrc` and rewrites its managed lines.
pub fn update_configuration(
    config: &ProvisionConfig,
    now: DateTime<Local>,
) -> Result<ZshrcUpdate, StageError> {
    info!("Updating {}", config.paths.zshrc.display());

    let update = update_zshrc(
        &config.paths.zshrc,
        &config.paths.backup_prefix(),
        &config.zshrc_spec(),
        now,
    )?;

    Ok(update)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::Local;
    use zshup_platform::ProvisionPaths;

    use super::update_configuration;
    use crate::config::ProvisionConfig;

    #[test]
    fn writes_enabled_plugins_into_zshrc() {
        let home = tempfile::tempdir().expect("create temp dir");
        let config = ProvisionConfig::new(ProvisionPaths::resolve(
            home.path().to_path_buf(),
            Some(PathBuf::from("/opt/zsh-custom")),
        ));

        let update = update_configuration(&config, Local::now()).expect("update succeeds");

        assert!(update.backup.is_none());
        let content =
            std::fs::read_to_string(home.path().join(".zshrc")).expect("read created zshrc");
        assert!(content.starts_with(&format!(
            "plugins=({})\n",
            config.enabled_plugins.join(" ")
        )));
        assert!(content.contains("/opt/zsh-custom/plugins/zsh-autosuggestions/"));
    }
}
