use std::path::PathBuf;

use crate::paths::AppPathsError;

/// Overrides the Oh My Zsh custom directory, as Oh My Zsh itself does.
pub const ZSH_CUSTOM_ENV: &str = "ZSH_CUSTOM";

const FRAMEWORK_DIR: &str = ".oh-my-zsh";
const ZSHRC: &str = ".zshrc";
const BACKUP_INFIX: &str = ".zshrc.backup.";

/// Home-relative locations the provisioning stages read and write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionPaths {
    pub home: PathBuf,
    pub zshrc: PathBuf,
    pub framework_dir: PathBuf,
    pub custom_dir: PathBuf,
}

impl ProvisionPaths {
    /// Resolve paths from the user's home directory and `ZSH_CUSTOM`.
    ///
    /// # Errors
    /// Returns an error when the home directory cannot be determined.
    pub fn from_env() -> Result<Self, AppPathsError> {
        let home = dirs::home_dir().ok_or(AppPathsError::HomeDirUnavailable)?;
        let custom = std::env::var_os(ZSH_CUSTOM_ENV).map(PathBuf::from);
        Ok(Self::resolve(home, custom))
    }

    /// An empty override counts as unset.
    #[must_use]
    pub fn resolve(home: PathBuf, custom_override: Option<PathBuf>) -> Self {
        let framework_dir = home.join(FRAMEWORK_DIR);
        let custom_dir = custom_override
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| framework_dir.join("custom"));

        Self {
            zshrc: home.join(ZSHRC),
            framework_dir,
            custom_dir,
            home,
        }
    }

    #[must_use]
    pub fn plugins_dir(&self) -> PathBuf {
        self.custom_dir.join("plugins")
    }

    #[must_use]
    pub fn plugin_dir(&self, name: &str) -> PathBuf {
        self.plugins_dir().join(name)
    }

    /// Entry script of a plugin, `<plugins>/<name>/<name>.zsh`.
    #[must_use]
    pub fn plugin_script(&self, name: &str) -> PathBuf {
        self.plugin_dir(name).join(format!("{name}.zsh"))
    }

    /// Backups are `<home>/.zshrc.backup.<timestamp>`.
    #[must_use]
    pub fn backup_prefix(&self) -> PathBuf {
        self.home.join(BACKUP_INFIX)
    }
}
