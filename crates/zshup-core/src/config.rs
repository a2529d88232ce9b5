use std::path::PathBuf;

use zshup_platform::{AppPathsError, ProvisionPaths};
use zshup_shell::ZshrcSpec;

use crate::registry::{
    AUTOSUGGESTIONS, PluginSource, SYNTAX_HIGHLIGHTING, default_registry, enabled_plugins,
    merge_registry,
};

pub const INTERPRETER: &str = "zsh";
pub const FRAMEWORK_INSTALLER_URL: &str =
    "https://raw.githubusercontent.com/ohmyzsh/ohmyzsh/master/tools/install.sh";

/// Everything the stages read, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ProvisionConfig {
    pub paths: ProvisionPaths,
    pub installer_url: String,
    pub registry: Vec<PluginSource>,
    pub enabled_plugins: Vec<String>,
    /// The caller's current login shell (`$SHELL`).
    pub login_shell: Option<PathBuf>,
    pub change_login_shell: bool,
}

impl ProvisionConfig {
    #[must_use]
    pub fn new(paths: ProvisionPaths) -> Self {
        let registry = default_registry();
        Self {
            paths,
            installer_url: FRAMEWORK_INSTALLER_URL.to_string(),
            enabled_plugins: enabled_plugins(&registry),
            registry,
            login_shell: None,
            change_login_shell: true,
        }
    }

    /// Reads `HOME`, `ZSH_CUSTOM` and `SHELL`.
    ///
    /// # Errors
    /// Returns an error when the home directory cannot be determined.
    pub fn from_env() -> Result<Self, AppPathsError> {
        let paths = ProvisionPaths::from_env()?;
        let login_shell = std::env::var_os("SHELL")
            .filter(|shell| !shell.is_empty())
            .map(PathBuf::from);
        Ok(Self::new(paths).with_login_shell(login_shell))
    }

    #[must_use]
    pub fn with_login_shell(mut self, login_shell: Option<PathBuf>) -> Self {
        self.login_shell = login_shell;
        self
    }

    #[must_use]
    pub fn with_change_login_shell(mut self, enabled: bool) -> Self {
        self.change_login_shell = enabled;
        self
    }

    /// Replaces the registry and recomputes the enabled list from it.
    #[must_use]
    pub fn with_registry(mut self, registry: Vec<PluginSource>) -> Self {
        self.enabled_plugins = enabled_plugins(&registry);
        self.registry = registry;
        self
    }

    #[must_use]
    pub fn with_extra_plugins(self, extra: Vec<PluginSource>) -> Self {
        if extra.is_empty() {
            return self;
        }
        let registry = merge_registry(self.registry.clone(), extra);
        self.with_registry(registry)
    }

    /// Suggestions are sourced before highlighting.
    #[must_use]
    pub fn zshrc_spec(&self) -> ZshrcSpec {
        ZshrcSpec {
            enabled_plugins: self.enabled_plugins.clone(),
            sourced_scripts: [AUTOSUGGESTIONS, SYNTAX_HIGHLIGHTING]
                .iter()
                .map(|name| self.paths.plugin_script(name))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn config() -> ProvisionConfig {
        ProvisionConfig::new(ProvisionPaths::resolve(PathBuf::from("/home/ada"), None))
    }

    #[test]
    fn new_uses_default_registry_and_installer() {
        let config = config();

        assert_eq!(config.registry, default_registry());
        assert_eq!(config.installer_url, FRAMEWORK_INSTALLER_URL);
        assert!(config.change_login_shell);
        assert!(config.login_shell.is_none());
    }

    #[test]
    fn zshrc_spec_sources_suggestions_then_highlighting() {
        let spec = config().zshrc_spec();

        assert_eq!(
            spec.sourced_scripts,
            vec![
                PathBuf::from(
                    "/home/ada/.oh-my-zsh/custom/plugins/zsh-autosuggestions/zsh-autosuggestions.zsh"
                ),
                PathBuf::from(
                    "/home/ada/.oh-my-zsh/custom/plugins/zsh-syntax-highlighting/zsh-syntax-highlighting.zsh"
                ),
            ]
        );
        assert_eq!(spec.enabled_plugins, config().enabled_plugins);
    }

    #[test]
    fn with_extra_plugins_recomputes_enabled_list() {
        let config = config().with_extra_plugins(vec![PluginSource::new(
            "you-should-use",
            "https://github.com/MichaelAquilina/zsh-you-should-use",
        )]);

        assert_eq!(config.registry.len(), default_registry().len() + 1);
        assert!(config.enabled_plugins.contains(&"you-should-use".to_string()));
        assert_eq!(
            config.enabled_plugins.last().map(String::as_str),
            Some(SYNTAX_HIGHLIGHTING)
        );
    }

    #[test]
    fn with_registry_can_empty_the_registry() {
        let config = config().with_registry(Vec::new());

        assert!(config.registry.is_empty());
        assert_eq!(config.enabled_plugins, vec!["git"]);
    }
}
