use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use zshup_core::PluginSource;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub debug_logging: bool,

    #[serde(default = "default_max_log_size_bytes")]
    pub max_log_size_bytes: u64,

    #[serde(default = "default_true")]
    pub change_login_shell: bool,

    /// Cloned after the built-in plugins and enabled ahead of the
    /// highlighting plugin.
    #[serde(default)]
    pub extra_plugins: Vec<PluginSource>,
}

fn default_true() -> bool {
    true
}

fn default_max_log_size_bytes() -> u64 {
    1024 * 1024
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            max_log_size_bytes: default_max_log_size_bytes(),
            change_login_shell: true,
            extra_plugins: Vec::new(),
        }
    }
}

impl AppSettings {
    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{AppSettings, SettingsError};

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");

        let settings =
            AppSettings::load_from(&dir.path().join("settings.json")).expect("defaults");

        assert!(!settings.debug_logging);
        assert!(settings.change_login_shell);
        assert_eq!(settings.max_log_size_bytes, 1024 * 1024);
        assert!(settings.extra_plugins.is_empty());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{
                "change_login_shell": false,
                "extra_plugins": [
                    { "name": "fzf-tab", "url": "https://github.com/Aloxaf/fzf-tab" }
                ]
            }"#,
        )
        .expect("write settings");

        let settings = AppSettings::load_from(&path).expect("parse settings");

        assert!(!settings.change_login_shell);
        assert!(!settings.debug_logging);
        assert_eq!(settings.extra_plugins.len(), 1);
        assert_eq!(settings.extra_plugins[0].name, "fzf-tab");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").expect("write settings");

        let result = AppSettings::load_from(&path);

        assert!(matches!(result, Err(SettingsError::Parse { .. })));
    }
}
