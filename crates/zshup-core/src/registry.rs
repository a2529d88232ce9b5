use log::warn;
use serde::{Deserialize, Serialize};

pub const AUTOSUGGESTIONS: &str = "zsh-autosuggestions";
pub const SYNTAX_HIGHLIGHTING: &str = "zsh-syntax-highlighting";

/// Always enabled ahead of the registry plugins; ships with Oh My Zsh.
const BUILTIN_PLUGINS: &[&str] = &["git"];

const DEFAULT_PLUGINS: &[(&str, &str)] = &[
    (
        AUTOSUGGESTIONS,
        "https://github.com/zsh-users/zsh-autosuggestions",
    ),
    (
        SYNTAX_HIGHLIGHTING,
        "https://github.com/zsh-users/zsh-syntax-highlighting.git",
    ),
    (
        "zsh-completions",
        "https://github.com/zsh-users/zsh-completions",
    ),
    (
        "zsh-history-substring-search",
        "https://github.com/zsh-users/zsh-history-substring-search",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginSource {
    pub name: String,
    pub url: String,
}

impl PluginSource {
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

#[must_use]
pub fn default_registry() -> Vec<PluginSource> {
    DEFAULT_PLUGINS
        .iter()
        .map(|(name, url)| PluginSource::new(*name, *url))
        .collect()
}

/// A name becomes both a directory under `plugins/` and a word inside
/// `plugins=(...)`, so it is limited to letters, digits, `-`, `_` and `.`.
#[must_use]
fn is_valid_plugin_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Appends `extra` to `base`, skipping invalid names and names that are
/// already registered.
#[must_use]
pub fn merge_registry(base: Vec<PluginSource>, extra: Vec<PluginSource>) -> Vec<PluginSource> {
    let mut merged = base;
    for plugin in extra {
        if !is_valid_plugin_name(&plugin.name) {
            warn!("Ignoring plugin with invalid name: {:?}", plugin.name);
            continue;
        }
        if merged.iter().any(|existing| existing.name == plugin.name) {
            warn!("Ignoring duplicate plugin entry: {}", plugin.name);
            continue;
        }
        merged.push(plugin);
    }
    merged
}

/// Builtins first, then registry plugins in order, with the highlighting
/// plugin moved to the end because it must load last.
#[must_use]
pub fn enabled_plugins(registry: &[PluginSource]) -> Vec<String> {
    let mut enabled: Vec<String> = BUILTIN_PLUGINS.iter().map(ToString::to_string).collect();
    enabled.extend(
        registry
            .iter()
            .filter(|plugin| plugin.name != SYNTAX_HIGHLIGHTING)
            .filter(|plugin| !BUILTIN_PLUGINS.contains(&plugin.name.as_str()))
            .map(|plugin| plugin.name.clone()),
    );
    if registry
        .iter()
        .any(|plugin| plugin.name == SYNTAX_HIGHLIGHTING)
    {
        enabled.push(SYNTAX_HIGHLIGHTING.to_string());
    }
    enabled
}
