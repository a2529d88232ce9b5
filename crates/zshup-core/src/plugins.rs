use log::{info, warn};
use std::path::Path;
use zshup_exec::{Invocation, ToolRunner};

use crate::config::ProvisionConfig;
use crate::registry::PluginSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginOutcome {
    Cloned,
    Updated,
    UpdateFailed(String),
    CloneFailed(String),
}

impl PluginOutcome {
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::UpdateFailed(_) | Self::CloneFailed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginReport {
    pub name: String,
    pub outcome: PluginOutcome,
}

/// Clones missing plugins and fast-forwards existing working copies, in
/// registry order. Failures are reported per plugin and never stop the loop.
pub async fn fetch_plugins(runner: &dyn ToolRunner, config: &ProvisionConfig) -> Vec<PluginReport> {
    if config.registry.is_empty() {
        info!("No plugins to fetch");
        return Vec::new();
    }

    let plugins_dir = config.paths.plugins_dir();
    if let Err(error) = tokio::fs::create_dir_all(&plugins_dir).await {
        warn!("Could not create {}: {error}", plugins_dir.display());
    }

    let mut reports = Vec::with_capacity(config.registry.len());
    for plugin in &config.registry {
        let target = config.paths.plugin_dir(&plugin.name);
        let outcome = fetch_plugin(runner, plugin, &target).await;
        reports.push(PluginReport {
            name: plugin.name.clone(),
            outcome,
        });
    }
    reports
}

async fn fetch_plugin(runner: &dyn ToolRunner, plugin: &PluginSource, target: &Path) -> PluginOutcome {
    let target_arg = target.display().to_string();

    if target.join(".git").exists() {
        info!("Updating {}", plugin.name);
        let update = Invocation::new("git").args(["-C", target_arg.as_str(), "pull", "--ff-only"]);
        return match runner.run_checked(&update).await {
            Ok(()) => PluginOutcome::Updated,
            Err(error) => {
                warn!(
                    "Could not update {} (resolve manually in {}): {error}",
                    plugin.name, target_arg
                );
                PluginOutcome::UpdateFailed(error.to_string())
            }
        };
    }

    info!("Cloning {} from {}", plugin.name, plugin.url);
    let clone = Invocation::new("git").args([
        "clone",
        "--depth=1",
        plugin.url.as_str(),
        target_arg.as_str(),
    ]);
    match runner.run_checked(&clone).await {
        Ok(()) => PluginOutcome::Cloned,
        Err(error) => {
            warn!("Could not clone {}: {error}", plugin.name);
            PluginOutcome::CloneFailed(error.to_string())
        }
    }
}
