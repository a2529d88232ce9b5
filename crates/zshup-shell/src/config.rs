use chrono::{DateTime, Local};
use log::{debug, info, warn};
use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::backup::{backup_timestamp, create_backup};
use crate::error::ConfigError;
use crate::transform::{
    append_guarded_sources, ensure_completion_init, join_lines,
    plugins_directive, remove_lines_containing, split_lines, upsert_plugins_directive,
};

/// Desired state of the managed parts of `.zshrc`.
#[derive(Debug, Clone, Default)]
pub struct ZshrcSpec {
    /// Written literally, in order, into `plugins=(...)`.
    pub enabled_plugins: Vec<String>,
    /// Scripts sourced explicitly at the end of the file, in load order.
    pub sourced_scripts: Vec<PathBuf>,
}

impl ZshrcSpec {
    fn script_file_names(&self) -> Vec<String> {
        self.sourced_scripts
            .iter()
            .filter_map(|script| script.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect()
    }
}

pub struct ZshrcConfig {
    pub path: PathBuf,
    pub content: String,
    pub existed: bool,
}

impl ZshrcConfig {
    /// A missing file loads as empty content.
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        let existed = path.exists();
        let content = if existed {
            fs::read_to_string(&path).map_err(|error| ConfigError::read(&path, error))?
        } else {
            String::new()
        };

        Ok(Self {
            path,
            content,
            existed,
        })
    }

    #[must_use]
    pub fn plan(&self, spec: &ZshrcSpec) -> ZshrcEdit {
        let mut changes = Vec::new();
        let lines = split_lines(&self.content);

        let directive = plugins_directive(&spec.enabled_plugins);
        let with_directive = upsert_plugins_directive(&lines, &directive);
        if with_directive != lines {
            changes.push(format!("Set {directive}"));
        }

        let with_completion = ensure_completion_init(&with_directive);
        if with_completion != with_directive {
            changes.push("Add completion system initialization".to_string());
        }

        let stripped = remove_lines_containing(&with_completion, &spec.script_file_names());
        let with_sources = append_guarded_sources(&stripped, &spec.sourced_scripts);
        if with_sources != with_completion {
            for script in &spec.sourced_scripts {
                changes.push(format!("Source {}", script.display()));
            }
        }

        let modified = join_lines(&with_sources);
        if modified != self.content && changes.is_empty() {
            changes.push("Normalize line endings".to_string());
        }

        ZshrcEdit {
            modified,
            changes,
        }
    }

    /// Atomically replaces the file: the new content goes to a temporary file
    /// next to the target, which is then renamed over it. A symlinked
    /// `.zshrc` is followed so the link itself survives.
    pub fn apply_edit(&mut self, edit: &ZshrcEdit) -> Result<(), ConfigError> {
        let target = if self.existed {
            fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone())
        } else {
            self.path.clone()
        };
        let parent = target
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        fs::create_dir_all(parent).map_err(|error| ConfigError::write(parent, error))?;

        let mut staged =
            tempfile::NamedTempFile::new_in(parent).map_err(|error| ConfigError::write(parent, error))?;
        staged
            .write_all(edit.modified.as_bytes())
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|error| ConfigError::write(staged.path(), error))?;

        if let Ok(metadata) = fs::metadata(&target)
            && let Err(error) = fs::set_permissions(staged.path(), metadata.permissions())
        {
            warn!(
                "Could not carry permissions of {} over to the new file: {error}",
                target.display()
            );
        }

        staged
            .persist(&target)
            .map_err(|error| ConfigError::write(&target, error.error))?;
        debug!("Replaced {}", target.display());

        self.content.clone_from(&edit.modified);
        self.existed = true;
        Ok(())
    }
}

pub struct ZshrcEdit {
    pub modified: String,
    pub changes: Vec<String>,
}

impl ZshrcEdit {
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    #[must_use]
    pub fn diff_preview(&self) -> String {
        if !self.has_changes() {
            return "No changes needed.".to_string();
        }

        let mut preview = String::new();

        for change in &self.changes {
            let _ = writeln!(preview, "+ {change}");
        }

        preview
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZshrcUpdate {
    pub backup: Option<PathBuf>,
    pub changes: Vec<String>,
}

/// Backs up `path` (when it exists), converges it toward `spec` and writes it
/// back only if something changed.
pub fn update_zshrc(
    path: &Path,
    backup_prefix: &Path,
    spec: &ZshrcSpec,
    now: DateTime<Local>,
) -> Result<ZshrcUpdate, ConfigError> {
    let mut config = ZshrcConfig::load(path.to_path_buf())?;

    let backup = if config.existed {
        Some(create_backup(path, backup_prefix, &backup_timestamp(now))?)
    } else {
        info!("{} does not exist yet, creating it", path.display());
        None
    };

    let edit = config.plan(spec);
    if edit.has_changes() || !config.existed {
        config.apply_edit(&edit)?;
        info!("Updated {}:\n{}", path.display(), edit.diff_preview().trim_end());
    } else {
        info!("{} already up to date", path.display());
    }

    Ok(ZshrcUpdate {
        backup,
        changes: edit.changes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{COMPLETION_INIT_LINE, guarded_source_line};

    fn spec() -> ZshrcSpec {
        ZshrcSpec {
            enabled_plugins: vec!["git".to_string(), "zsh-autosuggestions".to_string()],
            sourced_scripts: vec![
                PathBuf::from("/c/plugins/zsh-autosuggestions/zsh-autosuggestions.zsh"),
                PathBuf::from("/c/plugins/zsh-syntax-highlighting/zsh-syntax-highlighting.zsh"),
            ],
        }
    }

    fn create_test_config(content: &str) -> ZshrcConfig {
        ZshrcConfig {
            path: PathBuf::from("/test/.zshrc"),
            content: content.to_string(),
            existed: true,
        }
    }

    #[test]
    fn plan_on_empty_file_builds_full_layout() {
        let edit = create_test_config("").plan(&spec());
        let spec = spec();

        assert_eq!(
            edit.modified,
            format!(
                "plugins=(git zsh-autosuggestions)\n\n\n# Initialize zsh completion system\n{COMPLETION_INIT_LINE}\n\n{}\n{}\n",
                guarded_source_line(&spec.sourced_scripts[0]),
                guarded_source_line(&spec.sourced_scripts[1]),
            )
        );
        assert_eq!(edit.changes.len(), 4);
    }

    #[test]
    fn plan_is_idempotent() {
        let first = create_test_config("export EDITOR=vim\nplugins=(git)\n").plan(&spec());
        let second = create_test_config(&first.modified).plan(&spec());

        assert_eq!(second.modified, first.modified);
        assert!(!second.has_changes());
    }

    #[test]
    fn plan_replaces_stale_source_lines() {
        let content = "plugins=(git)\nsource ~/old/zsh-syntax-highlighting.zsh\nexport EDITOR=vim\nsource ~/old/zsh-autosuggestions.zsh\n";

        let edit = create_test_config(content).plan(&spec());

        assert!(!edit.modified.contains("~/old"));
        let lines: Vec<&str> = edit.modified.lines().collect();
        let suggest = lines
            .iter()
            .position(|line| line.contains("zsh-autosuggestions.zsh"))
            .expect("suggestion line present");
        let highlight = lines
            .iter()
            .position(|line| line.contains("zsh-syntax-highlighting.zsh"))
            .expect("highlighting line present");
        assert!(suggest < highlight);
        assert_eq!(highlight, lines.len() - 1);
    }

    #[test]
    fn diff_preview_lists_changes() {
        let edit = create_test_config("").plan(&spec());
        assert!(edit.diff_preview().contains("+ Set plugins=(git zsh-autosuggestions)"));
    }

    #[test]
    fn diff_preview_without_changes() {
        let edit = ZshrcEdit {
            modified: "same".to_string(),
            changes: vec![],
        };
        assert_eq!(edit.diff_preview(), "No changes needed.");
    }
}
