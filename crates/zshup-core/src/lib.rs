//! The five provisioning stages, in the order the entry point runs them:
//! - [`ensure_interpreter`]: install zsh through the first available
//!   package manager.
//! - [`ensure_framework`]: run the Oh My Zsh bootstrap installer.
//! - [`fetch_plugins`]: clone or fast-forward every registry plugin.
//! - [`update_configuration`]: converge `.zshrc` toward the enabled plugins.
//! - [`switch_login_shell`]: make zsh the login shell.

mod config;
mod configure;
mod error;
mod framework;
mod interpreter;
mod login_shell;
mod plugins;
mod registry;

pub use config::{FRAMEWORK_INSTALLER_URL, INTERPRETER, ProvisionConfig};
pub use configure::update_configuration;
pub use error::StageError;
pub use framework::{FrameworkStatus, HttpTool, ensure_framework};
pub use interpreter::{InterpreterStatus, PackageManager, ensure_interpreter};
pub use login_shell::{LoginShellStatus, switch_login_shell};
pub use plugins::{PluginOutcome, PluginReport, fetch_plugins};
pub use registry::{
    AUTOSUGGESTIONS, PluginSource, SYNTAX_HIGHLIGHTING, default_registry, enabled_plugins,
    merge_registry,
};
