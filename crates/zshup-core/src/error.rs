use thiserror::Error;
use zshup_exec::ToolError;
use zshup_shell::ConfigError;

#[derive(Error, Debug)]
pub enum StageError {
    #[error("zsh is not installed and no supported package manager was found (tried: {tried})")]
    NoPackageManager { tried: String },

    #[error("zsh is still missing after installing it with {manager}")]
    InterpreterMissingAfterInstall { manager: &'static str },

    #[error("neither curl nor wget is available to download the Oh My Zsh installer")]
    NoHttpClient,

    #[error("Oh My Zsh installation failed during {phase}: {source}")]
    FrameworkInstall {
        phase: &'static str,
        #[source]
        source: ToolError,
    },

    #[error("could not resolve the installed zsh binary")]
    InterpreterUnresolved,

    #[error("changing the login shell failed: {0}")]
    ChangeShell(#[source] ToolError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl StageError {
    pub(crate) fn framework_install(phase: &'static str, source: ToolError) -> Self {
        Self::FrameworkInstall { phase, source }
    }
}
