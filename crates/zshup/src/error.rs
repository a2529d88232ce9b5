use thiserror::Error;
use zshup_core::StageError;
use zshup_platform::AppPathsError;

use crate::single_instance::AcquireError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to resolve directories: {0}")]
    Paths(#[from] AppPathsError),

    #[error(transparent)]
    Instance(#[from] AcquireError),

    #[error("{stage} failed: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: StageError,
    },
}

impl AppError {
    pub fn stage(stage: &'static str, source: StageError) -> Self {
        Self::Stage { stage, source }
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;
    use zshup_core::StageError;
    use zshup_platform::AppPathsError;

    #[test]
    fn stage_error_names_the_stage() {
        let error = AppError::stage("Oh My Zsh installation", StageError::NoHttpClient);

        assert_eq!(
            error.to_string(),
            "Oh My Zsh installation failed: neither curl nor wget is available to download the Oh My Zsh installer"
        );
    }

    #[test]
    fn paths_error_converts() {
        let error = AppError::from(AppPathsError::HomeDirUnavailable);

        assert_eq!(
            error.to_string(),
            "failed to resolve directories: Could not determine home directory"
        );
    }
}
