use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to back up {path}: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no free backup name left for {0}")]
    BackupNameExhausted(PathBuf),
}

impl ConfigError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn backup(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Backup {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::ConfigError;

    #[test]
    fn write_error_names_the_file() {
        let error = ConfigError::write(
            "/home/ada/.zshrc",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );

        assert_eq!(error.to_string(), "failed to write /home/ada/.zshrc: denied");
    }

    #[test]
    fn exhausted_error_names_the_prefix() {
        let error = ConfigError::BackupNameExhausted(PathBuf::from("/home/ada/.zshrc.backup.1"));

        assert_eq!(
            error.to_string(),
            "no free backup name left for /home/ada/.zshrc.backup.1"
        );
    }
}
