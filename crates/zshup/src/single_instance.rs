use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

use fs2::FileExt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("another zshup run is already in progress")]
    AlreadyRunning,
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl AcquireError {
    fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }
}

/// Exclusive lock held for the whole run so two invocations never edit
/// `.zshrc` at the same time. Released when dropped.
pub struct SingleInstance {
    _file: File,
}

impl SingleInstance {
    pub fn acquire(lock_file_path: &Path) -> Result<Self, AcquireError> {
        if let Some(parent) = lock_file_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|error| AcquireError::io("failed to create lock directory", error))?;
        }

        let mut lock_file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(lock_file_path)
            .map_err(|error| AcquireError::io("failed to open lock file", error))?;

        match lock_file.try_lock_exclusive() {
            Ok(()) => {}
            Err(error) if error.kind() == std::io::ErrorKind::WouldBlock => {
                return Err(AcquireError::AlreadyRunning);
            }
            Err(error) => {
                return Err(AcquireError::io("failed to acquire lock", error));
            }
        }

        lock_file
            .set_len(0)
            .and_then(|()| lock_file.seek(SeekFrom::Start(0)).map(|_| ()))
            .and_then(|()| writeln!(lock_file, "{}", std::process::id()))
            .map_err(|error| AcquireError::io("failed to write lock metadata", error))?;

        Ok(Self { _file: lock_file })
    }
}

#[cfg(test)]
mod tests {
    use super::{AcquireError, SingleInstance};

    #[test]
    fn acquire_writes_pid() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let lock = dir.path().join("nested").join("zshup.lock");

        let _instance = SingleInstance::acquire(&lock).expect("first acquire succeeds");

        let pid = std::fs::read_to_string(&lock).expect("read lock file");
        assert_eq!(pid.trim(), std::process::id().to_string());
    }

    #[test]
    fn second_acquire_is_rejected_until_release() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let lock = dir.path().join("zshup.lock");

        let first = SingleInstance::acquire(&lock).expect("first acquire succeeds");
        assert!(matches!(
            SingleInstance::acquire(&lock),
            Err(AcquireError::AlreadyRunning)
        ));

        drop(first);
        assert!(SingleInstance::acquire(&lock).is_ok());
    }
}
