use chrono::{DateTime, Local};
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

const MAX_COLLISION_SUFFIX: u32 = 100;

#[must_use]
pub fn backup_timestamp(now: DateTime<Local>) -> String {
    now.format("%Y%m%d%H%M%S").to_string()
}

/// Copies `source` verbatim to `<prefix><timestamp>`.
///
/// Existing backups are never overwritten: when the name is taken (two runs
/// within the same second) `-1`, `-2`, ... is appended instead.
pub fn create_backup(source: &Path, prefix: &Path, timestamp: &str) -> Result<PathBuf, ConfigError> {
    let mut input = File::open(source).map_err(|error| ConfigError::read(source, error))?;

    for attempt in 0..=MAX_COLLISION_SUFFIX {
        let candidate = backup_path(prefix, timestamp, attempt);
        let mut output = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(file) => file,
            Err(error) if error.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(error) => return Err(ConfigError::backup(candidate, error)),
        };

        std::io::copy(&mut input, &mut output)
            .and_then(|_| output.sync_all())
            .map_err(|error| ConfigError::backup(&candidate, error))?;

        log::info!("Backed up {} to {}", source.display(), candidate.display());
        return Ok(candidate);
    }

    Err(ConfigError::BackupNameExhausted(backup_path(
        prefix, timestamp, 0,
    )))
}

fn backup_path(prefix: &Path, timestamp: &str, attempt: u32) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(timestamp);
    if attempt > 0 {
        name.push(format!("-{attempt}"));
    }
    PathBuf::from(name)
}
