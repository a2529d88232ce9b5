#![allow(clippy::missing_errors_doc)]

mod backup;
mod config;
mod error;
pub mod transform;

pub use backup::{backup_timestamp, create_backup};
pub use config::{ZshrcConfig, ZshrcEdit, ZshrcSpec, ZshrcUpdate, update_zshrc};
pub use error::ConfigError;
