mod paths;
mod provision;

pub use paths::{AppPaths, AppPathsError};
pub use provision::{ProvisionPaths, ZSH_CUSTOM_ENV};
