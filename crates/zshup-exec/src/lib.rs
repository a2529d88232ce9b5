//! Process boundary for zshup.
//!
//! Every external tool the provisioning stages touch (package managers, git,
//! curl/wget, sh, chsh) is reached through [`ToolRunner`], so callers can swap
//! the real [`SystemRunner`] for a recording fake in tests.

mod error;
mod system;
mod traits;

#[cfg(any(test, feature = "testing"))]
pub mod fake;

pub use error::ToolError;
pub use system::SystemRunner;
pub use traits::{Invocation, RunStatus, ToolRunner};
