//! Configuration for installation runs
//!
//! Everything the pipeline needs to know is carried in this value and passed
//! into constructors explicitly; there is no process-wide state.

use std::path::PathBuf;
use std::time::Duration;

use super::core::InstallMode;

/// Configuration for one installer instance
#[derive(Debug, Clone)]
pub struct InstallConfig {
    /// Directory under which install directories are created
    pub output_root: PathBuf,
    pub mode: InstallMode,
    /// Fixed identifying user-agent sent with every request
    pub user_agent: String,
    /// Bound on concurrent asset downloads; kept small for remote-host courtesy
    pub max_concurrent_downloads: usize,
    pub timeout: Duration,
}

impl InstallConfig {
    pub fn with_output_root<P: Into<PathBuf>>(mut self, output_root: P) -> Self {
        self.output_root = output_root.into();
        self
    }

    pub fn with_mode(mut self, mode: InstallMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_max_concurrent_downloads(mut self, max: usize) -> Self {
        self.max_concurrent_downloads = max.max(1);
        self
    }
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("."),
            mode: InstallMode::Client,
            user_agent: concat!("unpacker/", env!("CARGO_PKG_VERSION")).to_string(),
            max_concurrent_downloads: 4,
            timeout: Duration::from_secs(30),
        }
    }
}
