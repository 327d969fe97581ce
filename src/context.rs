//! Home directory resolution for crawlctl.
//!
//! All commands locate the crawler home the same way: `$CRAWLCTL_HOME` if
//! set, otherwise the current working directory. The home holds the config
//! file, the scripts directory, and the run log. Resolving paths through
//! this module ensures every command targets the same layout regardless of
//! where it was invoked from.

use crate::error::{CrawlError, Result};
use std::env;
use std::path::PathBuf;

/// Environment variable overriding the crawler home directory.
pub const HOME_ENV_VAR: &str = "CRAWLCTL_HOME";

/// Scripts directory name within the home.
pub const SCRIPTS_DIR: &str = "scripts";

/// Log directory name within the home.
pub const LOGS_DIR: &str = "logs";

/// Resolved paths for the crawlctl home.
///
/// All paths derive from the home directory.
#[derive(Debug, Clone)]
pub struct CrawlContext {
    /// Path to the crawler home directory.
    pub home: PathBuf,
}

impl CrawlContext {
    /// Resolve the context from the environment.
    ///
    /// Uses `$CRAWLCTL_HOME` when set, falling back to the current
    /// working directory.
    pub fn resolve() -> Result<Self> {
        if let Some(home) = env::var_os(HOME_ENV_VAR) {
            return Ok(Self::resolve_from(PathBuf::from(home)));
        }

        let cwd = env::current_dir().map_err(|e| {
            CrawlError::UserError(format!("failed to get current working directory: {}", e))
        })?;

        Ok(Self::resolve_from(cwd))
    }

    /// Resolve the context from a specific home directory.
    ///
    /// This is useful for testing or when the home is known.
    pub fn resolve_from(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Get the path to the scripts directory.
    pub fn scripts_dir(&self) -> PathBuf {
        self.home.join(SCRIPTS_DIR)
    }

    /// Get the path to a crawler script by file name.
    pub fn script_path(&self, name: &str) -> PathBuf {
        self.scripts_dir().join(name)
    }

    /// Get the path to the log directory.
    pub fn logs_dir(&self) -> PathBuf {
        self.home.join(LOGS_DIR)
    }

    /// Get the path to the run log file.
    pub fn events_file(&self) -> PathBuf {
        self.logs_dir().join("events.ndjson")
    }

    /// Get the path to the config file.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.yaml")
    }
}
