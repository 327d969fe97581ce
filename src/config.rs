//! Configuration model for crawlctl.
//!
//! This module defines the Config struct that represents `<home>/config.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! sensible defaults for optional fields, and validation of config values.
//! A missing config file yields the defaults.

use crate::error::{CrawlError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the crawler wrapper.
///
/// This struct represents the contents of `<home>/config.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interpreter used to run the crawler script (default: "python3").
    /// May contain flags, e.g. "python3 -u"; split with shell-words
    /// at invocation time.
    pub interpreter: String,

    /// Default crawler script file name under the scripts directory.
    pub script: String,

    /// Wall-clock timeout for a crawl, in seconds.
    pub timeout_seconds: u64,

    /// Interval between child exit checks in the wait loop, in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            script: "crawlerjs.py".to_string(),
            timeout_seconds: 3600,
            poll_interval_ms: 100,
        }
    }
}

impl Config {
    /// Load config from the given path.
    ///
    /// A missing file yields the defaults; a malformed file or invalid
    /// values are a user error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            CrawlError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            CrawlError::UserError(format!(
                "failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate config values.
    pub fn validate(&self) -> Result<()> {
        if self.interpreter.trim().is_empty() {
            return Err(CrawlError::UserError(
                "config error: interpreter must not be empty".to_string(),
            ));
        }
        if self.script.trim().is_empty() {
            return Err(CrawlError::UserError(
                "config error: script must not be empty".to_string(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(CrawlError::UserError(
                "config error: timeout_seconds must be at least 1".to_string(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(CrawlError::UserError(
                "config error: poll_interval_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
