//! Error types for the crawlctl CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for crawlctl operations.
///
/// Each variant maps to a specific exit code. `ProcessFailure` is the single
/// failure kind for the crawler child process: a non-zero exit and a timeout
/// kill are surfaced the same way.
#[derive(Error, Debug)]
pub enum CrawlError {
    /// User provided invalid arguments or the environment is in an invalid state.
    #[error("{0}")]
    UserError(String),

    /// The crawler child process exited non-zero or was killed on timeout.
    #[error("{}", failure_summary(.command, .exit_code, .timed_out))]
    ProcessFailure {
        /// The full command line that was executed.
        command: String,
        /// Exit code of the child (None when killed).
        exit_code: Option<i32>,
        /// Whether the timeout fired and the child was killed.
        timed_out: bool,
    },
}

impl CrawlError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            CrawlError::UserError(_) => exit_codes::USER_ERROR,
            CrawlError::ProcessFailure { .. } => exit_codes::PROCESS_FAILURE,
        }
    }
}

fn failure_summary(command: &str, exit_code: &Option<i32>, timed_out: &bool) -> String {
    if *timed_out {
        return format!("crawler process `{}` timed out and was killed", command);
    }
    match exit_code {
        Some(code) => format!("crawler process `{}` exited with code {}", command, code),
        None => format!("crawler process `{}` terminated without an exit code", command),
    }
}

/// Result type alias for crawlctl operations.
pub type Result<T> = std::result::Result<T, CrawlError>;
