//! Exit code constants for the crawlctl CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, missing script, invalid config)
//! - 2: Process failure (crawler exited non-zero or timed out)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, missing script, or invalid config.
pub const USER_ERROR: i32 = 1;

/// Process failure: the crawler child process exited non-zero or was
/// killed after exceeding the timeout.
pub const PROCESS_FAILURE: i32 = 2;
