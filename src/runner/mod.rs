//! Child process execution for the crawler script.
//!
//! The executor spawns the external crawler, streams its output line-by-line,
//! and enforces a wall-clock timeout. ANSI stripping lives here too since it
//! is only applied to the log copy of the child's output.

mod ansi;
mod executor;

pub use ansi::strip_ansi;
pub use executor::{CrawlOutcome, OutputStream, run_crawler};
