//! Command implementations for crawlctl.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations.

mod crawl;
mod doctor;
mod events_cmd;

use crate::cli::Command;
use crate::error::Result;

/// Dispatch a command to its implementation.
///
/// This is the main entry point for command execution. Each command
/// is routed to its handler function.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Crawl(args) => crawl::cmd_crawl(args),
        Command::Doctor => doctor::cmd_doctor(),
        Command::Events(args) => events_cmd::cmd_events(args),
    }
}
