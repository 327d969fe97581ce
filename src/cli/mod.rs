//! CLI argument parsing for crawlctl.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};

/// Crawlctl: wrapper around an external Python website crawler.
///
/// The crawling logic lives in an external script. Crawlctl launches it
/// with the target URL, enforces a wall-clock timeout, and relays the
/// script's output to the terminal and to an append-only run log.
#[derive(Parser, Debug)]
#[command(name = "crawlctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for crawlctl.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Crawl a website and collect URLs.
    ///
    /// Launches the external crawler script with the target URL, streams
    /// its stdout/stderr line-by-line, and fails if the script exits
    /// non-zero or exceeds the timeout.
    Crawl(CrawlArgs),

    /// Diagnose the crawler environment.
    ///
    /// Checks that the interpreter is resolvable, the crawler script
    /// exists, and the log directory is usable.
    Doctor,

    /// Show recent records from the run log.
    Events(EventsArgs),
}

/// Arguments for the `crawl` command.
#[derive(Parser, Debug)]
pub struct CrawlArgs {
    /// Target URL, forwarded to the crawler script unmodified.
    pub url: String,

    /// Crawler script file name under the scripts directory.
    #[arg(long)]
    pub script: Option<String>,

    /// Timeout in seconds before the crawler is killed.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Print the child invocation without running it.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `events` command.
#[derive(Parser, Debug)]
pub struct EventsArgs {
    /// Number of records to show from the end of the log.
    #[arg(long, default_value_t = 10)]
    pub tail: usize,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
