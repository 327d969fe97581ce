//! Implementation of the `crawlctl events` command.
//!
//! Prints the tail of the run log in a human-readable form.

use crate::cli::EventsArgs;
use crate::context::CrawlContext;
use crate::error::Result;
use crate::events::{Event, read_last_events};

/// Execute the `crawlctl events` command.
pub fn cmd_events(args: EventsArgs) -> Result<()> {
    let ctx = CrawlContext::resolve()?;
    let events = read_last_events(&ctx, args.tail)?;

    if events.is_empty() {
        println!("No records in the run log.");
        return Ok(());
    }

    for event in &events {
        println!("{}", format_event(event));
    }
    Ok(())
}

/// Render one record as a single line.
fn format_event(event: &Event) -> String {
    let ts = event.ts.format("%Y-%m-%d %H:%M:%S UTC");
    let url = event.url.as_deref().unwrap_or("-");

    // Child output records carry the line itself; lifecycle records carry
    // a details object.
    let details = match event.details.get("line").and_then(|v| v.as_str()) {
        Some(line) => line.to_string(),
        None => event.details.to_string(),
    };

    format!("{}  {:<14}  {}  {}", ts, event.action, url, details)
}
