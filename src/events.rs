//! Run log for crawlctl.
//!
//! This module implements the append-only run log. Records are stored in
//! NDJSON format (one JSON object per line) in `<home>/logs/events.ndjson`.
//!
//! # Record Format
//!
//! Each record is a JSON object with the following fields:
//! - `ts`: RFC3339 timestamp
//! - `action`: The action recorded (crawl_start, stdout, stderr, ...)
//! - `actor`: The owner string (e.g., `user@HOST`)
//! - `url`: Optional target URL for crawl-specific records
//! - `details`: Freeform object with action-specific details
//!
//! Child output is recorded one record per line, with ANSI escape
//! sequences already stripped by the caller. Appends are create-if-missing;
//! the file is assumed safe for concurrent append.

use crate::context::CrawlContext;
use crate::error::{CrawlError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;

/// Actions that can be recorded in the run log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Crawl started, child process spawned
    CrawlStart,
    /// One line of child stdout
    Stdout,
    /// One line of child stderr
    Stderr,
    /// Child exited 0 within the timeout
    CrawlComplete,
    /// Child exited non-zero or timed out
    CrawlFailed,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // f.pad so callers can column-align with a width spec.
        f.pad(match self {
            EventAction::CrawlStart => "crawl_start",
            EventAction::Stdout => "stdout",
            EventAction::Stderr => "stderr",
            EventAction::CrawlComplete => "crawl_complete",
            EventAction::CrawlFailed => "crawl_failed",
        })
    }
}

/// A record for the run log.
///
/// Records are serialized as single-line JSON objects and appended to
/// the events.ndjson file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the record was created.
    pub ts: DateTime<Utc>,

    /// The action that was recorded.
    pub action: EventAction,

    /// The actor who ran the command (e.g., `user@HOST`).
    pub actor: String,

    /// Optional target URL for crawl-specific records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new record with the given action.
    ///
    /// The timestamp is set to the current time, and the actor is
    /// determined from the environment (USER@HOSTNAME).
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: get_actor_string(),
            url: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the target URL for this record.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the details object for this record.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the record to a single-line JSON string.
    ///
    /// This is used for NDJSON format where each line is a complete JSON object.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            CrawlError::UserError(format!("failed to serialize record to JSON: {}", e))
        })
    }
}

/// Get the actor string for record metadata.
fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append a record to the run log.
///
/// The record is appended as a single JSON line to the events.ndjson file.
/// The file and the log directory are created if they don't exist. Each
/// append results in one line with a trailing newline.
pub fn append_event(ctx: &CrawlContext, event: &Event) -> Result<()> {
    let events_file = ctx.events_file();

    // Serialize the record to a single-line JSON string
    let json_line = event.to_ndjson_line()?;

    // Ensure the log directory exists
    let logs_dir = ctx.logs_dir();
    if !logs_dir.exists() {
        fs::create_dir_all(&logs_dir).map_err(|e| {
            CrawlError::UserError(format!(
                "failed to create log directory '{}': {}",
                logs_dir.display(),
                e
            ))
        })?;
    }

    // Open the file in append mode, creating it if it doesn't exist
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&events_file)
        .map_err(|e| {
            CrawlError::UserError(format!(
                "failed to open run log '{}': {}",
                events_file.display(),
                e
            ))
        })?;

    // Write the JSON line with trailing newline
    writeln!(file, "{}", json_line).map_err(|e| {
        CrawlError::UserError(format!(
            "failed to write record to '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    Ok(())
}

/// Read the last `n` records from the run log.
///
/// Returns an empty vec when the log does not exist. Lines that fail to
/// parse are skipped so a partially corrupted log can still be inspected.
pub fn read_last_events(ctx: &CrawlContext, n: usize) -> Result<Vec<Event>> {
    let events_file = ctx.events_file();
    if !events_file.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&events_file).map_err(|e| {
        CrawlError::UserError(format!(
            "failed to read run log '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    let events: Vec<Event> = content
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect();

    let skip = events.len().saturating_sub(n);
    Ok(events.into_iter().skip(skip).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_context() -> (TempDir, CrawlContext) {
        let temp_dir = TempDir::new().unwrap();
        let ctx = CrawlContext::resolve_from(temp_dir.path());
        (temp_dir, ctx)
    }

    #[test]
    fn test_event_creation() {
        let event = Event::new(EventAction::CrawlStart);

        assert_eq!(event.action, EventAction::CrawlStart);
        assert!(!event.actor.is_empty());
        assert!(event.url.is_none());
        // Timestamp should be recent (within last minute)
        let age = Utc::now().signed_duration_since(event.ts);
        assert!(age.num_minutes() < 1);
    }

    #[test]
    fn test_event_with_url() {
        let event = Event::new(EventAction::CrawlStart).with_url("https://example.com");

        assert_eq!(event.action, EventAction::CrawlStart);
        assert_eq!(event.url, Some("https://example.com".to_string()));
    }

    #[test]
    fn test_event_serialization() {
        let event = Event::new(EventAction::Stdout)
            .with_url("https://example.com")
            .with_details(json!({"line": "ID: 1 - URL: https://example.com/"}));

        let json_line = event.to_ndjson_line().unwrap();

        // Should be valid JSON
        let parsed: Event = serde_json::from_str(&json_line).unwrap();
        assert_eq!(parsed.action, EventAction::Stdout);
        assert_eq!(parsed.url, Some("https://example.com".to_string()));
        assert_eq!(parsed.details["line"], "ID: 1 - URL: https://example.com/");

        // Should not contain newlines (single line)
        assert!(!json_line.contains('\n'));
    }

    #[test]
    fn test_event_action_serialization() {
        // Verify that actions serialize to snake_case
        let event = Event::new(EventAction::CrawlComplete);
        let json_line = event.to_ndjson_line().unwrap();
        assert!(json_line.contains("\"crawl_complete\""));

        let event = Event::new(EventAction::Stderr);
        let json_line = event.to_ndjson_line().unwrap();
        assert!(json_line.contains("\"stderr\""));
    }

    #[test]
    fn test_event_without_url_omits_field() {
        let event = Event::new(EventAction::CrawlStart);
        let json_line = event.to_ndjson_line().unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json_line).unwrap();
        assert!(parsed.get("url").is_none());
    }

    #[test]
    fn test_append_event_creates_file_and_dir() {
        let (_temp_dir, ctx) = create_test_context();
        let events_file = ctx.events_file();

        assert!(!ctx.logs_dir().exists());
        assert!(!events_file.exists());

        let event = Event::new(EventAction::CrawlStart).with_url("https://example.com");
        append_event(&ctx, &event).unwrap();

        assert!(events_file.exists());

        let content = fs::read_to_string(&events_file).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);

        let parsed: Event = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed.action, EventAction::CrawlStart);
    }

    #[test]
    fn test_append_event_multiple_lines() {
        let (_temp_dir, ctx) = create_test_context();

        let event1 = Event::new(EventAction::CrawlStart);
        append_event(&ctx, &event1).unwrap();

        let event2 = Event::new(EventAction::Stdout).with_details(json!({"line": "hello"}));
        append_event(&ctx, &event2).unwrap();

        let content = fs::read_to_string(ctx.events_file()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed1: Event = serde_json::from_str(lines[0]).unwrap();
        let parsed2: Event = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed1.action, EventAction::CrawlStart);
        assert_eq!(parsed2.action, EventAction::Stdout);
        assert_eq!(parsed2.details["line"], "hello");
    }

    #[test]
    fn test_append_event_trailing_newline() {
        let (_temp_dir, ctx) = create_test_context();

        let event = Event::new(EventAction::CrawlStart);
        append_event(&ctx, &event).unwrap();

        let content = fs::read_to_string(ctx.events_file()).unwrap();
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn test_read_last_events_missing_log() {
        let (_temp_dir, ctx) = create_test_context();
        let events = read_last_events(&ctx, 10).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_read_last_events_tails() {
        let (_temp_dir, ctx) = create_test_context();

        for i in 0..5 {
            let event = Event::new(EventAction::Stdout).with_details(json!({"line": i}));
            append_event(&ctx, &event).unwrap();
        }

        let events = read_last_events(&ctx, 2).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].details["line"], 3);
        assert_eq!(events[1].details["line"], 4);
    }

    #[test]
    fn test_read_last_events_skips_corrupt_lines() {
        let (_temp_dir, ctx) = create_test_context();

        let event = Event::new(EventAction::CrawlComplete);
        append_event(&ctx, &event).unwrap();

        // Append a corrupted line directly
        let mut file = OpenOptions::new()
            .append(true)
            .open(ctx.events_file())
            .unwrap();
        writeln!(file, "{{not json").unwrap();

        let events = read_last_events(&ctx, 10).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, EventAction::CrawlComplete);
    }

    #[test]
    fn test_event_action_display() {
        assert_eq!(format!("{}", EventAction::CrawlStart), "crawl_start");
        assert_eq!(format!("{}", EventAction::Stdout), "stdout");
        assert_eq!(format!("{}", EventAction::Stderr), "stderr");
        assert_eq!(format!("{}", EventAction::CrawlComplete), "crawl_complete");
        assert_eq!(format!("{}", EventAction::CrawlFailed), "crawl_failed");
    }

    #[test]
    fn test_event_action_display_honors_width() {
        assert_eq!(format!("{:<14}", EventAction::Stdout), "stdout        ");
    }

    #[test]
    fn test_get_actor_string() {
        let actor = get_actor_string();
        assert!(actor.contains('@'));
        assert!(!actor.is_empty());
    }
}
