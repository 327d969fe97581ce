//! Implementation of the `crawlctl crawl` command.
//!
//! This is the process wrapper: it launches the external crawler script
//! with the target URL as the sole extra argument, streams the script's
//! output to the terminal and the run log, and fails with a process
//! failure when the script exits non-zero or exceeds the timeout.

use crate::cli::CrawlArgs;
use crate::config::Config;
use crate::context::CrawlContext;
use crate::error::{CrawlError, Result};
use crate::events::{Event, EventAction, append_event};
use crate::runner::{OutputStream, run_crawler, strip_ansi};
use serde_json::json;
use std::io::{self, Write};
use std::time::Duration;

/// Execute the `crawlctl crawl` command.
pub fn cmd_crawl(args: CrawlArgs) -> Result<()> {
    let ctx = CrawlContext::resolve()?;
    let config = Config::load(&ctx.config_path())?;
    let stdout = io::stdout();
    run_with_context(&ctx, &config, &args, &mut stdout.lock())
}

/// Run a crawl against an explicit context and config.
///
/// `term` receives the wrapper's own messages and the terminal copy of the
/// child's stdout (colors intact). Split from `cmd_crawl` so tests can
/// drive it with a temp home and observe the terminal output.
pub(crate) fn run_with_context(
    ctx: &CrawlContext,
    config: &Config,
    args: &CrawlArgs,
    term: &mut dyn Write,
) -> Result<()> {
    if args.url.is_empty() {
        return Err(CrawlError::UserError(
            "URL must not be empty.\n\nUsage: crawlctl crawl <URL>".to_string(),
        ));
    }

    let script_name = args.script.as_deref().unwrap_or(&config.script);
    let script_path = ctx.script_path(script_name);
    if !script_path.exists() {
        return Err(CrawlError::UserError(format!(
            "crawler script not found at '{}'.\n\n\
             Place the script under '{}' or pass --script.",
            script_path.display(),
            ctx.scripts_dir().display()
        )));
    }

    // Interpreter may carry flags, e.g. "python3 -u".
    let interpreter = shell_words::split(&config.interpreter).map_err(|e| {
        CrawlError::UserError(format!(
            "failed to parse interpreter '{}': {}\n\
             Fix: check for unmatched quotes in config.yaml.",
            config.interpreter, e
        ))
    })?;
    let Some((program, interpreter_flags)) = interpreter.split_first() else {
        return Err(CrawlError::UserError(
            "interpreter must not be empty".to_string(),
        ));
    };

    // `<interpreter> <script-path> <url>`: the URL is forwarded unmodified
    // as a single argument.
    let mut child_args: Vec<String> = interpreter_flags.to_vec();
    child_args.push(script_path.to_string_lossy().to_string());
    child_args.push(args.url.clone());

    let timeout = Duration::from_secs(args.timeout.unwrap_or(config.timeout_seconds));
    let poll_interval = Duration::from_millis(config.poll_interval_ms);

    if args.dry_run {
        let _ = writeln!(
            term,
            "{}",
            shell_words::join(
                std::iter::once(program.as_str()).chain(child_args.iter().map(|a| a.as_str()))
            )
        );
        return Ok(());
    }

    // Terminal writes are best-effort: a closed terminal must not abort a
    // running crawl, same as a failed log append.
    let _ = writeln!(term, "Starting crawler for URL: {}", args.url);
    let _ = writeln!(term, "Script: {}", script_path.display());

    let start_event = Event::new(EventAction::CrawlStart)
        .with_url(&args.url)
        .with_details(json!({
            "interpreter": config.interpreter,
            "script": script_path.to_string_lossy(),
            "timeout_seconds": timeout.as_secs(),
        }));
    log_event(ctx, &start_event);

    let outcome = run_crawler(
        program,
        &child_args,
        timeout,
        poll_interval,
        &mut |stream, line| match stream {
            OutputStream::Stdout => {
                // Terminal copy keeps its ANSI colors; the log copy is stripped.
                let _ = writeln!(term, "{}", line);
                let event = Event::new(EventAction::Stdout)
                    .with_url(&args.url)
                    .with_details(json!({"line": strip_ansi(line)}));
                log_event(ctx, &event);
            }
            OutputStream::Stderr => {
                eprintln!("{}", line);
                let event = Event::new(EventAction::Stderr)
                    .with_url(&args.url)
                    .with_details(json!({"line": strip_ansi(line)}));
                log_event(ctx, &event);
            }
        },
    )?;

    if outcome.is_success() {
        let complete_event = Event::new(EventAction::CrawlComplete)
            .with_url(&args.url)
            .with_details(json!({
                "exit_code": outcome.exit_code,
                "duration_ms": outcome.duration.as_millis() as u64,
            }));
        log_event(ctx, &complete_event);

        let _ = writeln!(term, "Python proceso completado");
        return Ok(());
    }

    let failed_event = Event::new(EventAction::CrawlFailed)
        .with_url(&args.url)
        .with_details(json!({
            "command": outcome.command,
            "exit_code": outcome.exit_code,
            "duration_ms": outcome.duration.as_millis() as u64,
            "timed_out": outcome.timed_out,
        }));
    log_event(ctx, &failed_event);

    Err(CrawlError::ProcessFailure {
        command: outcome.command,
        exit_code: outcome.exit_code,
        timed_out: outcome.timed_out,
    })
}

/// Best-effort append to the run log.
///
/// The log is a collaborator, not the product of the crawl, so a failed
/// append must not abort a running crawl.
fn log_event(ctx: &CrawlContext, event: &Event) {
    if let Err(e) = append_event(ctx, event) {
        eprintln!("Warning: failed to log {} record: {}", event.action, e);
    }
}
