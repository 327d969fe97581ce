//! Crawler subprocess executor.
//!
//! Spawns the external crawler, streams its stdout/stderr line-by-line to a
//! caller-supplied sink, and enforces a wall-clock timeout with a polling
//! wait loop. The child is killed when the timeout fires.

use crate::error::{CrawlError, Result};
use std::io::{BufRead, BufReader, Read};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Which stream a line of child output arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// Result of running the crawler child process.
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Exit code of the process (None if killed or didn't exit normally).
    pub exit_code: Option<i32>,
    /// Duration of execution.
    pub duration: Duration,
    /// Whether the process was killed due to timeout.
    pub timed_out: bool,
    /// The command that was executed (for logging).
    pub command: String,
}

impl CrawlOutcome {
    /// Check if the crawler execution was successful.
    pub fn is_success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// How long to keep draining buffered output after a timeout kill.
const DETACH_GRACE: Duration = Duration::from_millis(200);

/// Run the crawler child process, streaming its output.
///
/// Spawns `program` with `args`, relays every line of stdout/stderr to
/// `on_line` in arrival order per stream, and waits until the child exits
/// or `timeout` elapses. On timeout the child is killed and the outcome
/// reports `timed_out = true` with no exit code.
///
/// A spawn failure (interpreter not found) is a user error; a child that
/// runs and fails is reported through the outcome, not as an error, so the
/// caller decides how to surface it.
pub fn run_crawler(
    program: &str,
    args: &[String],
    timeout: Duration,
    poll_interval: Duration,
    on_line: &mut dyn FnMut(OutputStream, &str),
) -> Result<CrawlOutcome> {
    let command_str = shell_words::join(
        std::iter::once(program).chain(args.iter().map(|a| a.as_str())),
    );

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let start = Instant::now();
    let mut child = command.spawn().map_err(|e| {
        CrawlError::UserError(format!(
            "failed to launch crawler `{}`: {}\n\
             Fix: ensure the interpreter is installed and in PATH.",
            command_str, e
        ))
    })?;

    let stdout = child.stdout.take().ok_or_else(|| {
        CrawlError::UserError("crawler stdout pipe was not captured".to_string())
    })?;
    let stderr = child.stderr.take().ok_or_else(|| {
        CrawlError::UserError("crawler stderr pipe was not captured".to_string())
    })?;

    let (tx, rx) = channel();
    let stdout_reader = spawn_reader(OutputStream::Stdout, stdout, tx.clone());
    let stderr_reader = spawn_reader(OutputStream::Stderr, stderr, tx);

    let (exit_code, timed_out) =
        wait_with_timeout(&mut child, timeout, poll_interval, &rx, on_line)?;

    if timed_out {
        // The child is dead, but a grandchild that inherited the pipes can
        // hold the write ends open indefinitely (the real crawler launches a
        // browser). Joining the readers would block on EOF that may never
        // come, so drain what is already buffered within a grace period and
        // detach the readers instead.
        let deadline = Instant::now() + DETACH_GRACE;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok((stream, line)) => on_line(stream, &line),
                Err(_) => break,
            }
        }
        drop(stdout_reader);
        drop(stderr_reader);
    } else {
        // Pipes are closed once the child is gone; the readers finish on EOF.
        let _ = stdout_reader.join();
        let _ = stderr_reader.join();

        // Both senders are dropped now, so this drains the remaining lines.
        for (stream, line) in rx {
            on_line(stream, &line);
        }
    }

    Ok(CrawlOutcome {
        exit_code,
        duration: start.elapsed(),
        timed_out,
        command: command_str,
    })
}

/// Read lines from one child pipe and forward them over the channel.
fn spawn_reader<R: Read + Send + 'static>(
    stream: OutputStream,
    pipe: R,
    tx: Sender<(OutputStream, String)>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let reader = BufReader::new(pipe);
        for line in reader.lines() {
            match line {
                Ok(line) => {
                    if tx.send((stream, line)).is_err() {
                        break;
                    }
                }
                // Pipe closed or produced invalid data; nothing more to read.
                Err(_) => break,
            }
        }
    })
}

/// Wait for a child process with timeout, relaying output while waiting.
///
/// Returns (exit_code, timed_out).
fn wait_with_timeout(
    child: &mut Child,
    timeout: Duration,
    poll_interval: Duration,
    rx: &Receiver<(OutputStream, String)>,
    on_line: &mut dyn FnMut(OutputStream, &str),
) -> Result<(Option<i32>, bool)> {
    let start = Instant::now();

    loop {
        // Relay any output produced so far before checking for exit.
        while let Ok((stream, line)) = rx.try_recv() {
            on_line(stream, &line);
        }

        match child.try_wait() {
            Ok(Some(status)) => {
                return Ok((status.code(), false));
            }
            Ok(None) => {
                // Still running
                if start.elapsed() >= timeout {
                    // Timeout - kill the process
                    kill_process(child);
                    return Ok((None, true));
                }
                thread::sleep(poll_interval);
            }
            Err(e) => {
                return Err(CrawlError::UserError(format!(
                    "failed to check crawler status: {}",
                    e
                )));
            }
        }
    }
}

/// Kill a process and wait for it to terminate.
fn kill_process(child: &mut Child) {
    // On Unix this is SIGKILL; on Windows it is TerminateProcess.
    let _ = child.kill();
    let _ = child.wait();
}
