//! Implementation of the `crawlctl doctor` command.
//!
//! Health checks for the crawler environment: interpreter resolvable,
//! script present, log directory usable. Issues are reported with a
//! severity and a remediation hint; error-severity issues fail the command.

use crate::config::Config;
use crate::context::CrawlContext;
use crate::error::{CrawlError, Result};
use std::path::{Path, PathBuf};

/// Severity of a detected issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    /// Something the tool recovers from automatically.
    Warning,
    /// A crawl would fail right now.
    Error,
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueSeverity::Warning => write!(f, "WARNING"),
            IssueSeverity::Error => write!(f, "ERROR"),
        }
    }
}

/// A single issue found by the doctor checks.
#[derive(Debug, Clone)]
pub struct Issue {
    pub severity: IssueSeverity,
    pub message: String,
    pub remediation: Option<String>,
}

impl Issue {
    fn new(severity: IssueSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            remediation: None,
        }
    }

    fn with_remediation(mut self, remediation: impl Into<String>) -> Self {
        self.remediation = Some(remediation.into());
        self
    }
}

/// Execute the `crawlctl doctor` command.
pub fn cmd_doctor() -> Result<()> {
    let ctx = CrawlContext::resolve()?;

    let mut issues = Vec::new();
    let config = match Config::load(&ctx.config_path()) {
        Ok(config) => config,
        Err(e) => {
            issues.push(
                Issue::new(IssueSeverity::Error, format!("config is invalid: {}", e))
                    .with_remediation(format!("Fix '{}'", ctx.config_path().display())),
            );
            Config::default()
        }
    };

    issues.extend(run_checks(&ctx, &config));
    print_report(&issues);

    let error_count = issues
        .iter()
        .filter(|i| i.severity == IssueSeverity::Error)
        .count();
    if error_count > 0 {
        return Err(CrawlError::UserError(format!(
            "doctor found {} blocking issue(s)",
            error_count
        )));
    }
    Ok(())
}

/// Run all environment checks and collect issues.
pub(crate) fn run_checks(ctx: &CrawlContext, config: &Config) -> Vec<Issue> {
    let mut issues = Vec::new();
    check_interpreter(config, &mut issues);
    check_script(ctx, config, &mut issues);
    check_logs_dir(ctx, &mut issues);
    issues
}

/// Check that the configured interpreter resolves to an executable.
fn check_interpreter(config: &Config, issues: &mut Vec<Issue>) {
    let program = match shell_words::split(&config.interpreter) {
        Ok(words) => match words.into_iter().next() {
            Some(program) => program,
            None => {
                issues.push(Issue::new(
                    IssueSeverity::Error,
                    "interpreter is empty".to_string(),
                ));
                return;
            }
        },
        Err(e) => {
            issues.push(Issue::new(
                IssueSeverity::Error,
                format!("interpreter '{}' does not parse: {}", config.interpreter, e),
            ));
            return;
        }
    };

    if find_in_path(&program).is_none() {
        issues.push(
            Issue::new(
                IssueSeverity::Error,
                format!("interpreter '{}' not found in PATH", program),
            )
            .with_remediation(format!("Install {} or adjust `interpreter` in config.yaml", program)),
        );
    }
}

/// Check that the default crawler script exists.
fn check_script(ctx: &CrawlContext, config: &Config, issues: &mut Vec<Issue>) {
    let script_path = ctx.script_path(&config.script);
    if !script_path.exists() {
        issues.push(
            Issue::new(
                IssueSeverity::Error,
                format!("crawler script missing at '{}'", script_path.display()),
            )
            .with_remediation(format!(
                "Place the script under '{}' or adjust `script` in config.yaml",
                ctx.scripts_dir().display()
            )),
        );
    }
}

/// Check that the log directory exists or can be created.
fn check_logs_dir(ctx: &CrawlContext, issues: &mut Vec<Issue>) {
    let logs_dir = ctx.logs_dir();
    if logs_dir.exists() {
        return;
    }
    // Missing is only a warning: appends create it on demand.
    if std::fs::create_dir_all(&logs_dir).is_err() {
        issues.push(
            Issue::new(
                IssueSeverity::Error,
                format!("log directory '{}' cannot be created", logs_dir.display()),
            )
            .with_remediation("Check permissions on the crawler home directory"),
        );
    } else {
        issues.push(Issue::new(
            IssueSeverity::Warning,
            format!("log directory '{}' did not exist; created it", logs_dir.display()),
        ));
    }
}

/// Resolve a program name against PATH.
///
/// Paths with a separator are checked directly.
fn find_in_path(program: &str) -> Option<PathBuf> {
    let as_path = Path::new(program);
    if as_path.components().count() > 1 {
        return as_path.is_file().then(|| as_path.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

fn print_report(issues: &[Issue]) {
    if issues.is_empty() {
        println!("No issues found. The crawler environment is healthy.");
        return;
    }

    println!("Found {} issue(s):", issues.len());
    println!();
    for issue in issues {
        println!("  [{}] {}", issue.severity, issue.message);
        if let Some(remediation) = &issue.remediation {
            println!("          Fix: {}", remediation);
        }
    }
}
