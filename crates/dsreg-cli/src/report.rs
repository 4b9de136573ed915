/// Violation rendering: human-readable and JSON (NDJSON) modes.
///
/// - **Human mode** (default): one line per violation on stderr, with an
///   `[E]` tag colored red. Colors are disabled when `--no-color` is set, the
///   `NO_COLOR` environment variable is present (per <https://no-color.org>),
///   or stderr is not a TTY.
/// - **JSON mode**: each violation is serialized as a single-line JSON object
///   (NDJSON) on stderr, followed by a summary object.
///
/// Quiet mode suppresses the summary and informational lines; violations are
/// always written. Verbose mode adds timing and per-kind counts.
use std::io::{IsTerminal as _, Write};
use std::time::Duration;

use dsreg_core::{ValidationReport, Violation};
use serde_json::json;

// ---------------------------------------------------------------------------
// Color support detection
// ---------------------------------------------------------------------------

/// Returns `true` if ANSI color codes should be emitted to stderr.
pub fn colors_enabled(no_color_flag: bool) -> bool {
    if no_color_flag {
        return false;
    }
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stderr().is_terminal()
}

const ANSI_RED: &str = "\x1b[31m";
const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_RESET: &str = "\x1b[0m";

// ---------------------------------------------------------------------------
// FormatterConfig
// ---------------------------------------------------------------------------

/// Configuration for the violation renderer, derived from CLI flags.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Whether ANSI colors are enabled.
    pub colors: bool,
    /// Suppress all non-error stderr output.
    pub quiet: bool,
    /// Emit timing and per-kind counts to stderr.
    pub verbose: bool,
}

impl FormatterConfig {
    /// Constructs a [`FormatterConfig`] from the raw CLI flags.
    pub fn from_flags(no_color_flag: bool, quiet: bool, verbose: bool) -> Self {
        Self {
            colors: colors_enabled(no_color_flag),
            quiet,
            verbose,
        }
    }
}

/// Output format selection, mirroring the CLI `--format` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatMode {
    /// Human-readable, optionally colored output.
    Human,
    /// Structured NDJSON output.
    Json,
}

// ---------------------------------------------------------------------------
// Violations
// ---------------------------------------------------------------------------

/// Writes a single [`Violation`] in human-readable format.
///
/// Format: `[E] unknown-provider  dataset "dataset-1" field "provider": provider "provider-9" is not in providers.json`
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_violation_human<W: Write>(
    writer: &mut W,
    violation: &Violation,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    let (open, close) = if config.colors {
        (ANSI_RED, ANSI_RESET)
    } else {
        ("", "")
    };
    writeln!(
        writer,
        "{open}[E]{close} {code}  {location}: {message}",
        code = violation.kind,
        location = violation.location,
        message = violation.message,
    )
}

/// Writes a single [`Violation`] as a NDJSON line.
///
/// ```json
/// {"code":"unknown-provider","location":"dataset \"dataset-1\" field \"provider\"","record":{...},"value":"provider-9","message":"..."}
/// ```
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_violation_json<W: Write>(writer: &mut W, violation: &Violation) -> std::io::Result<()> {
    let line = json!({
        "code": violation.kind,
        "location": violation.location.to_string(),
        "record": violation.location,
        "value": violation.value,
        "message": violation.message,
    });
    writeln!(writer, "{line}")
}

/// Writes a single [`Violation`] in the requested format.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_violation<W: Write>(
    writer: &mut W,
    violation: &Violation,
    mode: FormatMode,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    match mode {
        FormatMode::Human => write_violation_human(writer, violation, config),
        FormatMode::Json => write_violation_json(writer, violation),
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Record counts shown in the summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checked {
    /// Number of dataset records validated.
    pub datasets: usize,
    /// Number of provider records validated.
    pub providers: usize,
}

/// Writes the summary for a validation report.
///
/// Human format: `registry valid: 12 datasets, 4 providers` or
/// `3 violations in 12 datasets, 4 providers`, with `(stopped at first
/// violation)` appended when a fail-fast run halted. Verbose mode adds one
/// indented line per violation kind.
///
/// JSON format: `{"summary":{"valid":false,"violations":3,"halted":false,...}}`
///
/// In quiet mode the summary is suppressed.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_summary<W: Write>(
    writer: &mut W,
    report: &ValidationReport,
    checked: Checked,
    mode: FormatMode,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if config.quiet {
        return Ok(());
    }
    match mode {
        FormatMode::Human => write_summary_human(writer, report, checked, config),
        FormatMode::Json => write_summary_json(writer, report, checked),
    }
}

fn write_summary_human<W: Write>(
    writer: &mut W,
    report: &ValidationReport,
    checked: Checked,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    let scope = format!(
        "{} {}, {} {}",
        checked.datasets,
        pluralize(checked.datasets, "dataset", "datasets"),
        checked.providers,
        pluralize(checked.providers, "provider", "providers"),
    );
    if report.is_valid() {
        let (open, close) = if config.colors {
            (ANSI_GREEN, ANSI_RESET)
        } else {
            ("", "")
        };
        return writeln!(writer, "{open}registry valid{close}: {scope}");
    }

    let count = report.len();
    let halted = if report.halted {
        " (stopped at first violation)"
    } else {
        ""
    };
    writeln!(
        writer,
        "{count} {} in {scope}{halted}",
        pluralize(count, "violation", "violations"),
    )?;
    if config.verbose {
        for (kind, n) in report.counts() {
            writeln!(writer, "  {kind}: {n}")?;
        }
    }
    Ok(())
}

fn write_summary_json<W: Write>(
    writer: &mut W,
    report: &ValidationReport,
    checked: Checked,
) -> std::io::Result<()> {
    let counts: serde_json::Map<String, serde_json::Value> = report
        .counts()
        .into_iter()
        .map(|(kind, n)| (kind.code().to_owned(), json!(n)))
        .collect();
    let line = json!({
        "summary": {
            "valid": report.is_valid(),
            "violations": report.len(),
            "halted": report.halted,
            "datasets": checked.datasets,
            "providers": checked.providers,
            "counts": counts,
        }
    });
    writeln!(writer, "{line}")
}

/// Writes timing information in verbose human mode.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_timing_human<W: Write>(
    writer: &mut W,
    label: &str,
    duration: Duration,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if !config.verbose {
        return Ok(());
    }
    writeln!(writer, "{label} in {}ms", duration.as_millis())
}

/// Writes a one-line status for a file touched by `format`.
///
/// Suppressed in quiet mode.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_file_status<W: Write>(
    writer: &mut W,
    path: &std::path::Path,
    status: &str,
    mode: FormatMode,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if config.quiet {
        return Ok(());
    }
    match mode {
        FormatMode::Human => writeln!(writer, "{status} {}", path.display()),
        FormatMode::Json => {
            let line = json!({"path": path.display().to_string(), "status": status});
            writeln!(writer, "{line}")
        }
    }
}

fn pluralize<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
