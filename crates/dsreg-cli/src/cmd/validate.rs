//! Implementation of `dsreg validate`.
//!
//! Loads `datasets.json` and `providers.json`, runs the validation pipeline,
//! and emits violations to stderr.
//!
//! Flags:
//! - `--mode fail-fast|collect-all` (default fail-fast).
//! - `--skip <stage>` (repeatable) disables a pipeline stage.
//!
//! Exit codes:
//! - 0 = valid (no violations)
//! - 1 = at least one violation
//! - 2 = a source could not be read or decoded
use std::io::Write;
use std::time::Instant;

use dsreg_core::{Registry, ValidationConfig, ValidationReport, load_registry_files, validate};

use crate::cli::RegistryPaths;
use crate::error::CliError;
use crate::report::{
    Checked, FormatMode, FormatterConfig, write_summary, write_timing_human, write_violation,
};

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

/// Runs the `validate` command.
///
/// # Errors
///
/// - [`CliError::Load`]: a source is missing, unreadable, or malformed.
/// - [`CliError::ValidationErrors`]: one or more violations were found.
pub fn run(
    paths: &RegistryPaths,
    config: &ValidationConfig,
    mode: FormatMode,
    fmt_config: &FormatterConfig,
) -> Result<(), CliError> {
    let registry = load_registry_files(&paths.datasets, &paths.providers)?;

    let started = Instant::now();
    let report = validate(&registry, config);
    let elapsed = started.elapsed();

    let stderr = std::io::stderr();
    let mut err_out = stderr.lock();
    emit(&mut err_out, &registry, &report, mode, fmt_config)
        .map_err(|e| CliError::stream("stderr", &e))?;
    write_timing_human(&mut err_out, "validated", elapsed, fmt_config)
        .map_err(|e| CliError::stream("stderr", &e))?;

    outcome(&report)
}

/// Writes every violation followed by the summary.
pub(crate) fn emit<W: Write>(
    writer: &mut W,
    registry: &Registry,
    report: &ValidationReport,
    mode: FormatMode,
    fmt_config: &FormatterConfig,
) -> std::io::Result<()> {
    for violation in &report.violations {
        write_violation(writer, violation, mode, fmt_config)?;
    }
    let checked = Checked {
        datasets: registry.datasets.len(),
        providers: registry.providers.len(),
    };
    write_summary(writer, report, checked, mode, fmt_config)
}

/// Maps a report to the command result.
pub(crate) fn outcome(report: &ValidationReport) -> Result<(), CliError> {
    if report.is_valid() {
        Ok(())
    } else {
        Err(CliError::ValidationErrors {
            count: report.len(),
            halted: report.halted,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
