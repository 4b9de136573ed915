//! Implementation of `dsreg provenance`.
//!
//! Validates the registry in collect-all mode and, when it is clean, prints
//! a provenance record (revision, ids in canonical order, SHA-256 digests of
//! the canonical renderings) as pretty JSON on stdout. A registry with
//! violations gets the same violation lines and summary as `validate` and
//! exits 1.
use std::io::Write;

use dsreg_core::{Provenance, Registry, ValidationConfig, load_registry_files, validate};

use crate::cli::RegistryPaths;
use crate::cmd::validate::{emit, outcome};
use crate::error::CliError;
use crate::report::{FormatMode, FormatterConfig};

/// Runs the `provenance` command.
///
/// # Errors
///
/// - [`CliError::Load`]: a source is missing, unreadable, or malformed.
/// - [`CliError::ValidationErrors`]: the registry has violations.
/// - [`CliError::IoError`]: stdout could not be written.
pub fn run(
    paths: &RegistryPaths,
    revision: Option<String>,
    mode: FormatMode,
    fmt_config: &FormatterConfig,
) -> Result<(), CliError> {
    let registry = load_registry_files(&paths.datasets, &paths.providers)?;
    let config = ValidationConfig::collect_all();

    let report = validate(&registry, &config);
    if !report.is_valid() {
        let stderr = std::io::stderr();
        let mut err_out = stderr.lock();
        emit(&mut err_out, &registry, &report, mode, fmt_config)
            .map_err(|e| CliError::stream("stderr", &e))?;
        return outcome(&report);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_record(&mut out, &registry, &config, revision)
}

/// Captures and writes the provenance record.
fn write_record<W: Write>(
    writer: &mut W,
    registry: &Registry,
    config: &ValidationConfig,
    revision: Option<String>,
) -> Result<(), CliError> {
    let record = Provenance::capture(registry, config, revision).map_err(|e| {
        CliError::RenderFailed {
            detail: e.to_string(),
        }
    })?;
    let json = serde_json::to_string_pretty(&record).map_err(|e| CliError::RenderFailed {
        detail: e.to_string(),
    })?;
    writeln!(writer, "{json}").map_err(|e| CliError::stream("stdout", &e))?;
    tracing::debug!(
        datasets = record.datasets.len(),
        providers = record.providers.len(),
        "provenance written"
    );
    Ok(())
}
