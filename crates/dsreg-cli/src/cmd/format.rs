//! Implementation of `dsreg format`.
//!
//! Rewrites `datasets.json` and `providers.json` in canonical form: records
//! sorted by the numeric suffix of their id, four-space indentation, sorted
//! keys, and one trailing newline. Formatting never validates.
//!
//! Flags:
//! - `--check`: report sources that would change and exit 1 without writing.
//!
//! Both sources are decoded before anything is written, so a malformed
//! providers file never leaves a half-formatted registry behind.
use std::io::Write;
use std::path::{Path, PathBuf};

use dsreg_core::{RecordKind, ValidationConfig, read_source, reformat_source};

use crate::cli::RegistryPaths;
use crate::error::CliError;
use crate::report::{FormatMode, FormatterConfig, write_file_status};

/// One source and its canonical rendering.
#[derive(Debug)]
pub(crate) struct Planned {
    pub path: PathBuf,
    pub canonical: String,
    pub changed: bool,
}

/// Runs the `format` command.
///
/// # Errors
///
/// - [`CliError::Load`]: a source is missing, unreadable, or malformed.
/// - [`CliError::WriteFailed`]: a reformatted source could not be written.
/// - [`CliError::Unformatted`]: `--check` found sources that would change.
pub fn run(
    paths: &RegistryPaths,
    check: bool,
    mode: FormatMode,
    fmt_config: &FormatterConfig,
) -> Result<(), CliError> {
    let config = ValidationConfig::default();
    let planned = [
        plan(RecordKind::Dataset, &paths.datasets, &config)?,
        plan(RecordKind::Provider, &paths.providers, &config)?,
    ];

    let stderr = std::io::stderr();
    let mut err_out = stderr.lock();
    apply(&planned, check, &mut err_out, mode, fmt_config)
}

/// Reads one source and computes its canonical form.
pub(crate) fn plan(
    kind: RecordKind,
    path: &Path,
    config: &ValidationConfig,
) -> Result<Planned, CliError> {
    let text = read_source(kind, path)?;
    let canonical = reformat_source(kind, &text, config.rules(kind))?;
    Ok(Planned {
        path: path.to_path_buf(),
        changed: canonical != text,
        canonical,
    })
}

/// Writes changed sources, or in check mode lists them.
pub(crate) fn apply<W: Write>(
    planned: &[Planned],
    check: bool,
    status_out: &mut W,
    mode: FormatMode,
    fmt_config: &FormatterConfig,
) -> Result<(), CliError> {
    let mut stale = Vec::new();
    for source in planned {
        let status = match (source.changed, check) {
            (false, _) => "unchanged",
            (true, true) => {
                stale.push(source.path.clone());
                "would reformat"
            }
            (true, false) => {
                std::fs::write(&source.path, source.canonical.as_bytes()).map_err(|e| {
                    CliError::WriteFailed {
                        path: source.path.clone(),
                        detail: e.to_string(),
                    }
                })?;
                tracing::info!(path = %source.path.display(), "source reformatted");
                "reformatted"
            }
        };
        write_file_status(status_out, &source.path, status, mode, fmt_config)
            .map_err(|e| CliError::stream("stderr", &e))?;
    }

    if stale.is_empty() {
        Ok(())
    } else {
        Err(CliError::Unformatted { paths: stale })
    }
}
