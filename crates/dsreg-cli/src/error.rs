/// CLI error types with associated exit codes.
///
/// [`CliError`] is the top-level error type for the `dsreg` binary. Every
/// variant maps to a stable exit code (1 or 2) via [`CliError::exit_code`]:
///
/// - Exit code **2**: input failure. A registry source could not be read or
///   decoded, or an output could not be written.
/// - Exit code **1**: logical failure. The tool ran to completion but the
///   registry has violations or is not in canonical form.
use std::fmt;
use std::path::PathBuf;

use dsreg_core::{FormatError, LoadError};

// ---------------------------------------------------------------------------
// CliError
// ---------------------------------------------------------------------------

/// All error conditions that the `dsreg` CLI can produce.
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    /// A registry source could not be read or decoded.
    Load(LoadError),

    /// Records could not be rendered to JSON.
    RenderFailed {
        /// The serializer's description.
        detail: String,
    },

    /// A reformatted source could not be written back.
    WriteFailed {
        /// The destination path.
        path: PathBuf,
        /// The underlying I/O error message.
        detail: String,
    },

    /// Writing to stdout or stderr failed.
    IoError {
        /// The stream that failed.
        source: String,
        /// The underlying I/O error message.
        detail: String,
    },

    // --- Exit code 1: logical failures ---
    /// Validation recorded one or more violations.
    ///
    /// The violations have already been printed; this variant exists so
    /// `main` can exit with code 1 cleanly.
    ValidationErrors {
        /// Number of violations recorded.
        count: usize,
        /// Whether a fail-fast run stopped early.
        halted: bool,
    },

    /// `format --check` found sources that are not in canonical form.
    Unformatted {
        /// The sources that would be rewritten.
        paths: Vec<PathBuf>,
    },
}

impl CliError {
    /// Returns the process exit code for this error.
    ///
    /// - `2`: input failure (unreadable source, malformed JSON, write error).
    /// - `1`: logical failure (violations, unformatted sources).
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Load(_)
            | Self::RenderFailed { .. }
            | Self::WriteFailed { .. }
            | Self::IoError { .. } => 2,

            Self::ValidationErrors { .. } | Self::Unformatted { .. } => 1,
        }
    }

    /// Returns a human-readable error message suitable for printing to stderr.
    pub fn message(&self) -> String {
        match self {
            Self::Load(err) => format!("error: {err}"),
            Self::RenderFailed { detail } => format!("error: failed to render records: {detail}"),
            Self::WriteFailed { path, detail } => {
                format!("error: failed to write {}: {detail}", path.display())
            }
            Self::IoError { source, detail } => {
                format!("error: I/O error writing {source}: {detail}")
            }
            Self::ValidationErrors {
                count,
                halted: true,
            } => format!(
                "error: validation failed after {count} violation (fail-fast); \
                 rerun with --mode collect-all to list every violation"
            ),
            Self::ValidationErrors {
                count,
                halted: false,
            } => format!(
                "error: validation failed with {count} {}",
                if *count == 1 { "violation" } else { "violations" }
            ),
            Self::Unformatted { paths } => {
                let list: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
                format!("error: not in canonical form: {}", list.join(", "))
            }
        }
    }

    /// Wraps a stream write failure.
    pub fn stream(source: &str, err: &std::io::Error) -> Self {
        Self::IoError {
            source: source.to_owned(),
            detail: err.to_string(),
        }
    }
}

impl From<LoadError> for CliError {
    fn from(err: LoadError) -> Self {
        Self::Load(err)
    }
}

impl From<FormatError> for CliError {
    fn from(err: FormatError) -> Self {
        match err {
            FormatError::Load(err) => Self::Load(err),
            FormatError::Render(err) => Self::RenderFailed {
                detail: err.to_string(),
            },
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
