#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod config;
pub mod format;
pub mod load;
pub mod provenance;
pub mod record;
pub mod url_check;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::{FailureMode, KindRules, ValidationConfig};
pub use format::{
    FormatError, compare_records, is_formatted, reformat_source, render_records, sort_records,
};
pub use load::{LoadError, load_registry, load_registry_files, parse_records, read_source};
pub use provenance::Provenance;
pub use record::{Record, RecordKind, Registry};
pub use url_check::is_valid_url;
pub use validation::{
    Findings, Location, Stage, ValidationReport, ValidationRule, Violation, ViolationKind,
    build_pipeline, validate, validate_sources,
};

/// Returns the current version of the dsreg-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
