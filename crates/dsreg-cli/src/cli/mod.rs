//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use dsreg_core::{FailureMode, ValidationConfig};

/// Output format for CLI commands.
///
/// `Human` emits colored, line-oriented output to stderr. `Json` emits one
/// JSON object per line (NDJSON) for diagnostics and a single object for
/// data written to stdout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, optionally colored output (default).
    Human,
    /// Structured JSON / NDJSON output.
    Json,
}

/// How the validator reacts to the first violation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Stop at the first violation (default).
    FailFast,
    /// Run every rule and report every violation.
    CollectAll,
}

impl From<ModeArg> for FailureMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::FailFast => FailureMode::FailFast,
            ModeArg::CollectAll => FailureMode::CollectAll,
        }
    }
}

/// A pipeline stage that can be skipped with `--skip`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StageArg {
    /// Allowed and required fields, field types, URL syntax.
    Schema,
    /// Id format, id uniqueness, title uniqueness.
    Identity,
    /// Provider references and join targets.
    References,
    /// Whitespace and empty identifier values.
    Hygiene,
}

/// Locations of the two registry sources.
#[derive(Args, Clone, Debug)]
pub struct RegistryPaths {
    /// Path to the datasets source.
    #[arg(
        long,
        value_name = "PATH",
        env = "DSREG_DATASETS",
        default_value = "datasets.json"
    )]
    pub datasets: PathBuf,

    /// Path to the providers source.
    #[arg(
        long,
        value_name = "PATH",
        env = "DSREG_PROVIDERS",
        default_value = "providers.json"
    )]
    pub providers: PathBuf,
}

/// All top-level subcommands exposed by the `dsreg` binary.
#[derive(Subcommand)]
pub enum Command {
    /// Validate the datasets and providers registry.
    Validate {
        #[command(flatten)]
        paths: RegistryPaths,
        /// Stop at the first violation or collect every violation.
        #[arg(long, value_enum, default_value = "fail-fast")]
        mode: ModeArg,
        /// Skip a validation stage (repeatable).
        #[arg(long, value_enum, value_name = "STAGE")]
        skip: Vec<StageArg>,
    },

    /// Rewrite both sources in canonical form (sorted by id, 4-space indent).
    Format {
        #[command(flatten)]
        paths: RegistryPaths,
        /// Report files that are not canonical and exit 1 without writing.
        #[arg(long)]
        check: bool,
    },

    /// Print a provenance record (ids and content digests) for a valid registry.
    Provenance {
        #[command(flatten)]
        paths: RegistryPaths,
        /// Revision identifier to record, typically a commit hash.
        #[arg(long, value_name = "REV", env = "DSREG_REVISION")]
        revision: Option<String>,
    },
}

/// Builds the validation configuration for `validate`.
pub fn validation_config(mode: ModeArg, skip: &[StageArg]) -> ValidationConfig {
    ValidationConfig {
        mode: mode.into(),
        run_schema: !skip.contains(&StageArg::Schema),
        run_identity: !skip.contains(&StageArg::Identity),
        run_references: !skip.contains(&StageArg::References),
        run_hygiene: !skip.contains(&StageArg::Hygiene),
        ..ValidationConfig::default()
    }
}

/// Root CLI struct for the `dsreg` binary.
///
/// All global flags are defined here and marked `global = true` so that clap
/// propagates them to every subcommand.
#[derive(Parser)]
#[command(
    name = "dsreg",
    version,
    about = "Dataset and provider registry validator",
    long_about = "Validates, formats, and fingerprints a registry of externally hosted\n\
                  datasets (datasets.json) and the providers that host them\n\
                  (providers.json)."
)]
pub struct Cli {
    /// Active subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Output format: human (default) or json.
    #[arg(long, short = 'f', default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Suppress all stderr output except errors (incompatible with `--verbose`).
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Increase stderr verbosity: timing, per-kind counts, debug logs
    /// (incompatible with `--quiet`).
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Disable ANSI color codes in human output.
    ///
    /// Also respects the `NO_COLOR` environment variable per
    /// <https://no-color.org>.
    #[arg(long, global = true, env = "NO_COLOR", value_parser = FalseyValueParser::new())]
    pub no_color: bool,
}
