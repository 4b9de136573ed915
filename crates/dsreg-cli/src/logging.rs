//! Tracing subscriber setup for the `dsreg` binary.
//!
//! Logs go to stderr and never to stdout, so `provenance` output stays
//! machine-readable. Directives come from `DSREG_LOG`; without it the level
//! follows `--quiet` / `--verbose`.
use std::io::IsTerminal;
use std::sync::Once;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Environment variable holding `EnvFilter` directives.
pub const DSREG_LOG_ENV_VAR: &str = "DSREG_LOG";

/// Initializes the global tracing subscriber. Later calls are no-ops.
pub fn init(quiet: bool, verbose: bool) {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::builder()
            .with_default_directive(default_level(quiet, verbose).into())
            .with_env_var(DSREG_LOG_ENV_VAR)
            .from_env_lossy();

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .init();
    });
}

/// The level used when `DSREG_LOG` does not cover a target.
fn default_level(quiet: bool, verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else if quiet {
        LevelFilter::ERROR
    } else {
        LevelFilter::WARN
    }
}
