mod cli;
mod cmd;
mod error;
mod logging;
mod report;

use clap::Parser;

use crate::cli::{Cli, Command, OutputFormat, validation_config};
use crate::error::CliError;
use crate::report::{FormatMode, FormatterConfig};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.quiet, cli.verbose);

    if let Err(err) = dispatch(cli) {
        eprintln!("{}", err.message());
        std::process::exit(err.exit_code());
    }
}

fn dispatch(cli: Cli) -> Result<(), CliError> {
    let mode = match cli.format {
        OutputFormat::Human => FormatMode::Human,
        OutputFormat::Json => FormatMode::Json,
    };
    let fmt_config = FormatterConfig::from_flags(cli.no_color, cli.quiet, cli.verbose);

    match cli.command {
        Command::Validate { paths, mode: run_mode, skip } => {
            let config = validation_config(run_mode, &skip);
            cmd::validate::run(&paths, &config, mode, &fmt_config)
        }
        Command::Format { paths, check } => cmd::format::run(&paths, check, mode, &fmt_config),
        Command::Provenance { paths, revision } => {
            cmd::provenance::run(&paths, revision, mode, &fmt_config)
        }
    }
}
