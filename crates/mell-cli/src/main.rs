//! `mell`: generate anything from JSON metadata and template files.
//!
//! Exit codes: 0 success, 1 internal failure, 2 bad input (addresses,
//! templates, scripts), 3 missing metadata or folders, 4 configuration.

use std::io::IsTerminal as _;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, instrument};

use crate::{
    cli::{Cli, Commands},
    config::MellConfig,
    error::{CliError, CliResult},
    logging::{LogSettings, init_logging},
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too and go to stdout.
            let _ = e.print();
            return ExitCode::from(if e.use_stderr() { 2 } else { 0 });
        }
    };

    let settings = LogSettings::from_args(&cli.global);
    if let Err(e) = init_logging(&settings) {
        eprintln!("error: {e}");
        return ExitCode::from(1);
    }
    debug!(command = ?cli.command, "Starting");

    let result = MellConfig::load(cli.global.config.as_deref(), cli.command.root())
        .map_err(CliError::from)
        .and_then(|config| {
            let output = OutputManager::new(&cli.global);
            run(cli.command, config, output)
        });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => fail(err, settings),
    }
}

#[instrument(skip_all)]
fn run(command: Commands, config: MellConfig, output: OutputManager) -> CliResult<()> {
    match command {
        Commands::Generate(args) => commands::generate::execute(args, config, output),
        Commands::Show(args) => commands::show::execute(args, config, output),
        Commands::Completions(args) => commands::completions::execute(args),
        Commands::Config(cmd) => commands::config::execute(cmd, config, output),
    }
}

fn fail(err: CliError, settings: LogSettings) -> ExitCode {
    err.log();
    let colored = settings.ansi && std::io::stderr().is_terminal();
    eprint!("{}", err.report(settings.verbose(), colored));
    ExitCode::from(err.exit_code())
}
