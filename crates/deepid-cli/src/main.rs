mod app;
mod args;
mod commands;
mod progress;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use deepid_core::{Verbosity, set_verbosity};

use args::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    set_verbosity(if cli.verbose {
        Verbosity::Verbose
    } else if cli.quiet {
        Verbosity::Quiet
    } else {
        Verbosity::Normal
    });

    match cli.command {
        Some(Commands::Scan(args)) => commands::scan::run(args),
        Some(Commands::Evaluate(args)) => commands::evaluate::run(args),
        Some(Commands::Config(args)) => commands::config::run(args),
        Some(Commands::Setup) => commands::setup::run(),
        None if cli.scan.folder.is_some() => commands::scan::run(cli.scan),
        None => {
            Cli::command().print_help()?;
            std::process::exit(2);
        }
    }
}
