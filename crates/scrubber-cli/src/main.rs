//! Scrubber CLI - run transform pipelines over delimited files.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init(if cli.verbose { "debug" } else { "warn" });

    let result = match cli.command {
        Commands::Run {
            path,
            pipeline,
            delimiter,
            no_header,
            json,
            steps,
        } => commands::run::run(
            commands::run::RunArgs {
                path,
                pipeline,
                delimiter,
                no_header,
                steps,
            },
            json,
            cli.verbose,
        ),

        Commands::Transforms { json } => commands::transforms::run(json, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
