mod inventory;
mod cli;
mod commands;
mod config;
mod error;
mod export;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use commands::{handle_report_command, handle_topology_command};
use output::print_error;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let result = match &cli.command {
        Commands::Report(args) => handle_report_command(args),
        Commands::Topology { format, config } => handle_topology_command(format, config.as_ref()),
    };

    if let Err(e) = result {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
