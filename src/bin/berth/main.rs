//! Berth CLI - package descriptor loader and build-plan resolver

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use berth::util::diagnostic::emit;
use berth::DescriptorError;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli, color) {
        match e.downcast_ref::<DescriptorError>() {
            Some(descriptor_error) => {
                let diag = descriptor_error.to_diagnostic();
                emit(&diag, color);
                eprintln!("error: {}", e);
            }
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, color: bool) -> Result<()> {
    // BERTH_LOG overrides the verbosity flag
    let filter = EnvFilter::try_from_env("BERTH_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("berth=debug")
        } else {
            EnvFilter::new("berth=info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(color)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        Commands::Check(args) => commands::check::execute(args, color),
        Commands::Plan(args) => commands::plan::execute(args),
        Commands::Tree(args) => commands::tree::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
