//! Main entry point for the rw-suite CLI

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    // Set verbosity
    if cli.verbose > 0 {
        log::set_max_level(match cli.verbose {
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        });
    } else if cli.quiet {
        log::set_max_level(log::LevelFilter::Error);
    }

    match cli.command {
        Commands::Formats => commands::formats::execute(),
        Commands::Info { file, json, full } => commands::info::execute(&file, json, full),
        Commands::Validate { files, strict } => commands::validate::execute(&files, strict),
        Commands::Tree {
            file,
            depth,
            no_color,
        } => commands::tree::execute(&file, depth, no_color),
        Commands::Convert { input, output } => commands::convert::execute(&input, &output),
    }
}
