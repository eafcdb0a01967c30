//! Root CLI structure for rw-suite

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rw-suite")]
#[command(about = "Command-line tools for RenderWare era GTA asset formats", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the supported file formats
    Formats,

    /// Display information about a file
    Info {
        /// Path to the file
        file: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// With --json, print the whole decoded value instead of a summary
        #[arg(long, requires = "json")]
        full: bool,
    },

    /// Check that files decode and encode cleanly
    Validate {
        /// Files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Treat decoder warnings as failures
        #[arg(long)]
        strict: bool,
    },

    /// Show the structure of a file as a tree
    Tree {
        /// Path to the file
        file: PathBuf,

        /// Maximum depth to display
        #[arg(short, long)]
        depth: Option<usize>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Decode a file and write it back out through the codec
    Convert {
        /// Path to the input file
        input: PathBuf,

        /// Path to write; must have the same extension kind as the input
        output: PathBuf,
    },
}
