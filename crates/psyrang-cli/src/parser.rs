//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Planner AI proxy and offline asset cache.
#[derive(Debug, Parser)]
#[command(name = "psyrang")]
#[command(about = "Run the planner AI proxy and manage its offline asset cache")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
