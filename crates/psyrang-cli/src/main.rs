//! CLI entry point - the composition root.
//!
//! Parses arguments, sets up logging, and dispatches to a handler. Handler
//! errors become a message on stderr and a sysexits-style exit code.

use clap::Parser;

use psyrang_cli::{Cli, CliError, Commands, handlers, logging};

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Serve { host, port } => handlers::serve::execute(&host, port).await,
        Commands::Cache { options, command } => handlers::cache::execute(&options, command).await,
    }
}

#[tokio::main]
async fn main() {
    // Load environment variables before clap reads its `env` fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        tracing::debug!(error = ?e, "Command failed");
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
