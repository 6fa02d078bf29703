//! Subcommands and their arguments.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use psyrang_cache::DEFAULT_ORIGIN;
use psyrang_core::{DEFAULT_PROXY_PORT, PORT_ENV};
use url::Url;

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the generative API proxy
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to listen on
        #[arg(short, long, env = PORT_ENV, default_value_t = DEFAULT_PROXY_PORT)]
        port: u16,
    },

    /// Manage the offline asset cache
    Cache {
        #[command(flatten)]
        options: CacheOptions,

        #[command(subcommand)]
        command: CacheCommand,
    },
}

/// Options shared by every cache command.
#[derive(Debug, Clone, Args)]
pub struct CacheOptions {
    /// Directory holding cache generations [default: platform data dir]
    #[arg(long = "store-dir", global = true)]
    pub store_dir: Option<PathBuf>,

    /// JSON manifest replacing the built-in asset list
    #[arg(long, global = true)]
    pub manifest: Option<PathBuf>,

    /// Origin that relative asset URLs resolve against
    #[arg(long, global = true, default_value = DEFAULT_ORIGIN)]
    pub origin: Url,
}

/// Cache lifecycle commands.
#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Fetch every manifest asset into the current generation
    Install,

    /// Delete every generation except the current one
    Activate,

    /// List stored generations
    List,

    /// Serve one URL cache-first, falling back to the network
    Fetch {
        /// Absolute URL or path relative to the origin
        url: String,
        /// Write the body here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
