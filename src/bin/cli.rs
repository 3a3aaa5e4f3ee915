//! memlink CLI Client
//!
//! Command-line interface for talking to a memcached server.

use std::process;

use clap::{Parser, Subcommand};
use memlink::{Client, Config, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// memlink CLI
#[derive(Parser, Debug)]
#[command(name = "memlink-cli")]
#[command(about = "CLI for memcached servers")]
#[command(version)]
struct Args {
    /// Server address (overrides the config file)
    #[arg(short, long)]
    server: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,

        /// Expiry in seconds (0 = never)
        #[arg(short, long)]
        exptime: Option<u32>,
    },

    /// Set a key-value pair only if the key is absent
    Add {
        /// The key to add
        key: String,

        /// The value to add
        value: String,

        /// Expiry in seconds (0 = never)
        #[arg(short, long)]
        exptime: Option<u32>,
    },

    /// Delete a key
    #[command(alias = "del")]
    Delete {
        /// The key to delete
        key: String,
    },

    /// Invalidate all items
    Flush,

    /// Print the server version
    Version,
}

/// Log filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "info,memlink=debug";

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::default(),
    };
    if let Some(server) = args.server {
        config.endpoint = server;
    }

    tracing::debug!("memlink-cli v{} -> {}", memlink::VERSION, config.endpoint);

    let default_exptime = config.default_exptime;
    let mut client = Client::with_config(config)?;

    match args.command {
        Commands::Get { key } => match client.get(&key)? {
            Some(value) => println!("{}", value),
            None => {
                client.close();
                eprintln!("(miss)");
                process::exit(2);
            }
        },
        Commands::Set {
            key,
            value,
            exptime,
        } => {
            let status =
                client.set_with_expiry(&key, &value, exptime.unwrap_or(default_exptime))?;
            println!("{}", status);
        }
        Commands::Add {
            key,
            value,
            exptime,
        } => {
            let status =
                client.add_with_expiry(&key, &value, exptime.unwrap_or(default_exptime))?;
            println!("{}", status);
        }
        Commands::Delete { key } => println!("{}", client.delete(&key)?),
        Commands::Flush => println!("{}", client.flush()?),
        Commands::Version => println!("{}", client.version()?),
    }

    client.close();
    Ok(())
}
