//! sumi-kv main entry point
//!
//! Administrative command-line interface for the crawl state kept in the
//! configured key-value store.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use sumi_kv::config::{load_config, Config};
use sumi_kv::kv::redact_url;
use sumi_kv::storage::{QueueStorage, RedisStorage, VisitedStorage};
use tracing_subscriber::EnvFilter;

/// sumi-kv: inspect and manage crawl state in Redis
#[derive(Parser, Debug)]
#[command(name = "sumi-kv")]
#[command(version)]
#[command(about = "Manage crawler state kept in Redis", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the config and print the resolved settings
    CheckConfig,

    /// Check that the store is reachable
    Ping,

    /// Print the number of queued requests
    QueueSize,

    /// Print the cookies stored for a host
    Cookies {
        /// Host, with port if the crawler used a non-default one
        host: String,
    },

    /// Delete every cookie, visited marker and queued request under the prefix
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    match cli.command {
        Command::CheckConfig => handle_check_config(&config)?,
        Command::Ping => {
            connect(&config).await?;
            println!("PONG");
        }
        Command::QueueSize => {
            let storage = connect(&config).await?;
            println!("{}", storage.size().await?);
        }
        Command::Cookies { host } => {
            let storage = connect(&config).await?;
            match storage.try_cookies(&host).await? {
                Some(cookies) => println!("{}", cookies),
                None => tracing::info!("No cookies stored for {}", host),
            }
        }
        Command::Clear { yes } => {
            if !yes {
                anyhow::bail!(
                    "Refusing to clear prefix '{}' without --yes",
                    config.storage.prefix
                );
            }
            let storage = connect(&config).await?;
            let deleted = storage.clear().await?;
            println!("Deleted {} keys under '{}'", deleted, config.storage.prefix);
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_kv=info,warn"),
            1 => EnvFilter::new("sumi_kv=debug,info"),
            2 => EnvFilter::new("sumi_kv=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Opens the crawl state storage and verifies the store is reachable
async fn connect(config: &Config) -> anyhow::Result<RedisStorage> {
    let storage = RedisStorage::new(config.storage_options());
    storage
        .initialize()
        .await
        .context("Redis connection error")?;
    Ok(storage)
}

/// Handles `check-config`: prints the resolved settings
fn handle_check_config(config: &Config) -> anyhow::Result<()> {
    let url = config.redis.connection_options().to_url()?;

    println!("Store:");
    println!("  URL: {}", redact_url(&url));

    println!("\nCrawl state:");
    println!("  Prefix: {}", config.storage.prefix);
    match config.storage.expires() {
        Some(expires) => println!("  Visited markers expire after: {}s", expires.as_secs()),
        None => println!("  Visited markers never expire"),
    }

    match &config.cache {
        Some(cache) => {
            println!("\nResponse cache:");
            println!("  Prefix: {}", cache.prefix);
            println!("  Entries expire after: {}s", cache.expiration_secs);
        }
        None => println!("\nResponse cache: disabled"),
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}
