//! ontap-tracker - Warsaw multitap beer price tracker
//!
//! Fetches every bar listed on ontap.pl concurrently and reports cheap beers.

use anyhow::Result;
use clap::{Parser, Subcommand};
use ontap_tracker::commands::{BarsCommand, BeersCommand, LowestCommand};
use ontap_tracker::config::{Config, OutputFormat};
use ontap_tracker::server;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ontap-tracker",
    version,
    about = "Find cheap beer in Warsaw multitap bars",
    long_about = "Scrapes the ontap.pl multitap directory, fetches every bar's tap list concurrently, and reports beers under a price limit or the cheapest beer in town."
)]
struct Cli {
    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "ONTAP_PROXY")]
    proxy: Option<String>,

    /// Maximum number of bars fetched at once
    #[arg(long, global = true)]
    concurrency: Option<usize>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format [table, json, markdown, csv]
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List bars pouring beers at or under a price
    #[command(alias = "b")]
    Beers {
        /// Price limit in złoty (defaults to config, 18)
        #[arg(short, long)]
        price: Option<i64>,

        /// Required keywords in beer name (comma-separated)
        #[arg(long, value_delimiter = ',')]
        keywords: Option<Vec<String>>,

        /// Excluded keywords from beer name (comma-separated)
        #[arg(long, value_delimiter = ',')]
        exclude: Option<Vec<String>>,
    },

    /// Show the cheapest beer(s) in town
    #[command(alias = "l")]
    Lowest,

    /// List bars on the multitap directory
    Bars,

    /// Serve the HTTP API
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "ONTAP_PORT")]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(concurrency) = cli.concurrency {
        config.max_concurrency = concurrency;
    }

    match cli.command {
        Commands::Beers { price, keywords, exclude } => {
            if let Some(kw) = keywords {
                config.keywords = kw;
            }
            if let Some(ex) = exclude {
                config.exclude_keywords = ex;
            }

            let limit = price.unwrap_or(config.price_limit);
            let output = BeersCommand::new(config).execute(limit).await?;
            println!("{}", output);
        }

        Commands::Lowest => {
            let output = LowestCommand::new(config).execute().await?;
            println!("{}", output);
        }

        Commands::Bars => {
            let output = BarsCommand::new(config).execute().await?;
            println!("{}", output);
        }

        Commands::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            server::serve(config).await?;
        }
    }

    Ok(())
}
