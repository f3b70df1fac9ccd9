//! wikiseed: stream a Wikipedia dump into a Qdrant collection

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use wikiseed::config::Config;

mod commands;

#[derive(Parser)]
#[command(name = "wikiseed")]
#[command(about = "Stream a Wikipedia dump into a Qdrant collection")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "wikiseed.toml")]
    config: PathBuf,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed a dump into the vector store
    Seed {
        /// Path to the dump file (.xml or .xml.bz2)
        path: PathBuf,

        /// Target collection (overrides config)
        #[arg(long)]
        collection: Option<String>,

        /// Concurrent embedding requests (overrides config)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Stop after this many articles
        #[arg(long)]
        max_articles: Option<usize>,

        /// Suppress the end-of-run summary
        #[arg(short, long)]
        quiet: bool,
    },

    /// Write a starter configuration file
    Init {
        /// Output directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };

    let level = match cli.verbose {
        0 => config
            .logging
            .level
            .as_str()
            .parse()
            .unwrap_or(Level::INFO),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Seed {
            path,
            collection,
            concurrency,
            max_articles,
            quiet,
        } => {
            commands::seed_dump(config, path, collection, concurrency, max_articles, quiet).await
        }
        Commands::Init { path } => commands::init_config(path).await,
    }
}
