//! CLI binary for doubanq.
//!
//! Prints one Alfred script-filter JSON document to stdout. All tracing goes
//! to stderr so stdout stays machine-readable.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Search douban books, movies, music, and games.
#[derive(Parser)]
#[command(name = "doubanq", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, env = "DOUBANQ_CONFIG")]
    config: Option<PathBuf>,

    /// Category to search (book, movie, music, game, or any configured one).
    category: String,

    /// Search terms, joined with single spaces.
    #[arg(required = true, num_args = 1..)]
    query: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("doubanq=info,douban_search=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = doubanq::config::load(cli.config.as_deref())?;
    let query = cli.query.join(" ");

    tracing::debug!(category = %cli.category, "lookup started");
    let response = douban_search::lookup(&cli.category, &query, &config).await;
    tracing::debug!(count = response.items.len(), "lookup finished");

    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}
