mod cache;
mod logging;
mod run;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "newsdigest")]
#[command(about = "Keyword news digests summarized by an LLM and pushed to LINE")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the digest pipeline for every configured target (the default)
    Run {
        /// Only process the target with this name
        #[arg(long)]
        target: Option<String>,

        /// Collect and rank only; no summaries, no LINE push, no cache update
        #[arg(long)]
        dry_run: bool,
    },
    /// List configured notification targets
    Targets,
    /// Inspect or reset the notified-URL cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Debug, Subcommand)]
enum CacheCommands {
    /// Show the cache path and number of recorded URLs
    Stats,
    /// Forget every recorded URL
    Clear,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = newsdigest_core::load_app_config()?;
    logging::init_tracing(&config)?;
    tracing::debug!(config = ?config, "configuration loaded");

    match cli.command {
        None => run::run_digest(&config, None, false).await,
        Some(Commands::Run { target, dry_run }) => {
            run::run_digest(&config, target.as_deref(), dry_run).await
        }
        Some(Commands::Targets) => run::list_targets(&config),
        Some(Commands::Cache { command }) => match command {
            CacheCommands::Stats => cache::cache_stats(&config),
            CacheCommands::Clear => cache::cache_clear(&config),
        },
    }
}
