//! SiemGuide CLI: the main entry point.
//!
//! Commands:
//! - `sources`: List supported log sources
//! - `show`: Print a source's grounding document
//! - `references`: Print a source's reference links
//! - `providers`: List AI providers and which are usable
//! - `ask`: Ask one question about a source
//! - `chat`: Interactive session about a source
//! - `doctor`: Diagnose configuration and knowledge base (`--live` tests providers)
//! - `init`: Write a starter config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "siemguide",
    about = "SiemGuide — AI assistant for onboarding log sources into Splunk",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Knowledge base directory (overrides config)
    #[arg(long, global = true, env = "SIEMGUIDE_KB_PATH")]
    kb: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported log sources
    Sources {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the grounding document for a source
    Show {
        /// Source id (see `siemguide sources`)
        source: String,

        /// Only list the document's section headings
        #[arg(long)]
        sections: bool,
    },

    /// Print reference links for a source
    References {
        source: String,

        /// Emit JSON instead of a formatted list
        #[arg(long)]
        json: bool,
    },

    /// List AI providers and their availability
    Providers {
        #[arg(long)]
        json: bool,
    },

    /// Ask a single question about a source
    Ask {
        source: String,
        question: String,

        /// Provider id to use instead of automatic selection
        #[arg(short, long)]
        provider: Option<String>,
    },

    /// Interactive chat about a source
    Chat {
        source: String,

        #[arg(short, long)]
        provider: Option<String>,
    },

    /// Diagnose configuration, credentials and knowledge base
    Doctor {
        /// Also send a test request to every available provider
        #[arg(long)]
        live: bool,
    },

    /// Create ~/.siemguide/config.toml with defaults
    Init,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let kb = cli.kb;
    match cli.command {
        Commands::Sources { json } => commands::sources::run(kb, json).await?,
        Commands::Show { source, sections } => commands::show::run(kb, &source, sections).await?,
        Commands::References { source, json } => {
            commands::references::run(kb, &source, json).await?
        }
        Commands::Providers { json } => commands::providers::run(json).await?,
        Commands::Ask {
            source,
            question,
            provider,
        } => commands::ask::run(kb, &source, &question, provider.as_deref()).await?,
        Commands::Chat { source, provider } => {
            commands::chat::run(kb, &source, provider.as_deref()).await?
        }
        Commands::Doctor { live } => commands::doctor::run(kb, live).await?,
        Commands::Init => commands::init::run().await?,
    }

    Ok(())
}
