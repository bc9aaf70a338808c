//! beatleads CLI
//!
//! Artist lead discovery from type-beat producers with headless Chrome.
//! JSON on stdout, progress logs on stderr.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{
    run_artists, run_producers, run_profile, run_scrape, ArtistsArgs, GlobalArgs, ProducersArgs,
    ProfileArgs, ScrapeArgs,
};

#[derive(Parser)]
#[command(name = "beatleads")]
#[command(version)]
#[command(about = "Artist lead discovery from type-beat producers")]
#[command(long_about = "Finds producers from \"<term> Type Beat\" video search results, expands them into artist profiles, and extracts contact info.\n\nCommands:\n  scrape      Full pipeline, artists with Instagram only\n  producers   Producer names for a search term\n  artists     All artist leads for one producer\n  profile     Contact info for one profile URL")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline for a search term (e.g. an artist name)
    Scrape(ScrapeArgs),
    /// List producer names found for a search term
    Producers(ProducersArgs),
    /// Discover and extract artist profiles for one producer
    Artists(ArtistsArgs),
    /// Extract contact info from a single profile URL
    Profile(ProfileArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("beatleads=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.global.load_config()?;

    match cli.command {
        Commands::Scrape(args) => run_scrape(args, config).await,
        Commands::Producers(args) => run_producers(args, config).await,
        Commands::Artists(args) => run_artists(args, config).await,
        Commands::Profile(args) => run_profile(args, config).await,
    }
}
