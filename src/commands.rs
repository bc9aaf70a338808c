//! CLI commands: argument parsing and JSON output around the library stages

use anyhow::{bail, Context, Result};
use beatleads::browser::BrowserSession;
use beatleads::{
    Extraction, LeadError, LeadsConfig, Pipeline, ProfileDiscoverer, ProfileExtractor,
    ScrapeResponse, SeedDiscoverer,
};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, warn};

#[derive(Args)]
pub struct GlobalArgs {
    /// YAML config file (limits, delays, denylists)
    #[arg(long, global = true, env = "BEATLEADS_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Navigation timeout per page in milliseconds
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

impl GlobalArgs {
    pub fn load_config(&self) -> Result<LeadsConfig> {
        let mut config = match &self.config {
            Some(path) => LeadsConfig::load(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?,
            None => LeadsConfig::default(),
        };
        if let Some(timeout) = self.timeout {
            config.nav_timeout_ms = timeout;
        }
        Ok(config)
    }
}

#[derive(Args)]
pub struct ScrapeArgs {
    /// Search term, e.g. an artist whose type beats to look for
    #[arg(value_name = "TERM")]
    term: String,

    /// Number of producers to expand (1-20)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=20))]
    producers: Option<u8>,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
pub struct ProducersArgs {
    /// Search term
    #[arg(value_name = "TERM")]
    term: String,

    /// Maximum number of producer names
    #[arg(long, short, value_parser = clap::value_parser!(u8).range(1..=50))]
    limit: Option<u8>,
}

#[derive(Args)]
pub struct ArtistsArgs {
    /// Producer name to search profiles for
    #[arg(value_name = "PRODUCER")]
    producer: String,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
pub struct ProfileArgs {
    /// Profile URL
    #[arg(value_name = "URL")]
    url: String,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Serialize)]
struct Failure<'a> {
    success: bool,
    error: &'a str,
}

#[derive(Debug, Serialize)]
struct NotFound {
    found: bool,
    reason: &'static str,
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

fn fail(message: &str) -> ! {
    let failure = Failure {
        success: false,
        error: message,
    };
    if let Ok(out) = serde_json::to_string(&failure) {
        println!("{}", out);
    }
    std::process::exit(1);
}

async fn close(session: BrowserSession) {
    if let Err(e) = session.close().await {
        warn!(error = %e, "failed to close browser");
    }
}

/// Run the scrape command
pub async fn run_scrape(args: ScrapeArgs, mut config: LeadsConfig) -> Result<()> {
    if args.term.trim().is_empty() {
        fail(&LeadError::EmptySearchTerm.to_string());
    }
    if let Some(n) = args.producers {
        config.seed_limit = n as usize;
    }

    match scrape(&args.term, &config).await {
        Ok(response) => {
            print_json(&response, args.pretty)?;
            eprintln!("Done: {} leads with Instagram", response.count);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "scrape failed");
            fail("An error occurred during scraping")
        }
    }
}

async fn scrape(term: &str, config: &LeadsConfig) -> beatleads::Result<ScrapeResponse> {
    let session = BrowserSession::launch(&config.user_agent, config.nav_timeout_ms).await?;
    let result = match Pipeline::new(&session, config) {
        Ok(pipeline) => pipeline.run(term).await,
        Err(e) => Err(e),
    };
    close(session).await;
    result
}

/// Run the producers command
pub async fn run_producers(args: ProducersArgs, config: LeadsConfig) -> Result<()> {
    if args.term.trim().is_empty() {
        bail!("{}", LeadError::EmptySearchTerm);
    }
    let limit = args.limit.map(usize::from).unwrap_or(config.seed_limit);
    let seeds = SeedDiscoverer::new(&config)?;
    let producers = seeds.discover(args.term.trim(), limit).await;
    println!("{}", serde_json::to_string(&producers)?);
    Ok(())
}

/// Run the artists command
pub async fn run_artists(args: ArtistsArgs, config: LeadsConfig) -> Result<()> {
    if args.producer.trim().is_empty() {
        bail!("Producer name is required");
    }
    let session = BrowserSession::launch(&config.user_agent, config.nav_timeout_ms).await?;
    let leads = ProfileDiscoverer::new(&session, &config)
        .discover(args.producer.trim())
        .await;
    close(session).await;

    print_json(&leads, args.pretty)?;
    eprintln!("Done: {} artists", leads.len());
    Ok(())
}

/// Run the profile command
pub async fn run_profile(args: ProfileArgs, config: LeadsConfig) -> Result<()> {
    url::Url::parse(&args.url).with_context(|| format!("Invalid URL: {}", args.url))?;

    let session = BrowserSession::launch(&config.user_agent, config.nav_timeout_ms).await?;
    let result = ProfileExtractor::new(&session, &config)
        .extract(&args.url)
        .await;
    close(session).await;

    match result.with_context(|| format!("Failed to extract {}", args.url))? {
        Extraction::Lead(lead) => print_json(&lead, args.pretty),
        Extraction::NotFound(reason) => print_json(
            &NotFound {
                found: false,
                reason: reason.as_str(),
            },
            args.pretty,
        ),
    }
}
