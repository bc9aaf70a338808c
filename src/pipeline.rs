//! End-to-end lead scrape: seeds → profiles → qualified leads

use crate::config::LeadsConfig;
use crate::discover::ProfileDiscoverer;
use crate::error::{LeadError, Result};
use crate::lead::{LeadRecord, ScrapeResponse};
use crate::render::PageRenderer;
use crate::seeds::SeedDiscoverer;
use tracing::info;

pub struct Pipeline<'a> {
    config: &'a LeadsConfig,
    seeds: SeedDiscoverer,
    discoverer: ProfileDiscoverer<'a>,
}

impl<'a> Pipeline<'a> {
    pub fn new(renderer: &'a dyn PageRenderer, config: &'a LeadsConfig) -> Result<Self> {
        Ok(Self {
            config,
            seeds: SeedDiscoverer::new(config)?,
            discoverer: ProfileDiscoverer::new(renderer, config),
        })
    }

    /// Run every stage for `term` and keep only leads with an Instagram link.
    ///
    /// Per-item failures are absorbed by the stages; zero leads is a
    /// successful, empty response.
    pub async fn run(&self, term: &str) -> Result<ScrapeResponse> {
        let term = term.trim();
        if term.is_empty() {
            return Err(LeadError::EmptySearchTerm);
        }

        info!(term, "starting scrape");
        let producers = self.seeds.discover(term, self.config.seed_limit).await;
        if producers.is_empty() {
            info!("no producers found");
            return Ok(ScrapeResponse::from_leads(Vec::new()));
        }

        let leads = self.collect_leads(&producers).await;
        info!(total = leads.len(), "artists found");

        let response = ScrapeResponse::from_leads(leads);
        info!(count = response.count, "artists with instagram");
        Ok(response)
    }

    /// Every lead for every producer, in producer order (unfiltered)
    pub async fn collect_leads(&self, producers: &[String]) -> Vec<LeadRecord> {
        let mut leads = Vec::new();
        for (i, producer) in producers.iter().enumerate() {
            info!("producer {}/{}: '{}'", i + 1, producers.len(), producer);
            let found = self.discoverer.discover(producer).await;
            info!(producer = %producer, count = found.len(), "producer done");
            leads.extend(found);
        }
        leads
    }
}
