//! Profile discovery: one producer name in, candidate artist profiles out
//!
//! Every query template is searched in declared order. Profile handles are
//! collected into a single capped, insertion-ordered set shared across all
//! templates, then the first `extract_limit` are extracted.

use crate::config::{Denylists, LeadsConfig};
use crate::lead::LeadRecord;
use crate::profile::{Extraction, ProfileExtractor};
use crate::render::{select_union, PageRenderer};
use scraper::Html;
use std::collections::HashSet;
use tracing::{debug, info, warn};

pub const QUERY_TEMPLATES: [&str; 8] = [
    "{name}",
    "prod {name}",
    "prod. {name}",
    "produced by {name}",
    "{name} type beat",
    "{name} beat",
    "ft {name}",
    "x {name}",
];

const LINK_SELECTORS: [&str; 7] = [
    "a[href^=\"/\"][title]",
    "article a[href^=\"/\"]",
    ".trackItem a[href^=\"/\"]",
    ".soundTitle a[href^=\"/\"]",
    ".userItem a[href^=\"/\"]",
    "h2 a[href^=\"/\"]",
    ".sc-link-primary[href^=\"/\"]",
];

/// Insertion-ordered set of profile URLs with a hard capacity
#[derive(Debug, Clone)]
pub struct CandidateSet {
    urls: Vec<String>,
    seen: HashSet<String>,
    capacity: usize,
}

impl CandidateSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            urls: Vec::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns true if the URL was new and there was room for it
    pub fn insert(&mut self, url: String) -> bool {
        if self.is_full() || self.seen.contains(&url) {
            return false;
        }
        self.seen.insert(url.clone());
        self.urls.push(url);
        true
    }

    pub fn is_full(&self) -> bool {
        self.urls.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.urls
    }
}

pub struct ProfileDiscoverer<'a> {
    renderer: &'a dyn PageRenderer,
    config: &'a LeadsConfig,
    extractor: ProfileExtractor<'a>,
}

impl<'a> ProfileDiscoverer<'a> {
    pub fn new(renderer: &'a dyn PageRenderer, config: &'a LeadsConfig) -> Self {
        Self {
            renderer,
            config,
            extractor: ProfileExtractor::new(renderer, config),
        }
    }

    /// Leads for every extractable candidate profile of `producer`
    pub async fn discover(&self, producer: &str) -> Vec<LeadRecord> {
        let candidates = self.find_candidates(producer).await;
        if candidates.is_empty() {
            warn!(producer, "no artist profiles found");
            return Vec::new();
        }

        let total = candidates.len().min(self.config.extract_limit);
        let mut leads = Vec::new();

        for (i, url) in candidates.iter().take(self.config.extract_limit).enumerate() {
            info!(producer, "extracting artist {}/{}: {}", i + 1, total, url);
            match self.extractor.extract(url).await {
                Ok(Extraction::Lead(lead)) => leads.push(lead),
                Ok(Extraction::NotFound(reason)) => debug!(url, %reason, "skipped"),
                Err(e) => warn!(url, error = %e, "extraction failed"),
            }
        }

        info!(producer, count = leads.len(), "artists extracted");
        leads
    }

    /// Candidate profile URLs from every query template, stopping when full
    pub async fn find_candidates(&self, producer: &str) -> CandidateSet {
        let mut found = CandidateSet::new(self.config.url_target);

        for (i, template) in QUERY_TEMPLATES.iter().enumerate() {
            if found.is_full() {
                break;
            }

            let query = template.replace("{name}", producer);
            let url = search_url(self.config.soundcloud_base(), &query);
            info!(
                "query {}/{}: '{}'",
                i + 1,
                QUERY_TEMPLATES.len(),
                query
            );

            let page = match self.renderer.render(&url, self.config.search_settle()).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(query = %query, error = %e, "search failed");
                    continue;
                }
            };

            let added = collect_candidates(&page.html, self.config, &mut found);
            debug!(query = %query, added, total = found.len(), "query done");
        }

        info!(producer, total = found.len(), "unique artists found");
        found
    }
}

/// Search URL with the query percent-encoded (`%20` for spaces)
pub fn search_url(base: &str, query: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("{}/search?q={}", base, encoded.replace('+', "%20"))
}

/// Add candidate profile URLs found in a search results page; returns how many were new
pub fn collect_candidates(html: &str, config: &LeadsConfig, found: &mut CandidateSet) -> usize {
    let doc = Html::parse_document(html);
    let base = config.soundcloud_base();
    let mut added = 0;

    for el in select_union(&doc, &LINK_SELECTORS)
        .into_iter()
        .take(config.links_per_query)
    {
        if found.is_full() {
            break;
        }
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        if let Some(handle) = handle_from_href(href, &config.denylists) {
            let url = format!("{}/{}", base, handle);
            if found.insert(url.clone()) {
                debug!(url = %url, "found artist");
                added += 1;
            }
        }
    }

    added
}

/// Profile handle of a site-relative href, if it can be one
pub fn handle_from_href(href: &str, lists: &Denylists) -> Option<String> {
    if !href.starts_with('/') || href.starts_with("//") {
        return None;
    }

    let lower = href.to_lowercase();
    if lists
        .system_paths
        .iter()
        .any(|p| lower.contains(&p.to_lowercase()))
    {
        return None;
    }

    let path = href.split(['?', '#']).next().unwrap_or_default();
    let handle = path.trim_matches('/').split('/').next().unwrap_or_default();

    if handle.chars().count() <= 1 || handle.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let handle_lower = handle.to_lowercase();
    if lists
        .handle_words
        .iter()
        .any(|w| handle_lower.contains(&w.to_lowercase()))
    {
        return None;
    }

    Some(handle.to_string())
}
