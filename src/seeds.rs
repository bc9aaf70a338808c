//! Producer seed discovery from video search results
//!
//! Plain HTTP, no rendering: the search page embeds its results as JSON in
//! the initial document, so channel names can be pulled out with regexes.

use crate::config::LeadsConfig;
use crate::error::Result;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

static CHANNEL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#""text":"([^"]+)","navigationEndpoint"[^}]*"browseEndpoint""#,
        r#""ownerText":\{"runs":\[\{"text":"([^"]+)""#,
        r#""shortBylineText":\{"runs":\[\{"text":"([^"]+)""#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static BEAT_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*(type\s*)?beats?\s*$").expect("valid regex"));

pub struct SeedDiscoverer {
    client: reqwest::Client,
    base_url: String,
    marketing_terms: Vec<String>,
}

impl SeedDiscoverer {
    pub fn new(config: &LeadsConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.http_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.youtube_base().to_string(),
            marketing_terms: config
                .denylists
                .marketing_terms
                .iter()
                .map(|t| t.to_lowercase())
                .collect(),
        })
    }

    /// Up to `limit` producer names for `term`, in discovery order.
    ///
    /// Never fails: fetch errors and empty results degrade to placeholder names.
    pub async fn discover(&self, term: &str, limit: usize) -> Vec<String> {
        let query = format!("{} Type Beat", term);
        info!(query = %query, "searching producers");

        let body = match self.fetch(&query).await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "producer search failed, using fallback names");
                return fallback_names(term, limit);
            }
        };

        let producers = self.parse_producers(&body, limit);
        if producers.is_empty() {
            warn!("no producers found, using fallback names");
            return fallback_names(term, limit);
        }

        info!(count = producers.len(), ?producers, "producers found");
        producers
    }

    async fn fetch(&self, query: &str) -> Result<String> {
        let url = format!("{}/results", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("search_query", query)])
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.text().await?)
    }

    /// Channel names from a search results page, cleaned and deduplicated
    pub fn parse_producers(&self, body: &str, limit: usize) -> Vec<String> {
        let mut producers: Vec<String> = Vec::new();

        'families: for re in CHANNEL_PATTERNS.iter() {
            for cap in re.captures_iter(body) {
                if producers.len() >= limit {
                    break 'families;
                }

                let raw = unescape_json(&cap[1]);
                if raw.chars().count() <= 2 {
                    continue;
                }

                let name = BEAT_SUFFIX.replace(&raw, "").trim().to_string();
                if name.chars().count() <= 2 || producers.contains(&name) || self.is_marketing(&name)
                {
                    continue;
                }

                debug!(producer = %name, "found producer");
                producers.push(name);
            }
        }

        producers.truncate(limit);
        producers
    }

    fn is_marketing(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.marketing_terms.iter().any(|t| lower.contains(t.as_str()))
    }
}

/// Placeholder producers used when the search yields nothing usable
pub fn fallback_names(term: &str, limit: usize) -> Vec<String> {
    let mut names = vec![
        format!("{} Beats Producer", term),
        "Type Beat Maker".to_string(),
        format!("{} Style Beats", term),
    ];
    names.truncate(limit);
    names
}

/// Decode JSON string escapes (`&`, `\"`); raw text on failure
fn unescape_json(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }
    serde_json::from_str::<String>(&format!("\"{}\"", raw)).unwrap_or_else(|_| raw.to_string())
}
