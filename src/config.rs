//! Pipeline configuration
//!
//! Defaults are compiled in; a YAML file may override any subset of keys.
//! The denylists are not exhaustive; extend them from the config file.

use crate::error::{LeadError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadsConfig {
    /// Video platform base URL (seed search)
    pub youtube_url: String,
    /// Audio platform base URL (profile search and candidate URLs)
    pub soundcloud_url: String,
    pub user_agent: String,
    /// Producers taken from the seed search
    pub seed_limit: usize,
    /// Candidate URLs collected per producer before discovery stops
    pub url_target: usize,
    /// Candidate URLs actually extracted per producer
    pub extract_limit: usize,
    /// Anchors examined per search query
    pub links_per_query: usize,
    pub search_settle_ms: u64,
    pub profile_settle_ms: u64,
    pub nav_timeout_ms: u64,
    pub http_timeout_ms: u64,
    pub denylists: Denylists,
}

impl Default for LeadsConfig {
    fn default() -> Self {
        Self {
            youtube_url: "https://www.youtube.com".to_string(),
            soundcloud_url: "https://soundcloud.com".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            seed_limit: 5,
            url_target: 20,
            extract_limit: 15,
            links_per_query: 30,
            search_settle_ms: 2000,
            profile_settle_ms: 3000,
            nav_timeout_ms: 30000,
            http_timeout_ms: 10000,
            denylists: Denylists::default(),
        }
    }
}

impl LeadsConfig {
    /// Load a YAML config file; missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: LeadsConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if url::Url::parse(&self.youtube_url).is_err() {
            return Err(LeadError::Config(format!(
                "invalid youtube_url: {}",
                self.youtube_url
            )));
        }
        if url::Url::parse(&self.soundcloud_url).is_err() {
            return Err(LeadError::Config(format!(
                "invalid soundcloud_url: {}",
                self.soundcloud_url
            )));
        }
        if self.extract_limit > self.url_target {
            return Err(LeadError::Config(format!(
                "extract_limit ({}) exceeds url_target ({})",
                self.extract_limit, self.url_target
            )));
        }
        Ok(())
    }

    pub fn search_settle(&self) -> Duration {
        Duration::from_millis(self.search_settle_ms)
    }

    pub fn profile_settle(&self) -> Duration {
        Duration::from_millis(self.profile_settle_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }

    /// Base URL without a trailing slash
    pub fn soundcloud_base(&self) -> &str {
        self.soundcloud_url.trim_end_matches('/')
    }

    pub fn youtube_base(&self) -> &str {
        self.youtube_url.trim_end_matches('/')
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Denylists {
    /// Reserved search-result paths; an href containing one anywhere is skipped
    pub system_paths: Vec<String>,
    /// Words that mark a first path segment as a sub-resource instead of a user
    pub handle_words: Vec<String>,
    /// Substrings that disqualify an Instagram handle found in a bio
    pub handle_stopwords: Vec<String>,
    /// Instagram paths that are never a user, for the page-source pass
    pub generic_instagram_paths: Vec<String>,
    /// URL substrings marking a non-profile page
    pub profile_indicators: Vec<String>,
    /// Visible-text substrings marking an error page
    pub error_indicators: Vec<String>,
    /// Header texts that belong to system pages, not artists
    pub system_titles: Vec<String>,
    /// Channel-name substrings that disqualify a producer seed
    pub marketing_terms: Vec<String>,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for Denylists {
    fn default() -> Self {
        Self {
            system_paths: owned(&[
                "/search",
                "/tracks",
                "/sets",
                "/discover",
                "/you",
                "/stream",
                "/feed",
                "/upload",
                "/terms-of-use",
                "/pages",
                "/imprint",
                "/charts",
                "/premium",
                "/pro",
                "/mobile",
                "/apps",
                "/help",
                "/jobs",
                "/developers",
                "/blog",
                "/creators",
                "/copyright",
                "/privacy",
                "/community-guidelines",
                "/advertising",
                "/legal",
                "/pricing",
            ]),
            handle_words: owned(&[
                "track",
                "set",
                "playlist",
                "likes",
                "reposts",
                "followers",
                "following",
            ]),
            handle_stopwords: owned(&["instagram", "follow", "like", "share"]),
            generic_instagram_paths: owned(&[
                "instagram",
                "www",
                "help",
                "about",
                "explore",
                "accounts",
                "p",
                "soundcloud",
            ]),
            profile_indicators: owned(&[
                "terms-of-use",
                "pages",
                "imprint",
                "upload",
                "feed",
                "charts",
                "privacy",
                "copyright",
                "security",
                "community-guidelines",
                "help",
                "jobs",
                "developers",
                "blog",
                "creators",
                "advertising",
            ]),
            error_indicators: owned(&[
                "can't find that page",
                "page not found",
                "not found",
                "user not found",
                "profile not found",
                "sorry! something went wrong",
            ]),
            system_titles: owned(&[
                "We can't find that page.",
                "SoundCloud Terms of Use",
                "Company Information",
                "First upload to first album",
                "Page not found",
                "User not found",
                "Sorry! Something went wrong",
            ]),
            marketing_terms: owned(&["youtube", "music", "official", "vevo"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LeadsConfig::default();
        assert_eq!(config.seed_limit, 5);
        assert_eq!(config.url_target, 20);
        assert_eq!(config.extract_limit, 15);
        assert_eq!(config.soundcloud_base(), "https://soundcloud.com");
        assert!(config.denylists.system_paths.contains(&"/search".to_string()));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
seed_limit: 3
soundcloud_url: "http://127.0.0.1:9000/"
denylists:
  marketing_terms: ["records"]
"#;
        let config = LeadsConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.seed_limit, 3);
        assert_eq!(config.soundcloud_base(), "http://127.0.0.1:9000");
        assert_eq!(config.url_target, 20);
        assert_eq!(config.denylists.marketing_terms, vec!["records".to_string()]);
        // untouched list keeps its default
        assert!(config.denylists.handle_words.contains(&"playlist".to_string()));
    }

    #[test]
    fn test_empty_yaml() {
        let config = LeadsConfig::from_yaml("  \n").unwrap();
        assert_eq!(config.extract_limit, 15);
    }

    #[test]
    fn test_invalid_config() {
        assert!(LeadsConfig::from_yaml("soundcloud_url: \"not a url\"").is_err());
        assert!(LeadsConfig::from_yaml("extract_limit: 30").is_err());
        assert!(LeadsConfig::from_yaml("seed_limit: [1, 2]").is_err());
    }
}
