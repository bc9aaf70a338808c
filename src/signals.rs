//! Text signal extraction: email and social handles from free text and HTML
//!
//! Each signal kind is an ordered [`Cascade`] of matchers. Order matters:
//! the first matcher that yields an accepted value wins.

use crate::config::Denylists;
use regex::Regex;
use std::sync::{Arc, LazyLock};

/// Anything that can pull one value out of a piece of text
pub trait Matcher: Send + Sync {
    fn try_match(&self, input: &str) -> Option<String>;
}

type Accept = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// One regex with a capture group, an acceptance check and a transform.
///
/// Only the first match in the input is considered.
pub struct RegexRule {
    regex: Regex,
    group: usize,
    accept: Accept,
    transform: fn(&str) -> String,
}

impl RegexRule {
    /// Case-insensitive rule returning the whole match
    pub fn new(pattern: &str) -> Self {
        Self::from_regex(case_insensitive(pattern))
    }

    pub fn from_regex(regex: Regex) -> Self {
        Self {
            regex,
            group: 0,
            accept: Arc::new(|_: &str| true),
            transform: |s| s.to_string(),
        }
    }

    pub fn capture(mut self, group: usize) -> Self {
        self.group = group;
        self
    }

    pub fn accept<F>(mut self, accept: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.accept = Arc::new(accept);
        self
    }

    pub fn transform(mut self, transform: fn(&str) -> String) -> Self {
        self.transform = transform;
        self
    }

    fn evaluate(&self, caps: &regex::Captures<'_>) -> Option<String> {
        let value = caps.get(self.group)?.as_str();
        (self.accept)(value).then(|| (self.transform)(value))
    }

    /// Consider every match in document order, not just the first
    pub fn all_matches(self) -> AllMatches {
        AllMatches(self)
    }
}

impl Matcher for RegexRule {
    fn try_match(&self, input: &str) -> Option<String> {
        let caps = self.regex.captures(input)?;
        self.evaluate(&caps)
    }
}

/// A rule that scans every match until one is accepted
pub struct AllMatches(RegexRule);

impl Matcher for AllMatches {
    fn try_match(&self, input: &str) -> Option<String> {
        self.0
            .regex
            .captures_iter(input)
            .find_map(|caps| self.0.evaluate(&caps))
    }
}

/// Ordered list of matchers, first success wins
#[derive(Default)]
pub struct Cascade {
    matchers: Vec<Box<dyn Matcher>>,
}

impl Cascade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<M: Matcher + 'static>(mut self, matcher: M) -> Self {
        self.matchers.push(Box::new(matcher));
        self
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl Matcher for Cascade {
    fn try_match(&self, input: &str) -> Option<String> {
        self.matchers.iter().find_map(|m| m.try_match(input))
    }
}

fn case_insensitive(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){}", pattern)).expect("valid regex")
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| case_insensitive(p)).collect()
}

fn lowercased(list: &[String]) -> Arc<Vec<String>> {
    Arc::new(list.iter().map(|s| s.to_lowercase()).collect())
}

fn clean_handle(raw: &str) -> &str {
    raw.trim_start_matches('@').trim_end_matches('.')
}

fn instagram_url(raw: &str) -> String {
    format!("https://instagram.com/{}", clean_handle(raw))
}

fn twitter_url(raw: &str) -> String {
    format!("https://twitter.com/{}", clean_handle(raw))
}

fn accept_ig_bio(raw: &str, stopwords: &[String]) -> bool {
    let handle = clean_handle(raw);
    let lower = handle.to_lowercase();
    handle.chars().count() > 2 && !stopwords.iter().any(|w| lower.contains(w.as_str()))
}

fn accept_twitter_bio(raw: &str) -> bool {
    clean_handle(raw).chars().count() > 2
}

fn accept_ig_source(raw: &str, generic: &[String]) -> bool {
    let handle = clean_handle(raw);
    let lower = handle.to_lowercase();
    handle.chars().count() > 2 && !generic.iter().any(|g| *g == lower)
}

fn prefixed_email(prefix: &str) -> RegexRule {
    RegexRule::new(&format!(r"{}[:\s]*([\w.-]+@[\w.-]+\.\w+)", prefix)).capture(1)
}

static EMAIL: LazyLock<Cascade> = LazyLock::new(|| {
    Cascade::new()
        .push(RegexRule::new(r"[\w.-]+@[\w.-]+\.\w+"))
        .push(prefixed_email("contact"))
        .push(prefixed_email("email"))
        .push(prefixed_email("business"))
});

static INSTAGRAM_BIO: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"instagram\.com/([\w.-]+)",
        r"@([\w.-]+)\s*(?:on\s*)?(?:ig|insta|instagram)",
        r"(?:ig|insta|instagram):\s*@?([\w.-]+)",
        r"(?:ig|insta|instagram)\s*@?([\w.-]+)",
        r"ig:\s*@?([\w.-]+)",
        r"follow.*instagram.*@([\w.-]+)",
        r"instagram.*@([\w.-]+)",
        r"@([\w.-]+).*ig\b",
        r"ig\s*-\s*@?([\w.-]+)",
        r"📷\s*@?([\w.-]+)",
        r"📸\s*@?([\w.-]+)",
    ])
});

static TWITTER_BIO: LazyLock<Cascade> = LazyLock::new(|| {
    let rule = |p: &str| {
        RegexRule::new(p)
            .capture(1)
            .accept(accept_twitter_bio)
            .transform(twitter_url)
    };
    Cascade::new()
        .push(rule(r"twitter\.com/([\w.-]+)"))
        .push(rule(r"@([\w.-]+)\s*(?:on\s*)?(?:tw|twitter)"))
        .push(rule(r"(?:tw|twitter):\s*@?([\w.-]+)"))
        .push(rule(r"follow.*twitter.*@([\w.-]+)"))
        .push(rule(r"🐦\s*@?([\w.-]+)"))
});

static INSTAGRAM_SOURCE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"instagram\.com/([\w.-]+)",
        r#""instagram"[^"]*"([^"]+)""#,
        r"ig\.com/([\w.-]+)",
        r#"@([\w.-]+)[^"]*instagram"#,
    ])
});

/// Bio cascade with the configured stopwords
fn instagram_bio_cascade(lists: &Denylists) -> Cascade {
    let stopwords = lowercased(&lists.handle_stopwords);
    INSTAGRAM_BIO.iter().fold(Cascade::new(), |cascade, regex| {
        let stopwords = Arc::clone(&stopwords);
        cascade.push(
            RegexRule::from_regex(regex.clone())
                .capture(1)
                .accept(move |raw| accept_ig_bio(raw, &stopwords))
                .transform(instagram_url),
        )
    })
}

/// Page-source cascade with the configured generic paths
fn instagram_source_cascade(lists: &Denylists) -> Cascade {
    let generic = lowercased(&lists.generic_instagram_paths);
    INSTAGRAM_SOURCE.iter().fold(Cascade::new(), |cascade, regex| {
        let generic = Arc::clone(&generic);
        cascade.push(
            RegexRule::from_regex(regex.clone())
                .capture(1)
                .accept(move |raw| accept_ig_source(raw, &generic))
                .transform(instagram_url)
                .all_matches(),
        )
    })
}

/// First email address in a bio
pub fn extract_email(bio: &str) -> Option<String> {
    EMAIL.try_match(bio)
}

/// Instagram profile URL from bio text
pub fn instagram_from_bio(bio: &str, lists: &Denylists) -> Option<String> {
    instagram_bio_cascade(lists).try_match(&bio.to_lowercase())
}

/// Twitter profile URL from bio text
pub fn twitter_from_bio(bio: &str) -> Option<String> {
    TWITTER_BIO.try_match(&bio.to_lowercase())
}

/// Instagram profile URL anywhere in the raw page source
pub fn instagram_from_source(html: &str, lists: &Denylists) -> Option<String> {
    instagram_source_cascade(lists).try_match(html)
}
