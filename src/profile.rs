//! Profile extraction: one artist page in, one lead record out
//!
//! Signals are merged first-found-wins across three passes, in this order:
//! profile link anchors, bio text, raw page source. A field filled by an
//! earlier pass is never overwritten.

use crate::config::{Denylists, LeadsConfig};
use crate::error::{Result, SkipReason};
use crate::lead::LeadRecord;
use crate::redirect;
use crate::render::{element_text, select_text, select_union, visible_text, PageRenderer};
use crate::signals;
use scraper::{Html, Selector};
use tracing::{debug, info};
use url::Url;

const NAME_SELECTORS: [&str; 12] = [
    "h1.profileHeaderInfo__title",
    "h2.profileHeaderInfo__userName",
    "h1.header__primary",
    ".profileHeader__username",
    ".profileHeaderInfo__displayName",
    ".userItem__username",
    "[data-testid=\"header-username\"]",
    ".profileHeader__usernameTruncated",
    ".profileHeader__usernameWrapper h1",
    "h1[class*=\"title\"]",
    ".profileHeader__displayName",
    ".profileHeaderInfo__usernameButton",
];

const BIO_SELECTORS: [&str; 9] = [
    "div.profileHeaderInfo__bio",
    ".profileHeader__description",
    ".userDescription",
    ".truncatedUserDescription__wrapper",
    "[data-testid=\"user-description\"]",
    ".profileHeaderInfo__description",
    ".profileDescription",
    ".profileHeaderInfo__descriptionText",
    ".userItem__description",
];

const SOCIAL_SELECTORS: [&str; 10] = [
    "a[href*=\"instagram.com\"]",
    "a[href*=\"twitter.com\"]",
    "a[href*=\"youtube.com\"]",
    ".profileHeader__social a",
    ".socialLinks a",
    "a.sc-social-logo-interactive",
    ".profileHeaderInfo__social a",
    "a[class*=\"social\"]",
    ".profileHeaderInfo__links a",
    ".userLinks a",
];

/// Outcome of extracting one profile URL
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Lead(LeadRecord),
    NotFound(SkipReason),
}

impl Extraction {
    pub fn into_lead(self) -> Option<LeadRecord> {
        match self {
            Extraction::Lead(lead) => Some(lead),
            Extraction::NotFound(_) => None,
        }
    }
}

pub struct ProfileExtractor<'a> {
    renderer: &'a dyn PageRenderer,
    config: &'a LeadsConfig,
}

impl<'a> ProfileExtractor<'a> {
    pub fn new(renderer: &'a dyn PageRenderer, config: &'a LeadsConfig) -> Self {
        Self { renderer, config }
    }

    /// Render `url` and extract a lead from it.
    ///
    /// System pages are rejected before any render happens.
    pub async fn extract(&self, url: &str) -> Result<Extraction> {
        if is_system_page(url, &self.config.denylists) {
            debug!(url, "skipping system page");
            return Ok(Extraction::NotFound(SkipReason::SystemPage));
        }

        let page = self
            .renderer
            .render(url, self.config.profile_settle())
            .await?;
        let extraction = extract_from_page(url, &page.html, self.config);

        match &extraction {
            Extraction::Lead(lead) => info!(
                url,
                name = %lead.name,
                instagram = %lead.instagram,
                "profile extracted"
            ),
            Extraction::NotFound(reason) => debug!(url, %reason, "no lead"),
        }
        Ok(extraction)
    }
}

pub fn is_system_page(url: &str, lists: &Denylists) -> bool {
    let lower = url.to_lowercase();
    lists
        .profile_indicators
        .iter()
        .any(|i| lower.contains(&i.to_lowercase()))
}

/// Extract a lead from already-rendered HTML
pub fn extract_from_page(url: &str, html: &str, config: &LeadsConfig) -> Extraction {
    let doc = Html::parse_document(html);
    let lists = &config.denylists;

    if is_error_page(&doc, lists) {
        return Extraction::NotFound(SkipReason::ErrorPage);
    }

    let platform = platform_label(config.soundcloud_base());
    let name = name_from_dom(&doc, lists).or_else(|| name_from_url(url, &platform));
    let Some(name) = name else {
        return Extraction::NotFound(SkipReason::Nameless);
    };

    let mut lead = LeadRecord::new(url);
    lead.name = name;
    lead.bio = bio_from_dom(&doc).unwrap_or_default();

    if !lead.bio.is_empty() {
        if let Some(email) = signals::extract_email(&lead.bio) {
            debug!(%email, "found email");
            lead.email = email;
        }
    }

    let base = Url::parse(url).ok();
    social_from_dom(&doc, base.as_ref(), &platform, &mut lead);

    if !lead.bio.is_empty() {
        social_from_bio(&mut lead, lists);
    }

    if lead.instagram.is_empty() {
        if let Some(ig) = signals::instagram_from_source(html, lists) {
            debug!(instagram = %ig, "found instagram in page source");
            lead.instagram = ig;
        }
    }

    Extraction::Lead(lead)
}

fn is_error_page(doc: &Html, lists: &Denylists) -> bool {
    let text = visible_text(doc).to_lowercase();
    lists
        .error_indicators
        .iter()
        .any(|e| text.contains(&e.to_lowercase()))
}

fn name_from_dom(doc: &Html, lists: &Denylists) -> Option<String> {
    NAME_SELECTORS.iter().find_map(|sel| {
        select_text(doc, sel)
            .filter(|name| !lists.system_titles.iter().any(|t| t == name))
            .filter(|name| name.chars().count() > 1)
    })
}

/// Display name derived from the last path segment (`dj-wave_99` → `Dj Wave 99`)
fn name_from_url(url: &str, platform: &str) -> Option<String> {
    let segment = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|segs| segs.filter(|s| !s.is_empty()).last().map(str::to_string)),
        Err(_) => url
            .split('/')
            .filter(|s| !s.is_empty())
            .last()
            .map(str::to_string),
    }?;

    let lower = segment.to_lowercase();
    if ["www", "com", platform].contains(&lower.as_str()) {
        return None;
    }

    let name = title_case(&segment.replace(['-', '_'], " "));
    (!name.is_empty()).then_some(name)
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn bio_from_dom(doc: &Html) -> Option<String> {
    BIO_SELECTORS.iter().find_map(|sel| {
        let selector = Selector::parse(sel).ok()?;
        doc.select(&selector)
            .next()
            .map(|el| element_text(el, "\n"))
            .filter(|bio| !bio.is_empty())
    })
}

fn social_from_dom(doc: &Html, base: Option<&Url>, platform: &str, lead: &mut LeadRecord) {
    for el in select_union(doc, &SOCIAL_SELECTORS) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if href.is_empty() {
            continue;
        }
        let absolute = match base {
            Some(base) => base
                .join(href)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| href.to_string()),
            None => href.to_string(),
        };
        let real = redirect::resolve(&absolute);
        assign_link(lead, &real, platform);
    }
}

/// Put a resolved link into the first matching field that is still empty
fn assign_link(lead: &mut LeadRecord, link: &str, platform: &str) {
    let lower = link.to_lowercase();
    let slot = if lower.contains("instagram.com") {
        &mut lead.instagram
    } else if lower.contains("youtube.com") {
        &mut lead.youtube
    } else if lower.contains("twitter.com") {
        &mut lead.twitter
    } else if is_external(link, platform) {
        &mut lead.website
    } else {
        return;
    };

    if slot.is_empty() {
        debug!(link, "found link");
        *slot = link.to_string();
    }
}

fn is_external(link: &str, platform: &str) -> bool {
    let Ok(parsed) = Url::parse(link) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    match parsed.host_str() {
        Some(host) => {
            let host = host.to_lowercase();
            !redirect::is_redirect_host(&host) && !host.split('.').any(|label| label == platform)
        }
        None => false,
    }
}

fn social_from_bio(lead: &mut LeadRecord, lists: &Denylists) {
    if lead.instagram.is_empty() {
        if let Some(ig) = signals::instagram_from_bio(&lead.bio, lists) {
            debug!(instagram = %ig, "found instagram in bio");
            lead.instagram = ig;
        }
    }
    if lead.twitter.is_empty() {
        if let Some(tw) = signals::twitter_from_bio(&lead.bio) {
            debug!(twitter = %tw, "found twitter in bio");
            lead.twitter = tw;
        }
    }
}

/// `https://soundcloud.com` → `soundcloud`
fn platform_label(base: &str) -> String {
    Url::parse(base)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .map(|host| {
            let host = host.trim_start_matches("www.");
            host.split('.').next().unwrap_or(host).to_lowercase()
        })
        .unwrap_or_else(|| "soundcloud".to_string())
}
