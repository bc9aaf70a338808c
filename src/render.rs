//! Page rendering capability and DOM query helpers
//!
//! The pipeline only needs "give me the rendered HTML for this URL". The
//! headless Chrome session in [`crate::browser`] is the production
//! implementation; tests supply canned pages.

use crate::error::Result;
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;

#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Load `url`, wait `settle` for client-side rendering, return the DOM source
    async fn render(&self, url: &str, settle: Duration) -> Result<RenderedPage>;
}

/// Rendered page source
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub url: String,
    pub html: String,
}

impl RenderedPage {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }

    pub fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }
}

const HIDDEN_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Text nodes of an element, trimmed and joined with `sep`
pub fn element_text(el: ElementRef<'_>, sep: &str) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Trimmed text of the first element matching `sel`
pub fn select_text(doc: &Html, sel: &str) -> Option<String> {
    let selector = Selector::parse(sel).ok()?;
    doc.select(&selector)
        .next()
        .map(|el| element_text(el, " "))
        .filter(|s| !s.is_empty())
}

/// Every element matching any selector, in selector order (duplicates kept)
pub fn select_union<'a>(doc: &'a Html, selectors: &[&str]) -> Vec<ElementRef<'a>> {
    let mut out = Vec::new();
    for sel in selectors {
        if let Ok(selector) = Selector::parse(sel) {
            out.extend(doc.select(&selector));
        }
    }
    out
}

/// Human-visible document text (script and style contents excluded)
pub fn visible_text(doc: &Html) -> String {
    let mut out = Vec::new();
    for node in doc.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| HIDDEN_TAGS.contains(&e.name()))
        });
        let text = text.trim();
        if !hidden && !text.is_empty() {
            out.push(text);
        }
    }
    out.join(" ")
}
