//! Headless Chrome render session via chromiumoxide
//!
//! One browser and one tab, opened once per command and reused for every
//! render. Calls are sequential; the tab is not shared between tasks.

use crate::error::{LeadError, Result};
use crate::render::{PageRenderer, RenderedPage};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    nav_timeout: Duration,
}

impl BrowserSession {
    /// Launch Chrome and open the working tab
    pub async fn launch(user_agent: &str, nav_timeout_ms: u64) -> Result<Self> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-setuid-sandbox")
            .arg("--no-first-run")
            .arg("--headless=new")
            .window_size(1920, 1080)
            .build()
            .map_err(|e| LeadError::Browser(format!("Browser config error: {}", e)))?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
            LeadError::Browser(format!(
                "Failed to launch Chrome. Is Chrome/Chromium installed? ({})",
                e
            ))
        })?;

        // Drive the CDP connection in the background
        let handler = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| LeadError::Browser(e.to_string()))?;

        page.execute(
            chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams::new(
                user_agent,
            ),
        )
        .await
        .map_err(|e| LeadError::Browser(e.to_string()))?;

        Ok(Self {
            browser,
            page,
            handler,
            nav_timeout: Duration::from_millis(nav_timeout_ms),
        })
    }

    /// Close the browser
    pub async fn close(mut self) -> Result<()> {
        self.browser
            .close()
            .await
            .map_err(|e| LeadError::Browser(e.to_string()))?;
        self.handler.abort();
        Ok(())
    }
}

#[async_trait]
impl PageRenderer for BrowserSession {
    async fn render(&self, url: &str, settle: Duration) -> Result<RenderedPage> {
        debug!(url, "render");
        match tokio::time::timeout(self.nav_timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                return Err(LeadError::Navigation {
                    url: url.to_string(),
                    reason: parse_error(&e.to_string()).to_string(),
                })
            }
            Err(_) => {
                return Err(LeadError::Timeout {
                    url: url.to_string(),
                })
            }
        }

        tokio::time::sleep(settle).await;

        let html = self
            .page
            .content()
            .await
            .map_err(|e| LeadError::Navigation {
                url: url.to_string(),
                reason: format!("Failed to get page content: {}", e),
            })?;

        Ok(RenderedPage::new(url, html))
    }
}

fn parse_error(error: &str) -> &'static str {
    if error.contains("ERR_NAME_NOT_RESOLVED") {
        "DNS_FAILED"
    } else if error.contains("ERR_CONNECTION_REFUSED") {
        "CONNECTION_REFUSED"
    } else if error.contains("ERR_CONNECTION_TIMED_OUT") {
        "TIMEOUT"
    } else if error.contains("ERR_CERT") || error.contains("SSL") {
        "SSL_ERROR"
    } else {
        "NETWORK_ERROR"
    }
}
