use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;

use super::extractor::PageTarget;
use crate::error::ScrapeError;

/// Something that can produce the rendered HTML of a sport's page.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Load `target.url` and return its HTML once `target.ready_selector`
    /// is present.
    async fn load(&self, target: &PageTarget) -> Result<String, ScrapeError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// Fetches server-rendered markup over plain HTTP, without a browser.
pub struct HttpSource {
    http: Client,
}

impl HttpSource {
    pub fn new(user_agent: &str) -> anyhow::Result<Self> {
        let http = Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(HttpSource { http })
    }
}

#[async_trait]
impl PageSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn load(&self, target: &PageTarget) -> Result<String, ScrapeError> {
        debug!("[{}] GET {}", target.sport, target.url);

        let navigation = |reason: String| ScrapeError::Navigation {
            url: target.url.clone(),
            reason,
        };
        let resp = self
            .http
            .get(&target.url)
            .timeout(target.navigation_timeout)
            .send()
            .await
            .map_err(|e| navigation(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(navigation(format!("HTTP {}", resp.status())));
        }

        let html = resp.text().await?;
        match contains_selector(&html, &target.ready_selector) {
            Ok(true) => Ok(html),
            Ok(false) => Err(ScrapeError::SelectorTimeout {
                selector: target.ready_selector.clone(),
                timeout: target.selector_timeout,
                reason: "not present in server-rendered HTML".to_string(),
            }),
            Err(reason) => Err(ScrapeError::SelectorTimeout {
                selector: target.ready_selector.clone(),
                timeout: target.selector_timeout,
                reason,
            }),
        }
    }
}

fn contains_selector(html: &str, css: &str) -> Result<bool, String> {
    let selector = Selector::parse(css).map_err(|e| format!("invalid selector: {e:?}"))?;
    Ok(Html::parse_document(html).select(&selector).next().is_some())
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use crate::models::Sport;
    use std::collections::HashMap;

    /// Serves canned HTML per sport; sports without a page fail navigation.
    #[derive(Default)]
    pub struct StaticSource {
        pages: HashMap<Sport, String>,
    }

    impl StaticSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_page(mut self, sport: Sport, html: impl Into<String>) -> Self {
            self.pages.insert(sport, html.into());
            self
        }
    }

    #[async_trait]
    impl PageSource for StaticSource {
        fn name(&self) -> &str {
            "static"
        }

        async fn load(&self, target: &PageTarget) -> Result<String, ScrapeError> {
            self.pages
                .get(&target.sport)
                .cloned()
                .ok_or_else(|| ScrapeError::Navigation {
                    url: target.url.clone(),
                    reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
                })
        }
    }
}
