//! Headless Chrome page source.
//!
//! Every `load` launches its own browser process on tokio's blocking pool
//! and owns it for the whole call; dropping the `Browser` at the end of
//! `render` kills the process on every exit path, success or failure.

use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions};
use std::ffi::OsStr;
use std::path::PathBuf;
use tracing::debug;

use super::extractor::PageTarget;
use super::source::PageSource;
use crate::error::ScrapeError;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

// Sandboxing is disabled through `LaunchOptions::sandbox`; these keep Chrome
// happy inside containers with a small /dev/shm.
const LAUNCH_ARGS: &[&str] = &[
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--no-zygote",
    "--single-process",
    "--disable-accelerated-2d-canvas",
];

/// Launch settings resolved from [`crate::config::Config`].
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Chrome binary; `None` lets headless_chrome discover a local install.
    pub executable: Option<PathBuf>,
    pub user_agent: String,
}

pub struct ChromeSource {
    config: BrowserConfig,
}

impl ChromeSource {
    pub fn new(config: BrowserConfig) -> Self {
        ChromeSource { config }
    }
}

#[async_trait]
impl PageSource for ChromeSource {
    fn name(&self) -> &str {
        "chrome"
    }

    async fn load(&self, target: &PageTarget) -> Result<String, ScrapeError> {
        let config = self.config.clone();
        let target = target.clone();
        tokio::task::spawn_blocking(move || render(&config, &target)).await?
    }
}

fn render(config: &BrowserConfig, target: &PageTarget) -> Result<String, ScrapeError> {
    let launch = |e: &dyn std::fmt::Display| ScrapeError::Launch(e.to_string());

    let options = LaunchOptions::default_builder()
        .headless(true)
        .sandbox(false)
        .path(config.executable.clone())
        .args(LAUNCH_ARGS.iter().map(OsStr::new).collect())
        .idle_browser_timeout(target.navigation_timeout + target.selector_timeout)
        .build()
        .map_err(|e| launch(&e))?;

    let browser = Browser::new(options).map_err(|e| launch(&e))?;
    let tab = browser.new_tab().map_err(|e| launch(&e))?;
    tab.set_user_agent(&config.user_agent, None, None)
        .map_err(|e| launch(&e))?;

    debug!("[{}] navigating to {}", target.sport, target.url);
    tab.set_default_timeout(target.navigation_timeout);
    tab.navigate_to(&target.url)
        .and_then(|tab| tab.wait_until_navigated())
        .map_err(|e| ScrapeError::Navigation {
            url: target.url.clone(),
            reason: e.to_string(),
        })?;

    debug!("[{}] waiting for {}", target.sport, target.ready_selector);
    tab.wait_for_element_with_custom_timeout(&target.ready_selector, target.selector_timeout)
        .map_err(|e| ScrapeError::SelectorTimeout {
            selector: target.ready_selector.clone(),
            timeout: target.selector_timeout,
            reason: e.to_string(),
        })?;

    tab.get_content()
        .map_err(|e| ScrapeError::Content(e.to_string()))
}
