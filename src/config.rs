use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::scrapers::{BrowserConfig, DEFAULT_USER_AGENT};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
}

/// How pages are loaded.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Renderer {
    /// Headless Chrome, one browser per request
    Chrome,
    /// Plain HTTP GET of the server-rendered markup
    Http,
}

/// Live sports score scraper
#[derive(Parser, Debug, Clone)]
#[command(name = "livescore-scraper", version, about)]
pub struct Config {
    /// Listen host
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Listen port
    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Deployment environment; production requires an explicit browser path
    #[arg(long, env = "APP_ENV", value_enum, default_value = "development")]
    pub environment: Environment,

    /// Chrome/Chromium executable (auto-detected in development when unset)
    #[arg(long, env = "BROWSER_EXECUTABLE_PATH")]
    pub browser_path: Option<PathBuf>,

    /// Page loader
    #[arg(long, env = "RENDERER", value_enum, default_value = "chrome")]
    pub renderer: Renderer,

    /// User-Agent sent with every page load
    #[arg(long, env = "USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.environment == Environment::Production
            && self.renderer == Renderer::Chrome
            && self.browser_path.is_none()
        {
            anyhow::bail!(
                "BROWSER_EXECUTABLE_PATH is required in production. Set --browser-path or use --environment development."
            );
        }
        if self.port == 0 {
            anyhow::bail!("port must be non-zero");
        }
        if self.user_agent.trim().is_empty() {
            anyhow::bail!("user_agent must not be empty");
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Production always launches the configured binary; development uses
    /// the override when given and otherwise lets headless_chrome find one.
    pub fn browser_config(&self) -> BrowserConfig {
        let executable = match self.environment {
            Environment::Production => self.browser_path.clone(),
            Environment::Development => self.browser_path.clone().filter(|p| p.exists()),
        };
        BrowserConfig {
            executable,
            user_agent: self.user_agent.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["livescore-scraper"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_production_requires_browser_path() {
        let cfg = parse(&["--environment", "production", "--renderer", "chrome"]);
        let cfg = Config { browser_path: None, ..cfg };
        assert!(cfg.validate().is_err());

        let cfg = Config {
            browser_path: Some(PathBuf::from("/usr/bin/chromium")),
            ..cfg
        };
        assert!(cfg.validate().is_ok());
        assert_eq!(
            cfg.browser_config().executable,
            Some(PathBuf::from("/usr/bin/chromium"))
        );
    }

    #[test]
    fn test_http_renderer_needs_no_browser() {
        let cfg = parse(&["--environment", "production", "--renderer", "http"]);
        let cfg = Config { browser_path: None, ..cfg };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_development_ignores_missing_override() {
        let cfg = parse(&["--environment", "development"]);
        let cfg = Config {
            browser_path: Some(PathBuf::from("/definitely/not/a/chrome")),
            ..cfg
        };
        assert_eq!(cfg.browser_config().executable, None);
    }

    #[test]
    fn test_listen_addr() {
        let cfg = parse(&["--host", "127.0.0.1", "--port", "8081"]);
        assert_eq!(cfg.listen_addr(), "127.0.0.1:8081");
    }
}
