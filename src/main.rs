use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

mod api;
mod config;
mod error;
mod models;
mod scrapers;

use api::AppState;
use config::{Config, Renderer};
use scrapers::{ChromeSource, Extractors, HttpSource, PageSource};

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up PORT, BROWSER_EXECUTABLE_PATH etc. from a local .env if present
    dotenvy::dotenv().ok();

    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let source: Arc<dyn PageSource> = match config.renderer {
        Renderer::Chrome => {
            let browser = config.browser_config();
            match &browser.executable {
                Some(path) => info!("Using Chrome at {}", path.display()),
                None => info!("Using auto-detected Chrome"),
            }
            Arc::new(ChromeSource::new(browser))
        }
        Renderer::Http => Arc::new(HttpSource::new(&config.user_agent)?),
    };
    info!(
        "Page source: {} ({:?} mode)",
        source.name(),
        config.environment
    );

    let state = AppState {
        source,
        extractors: Arc::new(Extractors::new()?),
    };
    let app = api::router(state);

    let addr: SocketAddr = config.listen_addr().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
