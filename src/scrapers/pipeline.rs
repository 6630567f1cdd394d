//! Fetch-and-extract pipeline shared by every sport.
//!
//! One page load per call, no retries, nothing shared between calls.

use chrono::Utc;
use tracing::{debug, error, info};

use super::extractor::{extract_html, Extractor};
use super::source::PageSource;
use crate::error::ScrapeError;
use crate::models::ResultEnvelope;

/// Load the extractor's page and extract it, handing failures to the caller.
pub async fn fetch_or_raise<E>(source: &dyn PageSource, extractor: &E) -> Result<E::Data, ScrapeError>
where
    E: Extractor + ?Sized,
{
    let target = extractor.target();
    debug!("[{}] loading {} via {}", target.sport, target.url, source.name());

    let html = source.load(target).await?;
    let data = extract_html(extractor, &html, Utc::now());

    info!("[{}] {}", target.sport, extractor.summarize(&data));
    Ok(data)
}

/// Like [`fetch_or_raise`] but never fails: errors become a failure
/// envelope carrying the extractor's empty payload.
pub async fn fetch<E>(source: &dyn PageSource, extractor: &E) -> ResultEnvelope<E::Data>
where
    E: Extractor + ?Sized,
{
    match fetch_or_raise(source, extractor).await {
        Ok(data) => {
            let message = extractor.summarize(&data);
            ResultEnvelope::ok(data, message, Utc::now())
        }
        Err(e) => {
            error!(
                "[{}] scrape via {} failed: {}",
                extractor.target().sport,
                source.name(),
                e
            );
            let now = Utc::now();
            ResultEnvelope::failed(e.to_string(), extractor.empty(now), now)
        }
    }
}
