use chrono::{DateTime, Utc};
use scraper::Html;
use serde::Serialize;
use std::time::Duration;

use crate::models::Sport;

/// Where a sport's page lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct PageTarget {
    pub sport: Sport,
    pub url: String,
    /// Selector whose presence means the page has rendered its matches
    pub ready_selector: String,
    pub navigation_timeout: Duration,
    pub selector_timeout: Duration,
}

/// Turns a rendered page into a sport's payload.
///
/// Implementations are pure and infallible: a card that cannot be parsed is
/// dropped, and a page with no cards yields the empty payload.
pub trait Extractor: Send + Sync {
    type Data: Serialize + Send;

    fn target(&self) -> &PageTarget;

    fn extract(&self, document: &Html, scraped_at: DateTime<Utc>) -> Self::Data;

    /// Payload used by the failure envelope; same shape as a successful one.
    fn empty(&self, scraped_at: DateTime<Utc>) -> Self::Data;

    /// Human-readable summary for the success envelope.
    fn summarize(&self, data: &Self::Data) -> String;
}

/// Parse `html` and run the extractor over it. The parsed document never
/// leaves this function, so callers can stay `Send` across awaits.
pub fn extract_html<E: Extractor + ?Sized>(
    extractor: &E,
    html: &str,
    scraped_at: DateTime<Utc>,
) -> E::Data {
    let document = Html::parse_document(html);
    extractor.extract(&document, scraped_at)
}
