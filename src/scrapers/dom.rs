//! Optional-field accessors over a parsed page.
//!
//! Every field an extractor reads goes through one of these helpers and
//! names its default explicitly (see the sentinel constants in
//! [`crate::models`]). A selector miss is never an error: it yields `None`
//! and the caller picks the sentinel. Text is trimmed and an element whose
//! text is empty counts as missing.

use anyhow::{anyhow, Result};
use scraper::{ElementRef, Selector};
use tracing::warn;
use url::Url;

use crate::error::ExtractError;
use crate::models::Sport;

/// Parse one of the extractors' CSS selectors.
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector {css:?}: {e:?}"))
}

/// Trimmed text content of an element, `None` when empty.
pub fn own_text(el: ElementRef<'_>) -> Option<String> {
    let text = el.text().collect::<String>();
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

pub fn first<'a>(scope: ElementRef<'a>, sel: &Selector) -> Option<ElementRef<'a>> {
    scope.select(sel).next()
}

pub fn text(scope: ElementRef<'_>, sel: &Selector) -> Option<String> {
    first(scope, sel).and_then(own_text)
}

pub fn text_or(scope: ElementRef<'_>, sel: &Selector, default: &str) -> String {
    text(scope, sel).unwrap_or_else(|| default.to_string())
}

pub fn attr(scope: ElementRef<'_>, sel: &Selector, name: &str) -> Option<String> {
    first(scope, sel)
        .and_then(|el| el.value().attr(name))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn exists(scope: ElementRef<'_>, sel: &Selector) -> bool {
    first(scope, sel).is_some()
}

pub fn has_class(el: ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

/// Nearest ancestor (excluding `el` itself) matching `sel`.
pub fn closest<'a>(el: ElementRef<'a>, sel: &Selector) -> Option<ElementRef<'a>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| sel.matches(a))
}

pub fn next_element_sibling(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.next_siblings().find_map(ElementRef::wrap)
}

/// Resolve a possibly relative `href` against the site's base URL.
pub fn absolute_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    base.join(href).ok().map(|u| u.to_string())
}

/// Run `f` over every card in DOM order. A card that fails to parse is
/// logged and dropped; the remaining cards are still returned.
pub fn extract_cards<'a, T, I, F>(cards: I, sport: Sport, mut f: F) -> Vec<T>
where
    I: IntoIterator<Item = ElementRef<'a>>,
    F: FnMut(ElementRef<'a>) -> Result<T, ExtractError>,
{
    let mut out = Vec::new();
    for (idx, card) in cards.into_iter().enumerate() {
        match f(card) {
            Ok(record) => out.push(record),
            Err(e) => warn!("[{}] dropping match card #{}: {}", sport, idx, e),
        }
    }
    out
}
