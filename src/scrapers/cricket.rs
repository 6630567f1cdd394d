use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::dom::{self, absolute_url, extract_cards, own_text};
use super::extractor::{Extractor, PageTarget};
use crate::error::ExtractError;
use crate::models::{CricketMatch, CricketTeam, MatchState, Sport, LIVE_LABEL, NOT_AVAILABLE};

pub const CRICBUZZ_URL: &str = "https://www.cricbuzz.com/cricket-match/live-scores";
const CARD: &str = ".cb-mtch-lst.cb-col.cb-col-100.cb-tms-itm";

const FINISHED_MARKERS: &[&str] = &["won by", "drawn", "tied", "no result", "abandoned"];
const UPCOMING_MARKERS: &[&str] = &["starts at", "preview", "yet to begin"];
const LIVE_MARKERS: &[&str] = &[
    "live",
    "need",
    "require",
    "trail by",
    "lead by",
    "opt to",
    "elected to",
    "innings break",
    "stumps",
];
const VENUE_NOISE: &[&str] = &["at", "Today", "•", "-"];

struct Selectors {
    card: Selector,
    title: Selector,
    gray: Selector,
    timestamp: Selector,
    team_name: Selector,
    status: Selector,
}

/// Cricbuzz live-scores list page.
pub struct CricketExtractor {
    target: PageTarget,
    base: Url,
    sel: Selectors,
}

impl CricketExtractor {
    pub fn new() -> Result<Self> {
        let base = Url::parse(CRICBUZZ_URL).context("Invalid Cricbuzz URL")?;
        Ok(CricketExtractor {
            target: PageTarget {
                sport: Sport::Cricket,
                url: CRICBUZZ_URL.to_string(),
                ready_selector: CARD.to_string(),
                navigation_timeout: Duration::from_secs(30),
                selector_timeout: Duration::from_secs(15),
            },
            base,
            sel: Selectors {
                card: dom::selector(CARD)?,
                title: dom::selector(".cb-lv-scr-mtch-hdr a")?,
                gray: dom::selector(".text-gray")?,
                timestamp: dom::selector("[ng-bind], [timestamp]")?,
                team_name: dom::selector(".cb-hmscg-tm-nm")?,
                status: dom::selector(".cb-text-complete, .cb-text-inprogress, .cb-text-preview")?,
            },
        })
    }

    fn parse_card(&self, card: ElementRef<'_>) -> Result<CricketMatch, ExtractError> {
        let title_el = dom::first(card, &self.sel.title);
        let title = title_el
            .and_then(own_text)
            .map(|t| t.replace(',', "").trim().to_string())
            .filter(|t| !t.is_empty());
        let match_link = title_el
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| absolute_url(&self.base, href))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let teams: Vec<CricketTeam> = card
            .select(&self.sel.team_name)
            .map(|team| CricketTeam {
                name: own_text(team).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                score: dom::next_element_sibling(team)
                    .filter(|sib| !self.sel.team_name.matches(sib))
                    .and_then(own_text)
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            })
            .collect();

        if title.is_none() && teams.is_empty() {
            return Err(ExtractError::NoParticipants);
        }

        let match_number = dom::text(card, &self.sel.gray)
            .map(|t| t.replace("&nbsp;", " ").trim().to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let venue = card
            .select(&self.sel.gray)
            .last()
            .and_then(own_text)
            .map(|t| clean_venue(&t))
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let (date, time) = match self.timestamp(card) {
            Some(ts) => (
                ts.format("%d/%m/%Y").to_string(),
                ts.format("%-I:%M %p").to_string(),
            ),
            None => (String::new(), String::new()),
        };

        let status_el = dom::first(card, &self.sel.status);
        let status = status_el
            .and_then(own_text)
            .unwrap_or_else(|| LIVE_LABEL.to_string());
        let state = classify(status_el, &status);

        Ok(CricketMatch {
            title: title.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            match_number,
            date,
            time,
            venue,
            teams,
            status,
            state,
            match_link,
        })
    }

    /// First epoch-millisecond value found in an `ng-bind` or `timestamp`
    /// attribute inside the card.
    fn timestamp(&self, card: ElementRef<'_>) -> Option<DateTime<Utc>> {
        card.select(&self.sel.timestamp)
            .filter_map(|el| {
                el.value()
                    .attr("ng-bind")
                    .or_else(|| el.value().attr("timestamp"))
            })
            .find_map(epoch_millis)
            .and_then(DateTime::from_timestamp_millis)
    }
}

impl Extractor for CricketExtractor {
    type Data = Vec<CricketMatch>;

    fn target(&self) -> &PageTarget {
        &self.target
    }

    fn extract(&self, document: &Html, _scraped_at: DateTime<Utc>) -> Vec<CricketMatch> {
        let cards = document.select(&self.sel.card);
        let parsed = extract_cards(cards, Sport::Cricket, |card| self.parse_card(card));
        let before = parsed.len();
        let matches = dedup_by_title(parsed);
        if matches.len() != before {
            debug!(
                "[cricket] removed {} duplicate match card(s)",
                before - matches.len()
            );
        }
        matches
    }

    fn empty(&self, _scraped_at: DateTime<Utc>) -> Vec<CricketMatch> {
        Vec::new()
    }

    fn summarize(&self, data: &Vec<CricketMatch>) -> String {
        let count = |s: MatchState| data.iter().filter(|m| m.state == s).count();
        format!(
            "Found {} live, {} upcoming and {} finished cricket matches",
            count(MatchState::Live),
            count(MatchState::Upcoming),
            count(MatchState::Finished)
        )
    }
}

/// A result phrase always means finished; otherwise the status class wins
/// over the status text, and anything unrecognised is finished.
fn classify(status_el: Option<ElementRef<'_>>, status: &str) -> MatchState {
    let lower = status.to_lowercase();
    if FINISHED_MARKERS.iter().any(|m| lower.contains(m)) {
        return MatchState::Finished;
    }
    if let Some(el) = status_el {
        if dom::has_class(el, "cb-text-inprogress") {
            return MatchState::Live;
        }
        if dom::has_class(el, "cb-text-preview") {
            return MatchState::Upcoming;
        }
        if dom::has_class(el, "cb-text-complete") {
            return MatchState::Finished;
        }
    }
    classify_status_text(status)
}

fn classify_status_text(status: &str) -> MatchState {
    let s = status.to_lowercase();
    if FINISHED_MARKERS.iter().any(|m| s.contains(m)) {
        MatchState::Finished
    } else if UPCOMING_MARKERS.iter().any(|m| s.contains(m)) {
        MatchState::Upcoming
    } else if LIVE_MARKERS.iter().any(|m| s.contains(m)) {
        MatchState::Live
    } else {
        MatchState::Finished
    }
}

fn epoch_millis(raw: &str) -> Option<i64> {
    raw.split(|c: char| !c.is_ascii_digit())
        .find(|run| run.len() >= 10)
        .and_then(|run| run.parse().ok())
}

fn clean_venue(raw: &str) -> String {
    raw.split_whitespace()
        .map(|tok| tok.trim_matches(|c| c == '•' || c == '-'))
        .filter(|tok| !tok.is_empty() && !VENUE_NOISE.contains(tok))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercased with every non-alphanumeric character removed.
pub fn normalize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Keep the first card per normalised title. Cards without a title are
/// never treated as duplicates of each other.
fn dedup_by_title(matches: Vec<CricketMatch>) -> Vec<CricketMatch> {
    let mut seen = HashSet::new();
    matches
        .into_iter()
        .filter(|m| m.title == NOT_AVAILABLE || seen.insert(normalize_title(&m.title)))
        .collect()
}
