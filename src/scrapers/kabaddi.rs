use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use url::Url;

use super::dom::{self, absolute_url, extract_cards};
use super::extractor::{Extractor, PageTarget};
use crate::error::ExtractError;
use crate::models::{KabaddiData, KabaddiMatch, KabaddiState, KabaddiTeam, Sport, NOT_AVAILABLE};

pub const PRO_KABADDI_URL: &str = "https://www.prokabaddi.com/schedule-fixtures-results";
const LISTING: &str = ".fixtures-listing";

const UPCOMING_MARKERS: &[&str] = &["match starts at", "starts at", "upcoming", "yet to begin"];
const RESULT_MARKERS: &[&str] = &["won", "tied", "full time", "completed", "abandoned"];

/// Which `.fixtures-listing` block a card came from. The page lists the
/// current round first and past results after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Current,
    Past,
    Only,
}

struct Selectors {
    listing: Selector,
    group: Selector,
    match_count: Selector,
    team_a: Selector,
    team_b: Selector,
    team_name: Selector,
    team_score: Selector,
    team_won: Selector,
    status: Selector,
    venue: Selector,
    link: Selector,
}

/// Pro Kabaddi schedule, fixtures and results page.
pub struct KabaddiExtractor {
    target: PageTarget,
    base: Url,
    sel: Selectors,
}

impl KabaddiExtractor {
    pub fn new() -> Result<Self> {
        let base = Url::parse(PRO_KABADDI_URL).context("Invalid Pro Kabaddi URL")?;
        Ok(KabaddiExtractor {
            target: PageTarget {
                sport: Sport::Kabaddi,
                url: PRO_KABADDI_URL.to_string(),
                ready_selector: LISTING.to_string(),
                navigation_timeout: Duration::from_secs(30),
                selector_timeout: Duration::from_secs(10),
            },
            base,
            sel: Selectors {
                listing: dom::selector(LISTING)?,
                group: dom::selector(".fixtures-group")?,
                match_count: dom::selector(".element1 .match-count")?,
                team_a: dom::selector(".team.team-a")?,
                team_b: dom::selector(".team.team-b")?,
                team_name: dom::selector(".team-name")?,
                team_score: dom::selector(".team-score .score")?,
                team_won: dom::selector(".team-score.won")?,
                status: dom::selector(".match-status")?,
                venue: dom::selector(".element3 .match-place")?,
                link: dom::selector(".element2 a")?,
            },
        })
    }

    fn team(&self, fixture: ElementRef<'_>, side: &Selector) -> Option<KabaddiTeam> {
        let el = dom::first(fixture, side)?;
        Some(KabaddiTeam {
            name: dom::text_or(el, &self.sel.team_name, NOT_AVAILABLE),
            score: dom::text_or(el, &self.sel.team_score, NOT_AVAILABLE),
            won: dom::exists(el, &self.sel.team_won),
        })
    }

    fn parse_fixture(
        &self,
        fixture: ElementRef<'_>,
        section: Section,
    ) -> Result<KabaddiMatch, ExtractError> {
        let team_a = self.team(fixture, &self.sel.team_a);
        let team_b = self.team(fixture, &self.sel.team_b);
        let named = |t: &Option<KabaddiTeam>| t.as_ref().is_some_and(|t| t.name != NOT_AVAILABLE);
        if !named(&team_a) && !named(&team_b) {
            return Err(ExtractError::NoParticipants);
        }
        let missing = || KabaddiTeam {
            name: NOT_AVAILABLE.to_string(),
            score: NOT_AVAILABLE.to_string(),
            won: false,
        };

        let status = dom::text_or(fixture, &self.sel.status, NOT_AVAILABLE);
        let state = classify(&status, section);
        let match_link = dom::attr(fixture, &self.sel.link, "href")
            .and_then(|href| absolute_url(&self.base, &href))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        Ok(KabaddiMatch {
            match_number: dom::text_or(fixture, &self.sel.match_count, NOT_AVAILABLE),
            team_a: team_a.unwrap_or_else(missing),
            team_b: team_b.unwrap_or_else(missing),
            status,
            state,
            venue: dom::text_or(fixture, &self.sel.venue, NOT_AVAILABLE),
            match_link,
        })
    }
}

/// Status text decides when it carries a marker, and a result phrase beats
/// everything else. Otherwise the card's section decides: the current-round
/// block holds fixtures still to be played, everything else is a result.
fn classify(status: &str, section: Section) -> KabaddiState {
    let s = status.to_lowercase();
    let state = if RESULT_MARKERS.iter().any(|m| s.contains(m)) {
        KabaddiState::Recent
    } else if s.contains("live") {
        KabaddiState::Live
    } else if UPCOMING_MARKERS.iter().any(|m| s.contains(m)) {
        KabaddiState::Upcoming
    } else if section == Section::Current {
        KabaddiState::Upcoming
    } else {
        KabaddiState::Recent
    };

    match (state, section) {
        (KabaddiState::Live, Section::Past) => KabaddiState::Recent,
        _ => state,
    }
}

impl Extractor for KabaddiExtractor {
    type Data = KabaddiData;

    fn target(&self) -> &PageTarget {
        &self.target
    }

    fn extract(&self, document: &Html, scraped_at: DateTime<Utc>) -> KabaddiData {
        let listings: Vec<ElementRef<'_>> = document.select(&self.sel.listing).collect();
        let mut data = KabaddiData::empty(scraped_at);

        for (idx, listing) in listings.iter().enumerate() {
            let section = match (listings.len(), idx) {
                (1, _) => Section::Only,
                (_, 0) => Section::Current,
                _ => Section::Past,
            };
            let fixtures = listing.select(&self.sel.group);
            for m in extract_cards(fixtures, Sport::Kabaddi, |f| self.parse_fixture(f, section)) {
                data.push(m);
            }
        }
        data
    }

    fn empty(&self, scraped_at: DateTime<Utc>) -> KabaddiData {
        KabaddiData::empty(scraped_at)
    }

    fn summarize(&self, data: &KabaddiData) -> String {
        format!(
            "Found {} live matches, {} upcoming matches and {} recent matches",
            data.live.len(),
            data.upcoming.len(),
            data.recent.len()
        )
    }
}
