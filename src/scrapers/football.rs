use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use url::Url;

use super::dom::{self, absolute_url, extract_cards};
use super::extractor::{Extractor, PageTarget};
use crate::error::ExtractError;
use crate::models::{FootballMatch, MatchState, Sport, NOT_AVAILABLE};

pub const FOTMOB_URL: &str = "https://www.fotmob.com/?show=ongoing";

// FotMob renders css-module classes such as `css-1ajdexg-MatchWrapper`; the
// hash prefix changes between deploys, the component suffix does not.
const CARD: &str = r#"a[class*="MatchWrapper"]"#;

struct Selectors {
    card: Selector,
    home_team: Selector,
    away_team: Selector,
    score: Selector,
    minute: Selector,
    kickoff: Selector,
    commentary: Selector,
}

/// FotMob ongoing-matches page.
pub struct FootballExtractor {
    target: PageTarget,
    base: Url,
    sel: Selectors,
}

impl FootballExtractor {
    pub fn new() -> Result<Self> {
        let base = Url::parse(FOTMOB_URL).context("Invalid FotMob URL")?;
        Ok(FootballExtractor {
            target: PageTarget {
                sport: Sport::Football,
                url: FOTMOB_URL.to_string(),
                ready_selector: CARD.to_string(),
                navigation_timeout: Duration::from_secs(30),
                selector_timeout: Duration::from_secs(15),
            },
            base,
            sel: Selectors {
                card: dom::selector(CARD)?,
                home_team: dom::selector(
                    r#"[class*="StatusAndHomeTeamWrapper"] [class*="TeamName"]"#,
                )?,
                away_team: dom::selector(
                    r#"[class*="AwayTeamAndFollowWrapper"] [class*="TeamName"]"#,
                )?,
                score: dom::selector(r#"[class*="LSMatchStatusScore"]"#)?,
                minute: dom::selector(r#"[class*="LSMatchStatusLive"]"#)?,
                kickoff: dom::selector(r#"[class*="LSMatchStatusTime"]"#)?,
                commentary: dom::selector(r#"[class*="TVIconWrapper"] svg.audio-icon"#)?,
            },
        })
    }

    fn parse_card(&self, card: ElementRef<'_>) -> Result<FootballMatch, ExtractError> {
        let home = dom::text(card, &self.sel.home_team);
        let away = dom::text(card, &self.sel.away_team);
        if home.is_none() && away.is_none() {
            return Err(ExtractError::NoParticipants);
        }

        let score = dom::text(card, &self.sel.score);
        let minute = dom::text(card, &self.sel.minute);
        let kickoff = dom::exists(card, &self.sel.kickoff);
        let status = classify(minute.is_some(), score.as_deref(), kickoff);

        let match_url = card
            .value()
            .attr("href")
            .and_then(|href| absolute_url(&self.base, href))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        Ok(FootballMatch {
            home_team: home.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            away_team: away.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            score: score.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            minute: minute.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            status,
            match_url,
            has_live_commentary: dom::exists(card, &self.sel.commentary),
        })
    }
}

impl Extractor for FootballExtractor {
    type Data = Vec<FootballMatch>;

    fn target(&self) -> &PageTarget {
        &self.target
    }

    fn extract(&self, document: &Html, _scraped_at: DateTime<Utc>) -> Vec<FootballMatch> {
        extract_cards(document.select(&self.sel.card), Sport::Football, |card| {
            self.parse_card(card)
        })
    }

    fn empty(&self, _scraped_at: DateTime<Utc>) -> Vec<FootballMatch> {
        Vec::new()
    }

    fn summarize(&self, data: &Vec<FootballMatch>) -> String {
        let live = data.iter().filter(|m| m.status == MatchState::Live).count();
        format!("Found {} football matches ({} live)", data.len(), live)
    }
}

/// A running clock means live. A score slot holding a kick-off time (or a
/// dedicated kick-off element without a score) means upcoming.
fn classify(has_minute: bool, score: Option<&str>, has_kickoff: bool) -> MatchState {
    if has_minute {
        return MatchState::Live;
    }
    match score {
        Some(s) if looks_like_clock(s) => MatchState::Upcoming,
        Some(_) => MatchState::Finished,
        None if has_kickoff => MatchState::Upcoming,
        None => MatchState::Finished,
    }
}

fn looks_like_clock(s: &str) -> bool {
    let s = s.trim();
    let (h, m) = match s.split_once(':') {
        Some(parts) => parts,
        None => return false,
    };
    let m = m.split_whitespace().next().unwrap_or_default();
    (1..=2).contains(&h.len())
        && m.len() == 2
        && h.chars().all(|c| c.is_ascii_digit())
        && m.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::extractor::extract_html;

    fn card(href: Option<&str>, home: &str, away: &str, status: &str, extra: &str) -> String {
        let href = href.map(|h| format!(r#" href="{h}""#)).unwrap_or_default();
        format!(
            r#"<a class="css-1ajdexg-MatchWrapper e1ek4pzx2"{href}>
                 <div class="css-9871a0-StatusAndHomeTeamWrapper">
                   <span class="css-1o142s8-TeamName">{home}</span>
                 </div>
                 {status}
                 <div class="css-gn249o-AwayTeamAndFollowWrapper">
                   <span class="css-1o142s8-TeamName">{away}</span>
                 </div>
                 {extra}
               </a>"#
        )
    }

    fn page(cards: &[String]) -> String {
        format!("<html><body><section>{}</section></body></html>", cards.concat())
    }

    #[test]
    fn test_live_card() {
        let x = FootballExtractor::new().unwrap();
        let html = page(&[card(
            Some("/matches/arsenal-vs-chelsea/2tz3b4"),
            "Arsenal",
            "Chelsea",
            r#"<span class="css-baclne-LSMatchStatusScore">2 - 1</span>
               <span class="css-1s1h719-LSMatchStatusLive">67'</span>"#,
            r#"<div class="css-sp7qfq-TVIconWrapper"><svg class="audio-icon"></svg></div>"#,
        )]);
        let matches = extract_html(&x, &html, Utc::now());

        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert_eq!(m.home_team, "Arsenal");
        assert_eq!(m.away_team, "Chelsea");
        assert_eq!(m.score, "2 - 1");
        assert_eq!(m.minute, "67'");
        assert_eq!(m.status, MatchState::Live);
        assert!(m.has_live_commentary);
        assert_eq!(
            m.match_url,
            "https://www.fotmob.com/matches/arsenal-vs-chelsea/2tz3b4"
        );
    }

    #[test]
    fn test_sentinels_and_statuses() {
        let x = FootballExtractor::new().unwrap();
        let html = page(&[
            card(
                None,
                "Inter",
                "Milan",
                r#"<span class="css-baclne-LSMatchStatusScore">19:45</span>"#,
                "",
            ),
            card(
                None,
                "Ajax",
                "PSV",
                r#"<span class="css-baclne-LSMatchStatusScore">0 - 0</span>"#,
                "",
            ),
            card(None, "Porto", "Benfica", "", ""),
        ]);
        let matches = extract_html(&x, &html, Utc::now());

        assert_eq!(matches.len(), 3);
        assert_eq!(matches[0].status, MatchState::Upcoming);
        assert_eq!(matches[0].minute, NOT_AVAILABLE);
        assert_eq!(matches[0].match_url, NOT_AVAILABLE);
        assert!(!matches[0].has_live_commentary);
        assert_eq!(matches[1].status, MatchState::Finished);
        assert_eq!(matches[2].score, NOT_AVAILABLE);
        assert_eq!(matches[2].status, MatchState::Finished);
    }

    #[test]
    fn test_card_without_teams_is_dropped() {
        let x = FootballExtractor::new().unwrap();
        let html = page(&[
            card(None, "Lazio", "Roma", "", ""),
            r#"<a class="css-1ajdexg-MatchWrapper" href="/ad">Sponsored</a>"#.to_string(),
            card(None, "Celtic", "Rangers", "", ""),
        ]);
        let matches = extract_html(&x, &html, Utc::now());

        let homes: Vec<&str> = matches.iter().map(|m| m.home_team.as_str()).collect();
        assert_eq!(homes, vec!["Lazio", "Celtic"]);
    }

    #[test]
    fn test_looks_like_clock() {
        assert!(looks_like_clock("19:45"));
        assert!(looks_like_clock("9:05 PM"));
        assert!(!looks_like_clock("2 - 1"));
        assert!(!looks_like_clock("FT"));
        assert!(!looks_like_clock("123:45"));
    }
}
