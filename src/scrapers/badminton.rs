use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use url::Url;

use super::dom::{self, absolute_url, extract_cards, own_text};
use super::extractor::{Extractor, PageTarget};
use crate::error::ExtractError;
use crate::models::{
    BadmintonData, BadmintonMatch, BadmintonSide, BadmintonStatus, MatchType, SetScore, Sport,
    Tournament, LIVE_LABEL, NOT_AVAILABLE, UNKNOWN_CATEGORY, UNKNOWN_TOURNAMENT, ZERO_SCORE,
};

pub const FLASHSCORE_URL: &str = "https://www.flashscore.in/badminton/";
const CARD: &str = ".event__match";
const MATCH_ID_PREFIX: &str = "g_21_";

/// Participant and flag selectors for one side of the card.
struct SideSelectors {
    players: Vec<Selector>,
    flag: Selector,
    score: Selector,
    serve: Selector,
}

struct Selectors {
    card: Selector,
    link: Selector,
    time: Selector,
    stage: Selector,
    part: Selector,
    live_bet: Selector,
    sport_name: Selector,
    header_title: Selector,
    header_category: Selector,
    singles: (SideSelectors, SideSelectors),
    doubles: (SideSelectors, SideSelectors),
}

fn side(players: &[&str], flag: &str, home: bool) -> Result<SideSelectors> {
    let (score, serve) = if home {
        (".event__score--home", ".icon--serveHome")
    } else {
        (".event__score--away", ".icon--serveAway")
    };
    Ok(SideSelectors {
        players: players
            .iter()
            .map(|p| dom::selector(p))
            .collect::<Result<_>>()?,
        flag: dom::selector(flag)?,
        score: dom::selector(score)?,
        serve: dom::selector(serve)?,
    })
}

/// Flashscore badminton livescore page.
pub struct BadmintonExtractor {
    target: PageTarget,
    base: Url,
    sel: Selectors,
}

impl BadmintonExtractor {
    pub fn new() -> Result<Self> {
        let base = Url::parse(FLASHSCORE_URL).context("Invalid Flashscore URL")?;
        Ok(BadmintonExtractor {
            target: PageTarget {
                sport: Sport::Badminton,
                url: FLASHSCORE_URL.to_string(),
                ready_selector: CARD.to_string(),
                navigation_timeout: Duration::from_secs(30),
                selector_timeout: Duration::from_secs(10),
            },
            base,
            sel: Selectors {
                card: dom::selector(CARD)?,
                link: dom::selector("a.eventRowLink")?,
                time: dom::selector(".event__time")?,
                stage: dom::selector(".event__stage--block")?,
                part: dom::selector(".event__part")?,
                live_bet: dom::selector(".liveBetWrapper")?,
                sport_name: dom::selector(".sportName")?,
                header_title: dom::selector(".headerLeague__title-text")?,
                header_category: dom::selector(".headerLeague__category-text")?,
                singles: (
                    side(&[".event__participant--home"], ".event__logo--home", true)?,
                    side(&[".event__participant--away"], ".event__logo--away", false)?,
                ),
                doubles: (
                    side(
                        &[".event__participant--home1", ".event__participant--home2"],
                        ".event__logo--home1",
                        true,
                    )?,
                    side(
                        &[".event__participant--away1", ".event__participant--away2"],
                        ".event__logo--away1",
                        false,
                    )?,
                ),
            },
        })
    }

    fn parse_card(&self, card: ElementRef<'_>) -> Result<BadmintonMatch, ExtractError> {
        let status = if dom::has_class(card, "event__match--live") {
            BadmintonStatus::Live
        } else if dom::has_class(card, "event__match--scheduled") {
            BadmintonStatus::Scheduled
        } else {
            BadmintonStatus::Finished
        };
        let match_type = if dom::has_class(card, "event__match--doubles") {
            MatchType::Doubles
        } else {
            MatchType::Singles
        };

        let match_id = card
            .value()
            .id()
            .map(|id| id.replacen(MATCH_ID_PREFIX, "", 1))
            .filter(|id| !id.is_empty());

        let (home_sel, away_sel) = match match_type {
            MatchType::Singles => &self.sel.singles,
            MatchType::Doubles => &self.sel.doubles,
        };
        let home = read_side(card, home_sel);
        let away = read_side(card, away_sel);
        let set_scores = self.set_scores(card);

        if match_id.is_none()
            && home.players.is_empty()
            && away.players.is_empty()
            && set_scores.is_empty()
        {
            return Err(ExtractError::EmptyCard);
        }

        let time_or_stage = dom::text(card, &self.sel.time)
            .or_else(|| dom::text(card, &self.sel.stage))
            .unwrap_or_else(|| match status {
                BadmintonStatus::Live => LIVE_LABEL.to_string(),
                _ => NOT_AVAILABLE.to_string(),
            });

        let match_link = dom::attr(card, &self.sel.link, "href")
            .and_then(|href| absolute_url(&self.base, &href))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        Ok(BadmintonMatch {
            match_id: match_id.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            match_type,
            status,
            time_or_stage,
            tournament: self.tournament(card),
            home,
            away,
            set_scores,
            match_link,
            has_live_betting: dom::exists(card, &self.sel.live_bet),
        })
    }

    /// `.event__part` elements taken pairwise (home, away). The set number
    /// comes from the pair's position; a pair with both sides empty is
    /// skipped without renumbering the rest.
    fn set_scores(&self, card: ElementRef<'_>) -> Vec<SetScore> {
        let parts: Vec<ElementRef<'_>> = card.select(&self.sel.part).collect();
        parts
            .chunks(2)
            .enumerate()
            .filter_map(|(idx, pair)| {
                let home = pair.first().and_then(|el| own_text(*el)).unwrap_or_default();
                let away = pair.get(1).and_then(|el| own_text(*el)).unwrap_or_default();
                if home.is_empty() && away.is_empty() {
                    return None;
                }
                Some(SetScore {
                    set: idx + 1,
                    home,
                    away,
                    is_current: pair.iter().any(|el| dom::has_class(*el, "highlighted")),
                })
            })
            .collect()
    }

    /// League header for the card: the nearest preceding header row, else
    /// the first header inside the enclosing `.sportName` block.
    fn tournament(&self, card: ElementRef<'_>) -> Tournament {
        let header = card
            .prev_siblings()
            .filter_map(ElementRef::wrap)
            .find(|sib| {
                self.sel.header_title.matches(sib) || dom::exists(*sib, &self.sel.header_title)
            })
            .or_else(|| dom::closest(card, &self.sel.sport_name));

        let name = header.and_then(|h| header_text(h, &self.sel.header_title));
        let category = header.and_then(|h| header_text(h, &self.sel.header_category));
        Tournament {
            name: name.unwrap_or_else(|| UNKNOWN_TOURNAMENT.to_string()),
            category: category.unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
        }
    }
}

fn header_text(header: ElementRef<'_>, sel: &Selector) -> Option<String> {
    if sel.matches(&header) {
        own_text(header)
    } else {
        dom::text(header, sel)
    }
}

fn read_side(card: ElementRef<'_>, sel: &SideSelectors) -> BadmintonSide {
    let players = sel
        .players
        .iter()
        .filter_map(|p| dom::text(card, p))
        .collect();
    let country = dom::first(card, &sel.flag)
        .and_then(flag_code)
        .unwrap_or_default();
    BadmintonSide {
        players,
        country,
        score: dom::text_or(card, &sel.score, ZERO_SCORE),
        is_serving: dom::exists(card, &sel.serve),
    }
}

/// Digits of the `fl_N` flag class, e.g. `fl_39` -> `39`.
fn flag_code(logo: ElementRef<'_>) -> Option<String> {
    logo.value().classes().find_map(|class| {
        let digits: String = class
            .split_once("fl_")?
            .1
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        (!digits.is_empty()).then_some(digits)
    })
}

impl Extractor for BadmintonExtractor {
    type Data = BadmintonData;

    fn target(&self) -> &PageTarget {
        &self.target
    }

    fn extract(&self, document: &Html, scraped_at: DateTime<Utc>) -> BadmintonData {
        let matches = extract_cards(document.select(&self.sel.card), Sport::Badminton, |card| {
            self.parse_card(card)
        });
        let mut data = BadmintonData::empty(scraped_at);
        for m in matches {
            data.push(m);
        }
        data
    }

    fn empty(&self, scraped_at: DateTime<Utc>) -> BadmintonData {
        BadmintonData::empty(scraped_at)
    }

    fn summarize(&self, data: &BadmintonData) -> String {
        format!(
            "Found {} live matches, {} upcoming matches, and {} finished matches",
            data.live.len(),
            data.upcoming.len(),
            data.finished.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::extractor::extract_html;

    fn page(body: &str) -> String {
        format!("<html><body><div class=\"leagues--live\">{body}</div></body></html>")
    }

    const BWF: &str = r#"
      <div class="sportName badminton">
        <div class="headerLeague">
          <span class="headerLeague__category-text">WORLD</span>
          <span class="headerLeague__title-text">BWF World Tour - India Open</span>
        </div>
        <div id="g_21_AbCd1234" class="event__match event__match--live event__match--twoLine">
          <a class="eventRowLink" href="/match/badminton/AbCd1234/#/match-summary"></a>
          <div class="event__stage--block">Game 3</div>
          <img class="event__logo event__logo--home fl_39">
          <div class="event__participant event__participant--home">Axelsen V.</div>
          <svg class="icon--serveHome"></svg>
          <img class="event__logo event__logo--away fl_77">
          <div class="event__participant event__participant--away">Lee Z. J.</div>
          <div class="event__score event__score--home">1</div>
          <div class="event__score event__score--away">1</div>
          <div class="event__part event__part--home">21</div>
          <div class="event__part event__part--away">19</div>
          <div class="event__part event__part--home">15</div>
          <div class="event__part event__part--away">21</div>
          <div class="event__part event__part--home highlighted">11</div>
          <div class="event__part event__part--away highlighted">8</div>
          <div class="liveBetWrapper"></div>
        </div>
        <div class="headerLeague">
          <span class="headerLeague__category-text">ASIA</span>
          <span class="headerLeague__title-text">Asia Championships - Doubles</span>
        </div>
        <div id="g_21_Dbl00001" class="event__match event__match--scheduled event__match--doubles">
          <div class="event__time">18:30</div>
          <img class="event__logo event__logo--home1 fl_101">
          <div class="event__participant--home1">Gideon M.</div>
          <div class="event__participant--home2">Sukamuljo K.</div>
          <div class="event__participant--away1">Chia A.</div>
          <div class="event__participant--away2"></div>
        </div>
        <div id="g_21_Fin00001" class="event__match">
          <div class="event__participant--home">Sindhu P. V.</div>
          <div class="event__participant--away">Yamaguchi A.</div>
          <div class="event__score--home">2</div>
          <div class="event__score--away">0</div>
        </div>
      </div>"#;

    #[test]
    fn test_live_singles_card() {
        let x = BadmintonExtractor::new().unwrap();
        let data = extract_html(&x, &page(BWF), Utc::now());

        assert_eq!(data.live.len(), 1);
        let m = &data.live[0];
        assert_eq!(m.match_id, "AbCd1234");
        assert_eq!(m.match_type, MatchType::Singles);
        assert_eq!(m.status, BadmintonStatus::Live);
        assert_eq!(m.time_or_stage, "Game 3");
        assert_eq!(m.tournament.name, "BWF World Tour - India Open");
        assert_eq!(m.tournament.category, "WORLD");
        assert_eq!(m.home.players, vec!["Axelsen V."]);
        assert_eq!(m.home.country, "39");
        assert_eq!(m.away.country, "77");
        assert!(m.home.is_serving);
        assert!(!m.away.is_serving);
        assert_eq!(m.home.score, "1");
        assert!(m.has_live_betting);
        assert_eq!(
            m.match_link,
            "https://www.flashscore.in/match/badminton/AbCd1234/#/match-summary"
        );
        assert_eq!(m.set_scores.len(), 3);
        assert!(!m.set_scores[0].is_current);
        assert_eq!(
            m.set_scores[2],
            SetScore { set: 3, home: "11".into(), away: "8".into(), is_current: true }
        );
    }

    #[test]
    fn test_scheduled_doubles_card() {
        let x = BadmintonExtractor::new().unwrap();
        let data = extract_html(&x, &page(BWF), Utc::now());

        assert_eq!(data.upcoming.len(), 1);
        let m = &data.upcoming[0];
        assert_eq!(m.match_type, MatchType::Doubles);
        assert_eq!(m.status, BadmintonStatus::Scheduled);
        assert_eq!(m.time_or_stage, "18:30");
        assert_eq!(m.tournament.name, "Asia Championships - Doubles");
        assert_eq!(m.home.players, vec!["Gideon M.", "Sukamuljo K."]);
        assert_eq!(m.away.players, vec!["Chia A."]);
        assert_eq!(m.home.country, "101");
        assert_eq!(m.away.country, "");
        assert_eq!(m.home.score, ZERO_SCORE);
        assert_eq!(m.match_link, NOT_AVAILABLE);
        assert!(m.set_scores.is_empty());
    }

    #[test]
    fn test_finished_is_the_default_bucket() {
        let x = BadmintonExtractor::new().unwrap();
        let data = extract_html(&x, &page(BWF), Utc::now());

        assert_eq!(data.finished.len(), 1);
        let m = &data.finished[0];
        assert_eq!(m.status, BadmintonStatus::Finished);
        assert_eq!(m.time_or_stage, NOT_AVAILABLE);
        assert_eq!(m.home.score, "2");
        assert_eq!(m.tournament.name, "Asia Championships - Doubles");
    }

    #[test]
    fn test_set_scores_from_part_pairs() {
        let x = BadmintonExtractor::new().unwrap();
        let html = page(
            r#"<div class="event__match event__match--live">
                 <div class="event__part">21</div><div class="event__part">19</div>
                 <div class="event__part">15</div><div class="event__part">21</div>
               </div>"#,
        );
        let data = extract_html(&x, &html, Utc::now());

        assert_eq!(data.live.len(), 1);
        let m = &data.live[0];
        assert_eq!(
            m.set_scores,
            vec![
                SetScore { set: 1, home: "21".into(), away: "19".into(), is_current: false },
                SetScore { set: 2, home: "15".into(), away: "21".into(), is_current: false },
            ]
        );
        assert_eq!(m.match_id, NOT_AVAILABLE);
        assert_eq!(m.time_or_stage, LIVE_LABEL);
        assert_eq!(m.tournament.name, UNKNOWN_TOURNAMENT);
        assert_eq!(m.tournament.category, UNKNOWN_CATEGORY);
    }

    #[test]
    fn test_empty_pair_keeps_positional_numbering() {
        let x = BadmintonExtractor::new().unwrap();
        let html = page(
            r#"<div class="event__match">
                 <div class="event__part"></div><div class="event__part"></div>
                 <div class="event__part">21</div><div class="event__part">17</div>
                 <div class="event__part">9</div>
               </div>"#,
        );
        let data = extract_html(&x, &html, Utc::now());
        let sets = &data.finished[0].set_scores;

        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].set, 2);
        assert_eq!(sets[1], SetScore { set: 3, home: "9".into(), away: "".into(), is_current: false });
    }

    #[test]
    fn test_empty_card_is_dropped() {
        let x = BadmintonExtractor::new().unwrap();
        let html = page(
            r#"<div id="g_21_A" class="event__match"><div class="event__participant--home">A</div></div>
               <div class="event__match"></div>
               <div id="g_21_B" class="event__match"><div class="event__participant--home">B</div></div>"#,
        );
        let data = extract_html(&x, &html, Utc::now());

        let ids: Vec<&str> = data.finished.iter().map(|m| m.match_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }
}
