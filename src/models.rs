use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Missing text or link.
pub const NOT_AVAILABLE: &str = "N/A";
/// Missing badminton game score.
pub const ZERO_SCORE: &str = "0";
/// Cricket status when the card carries no status element, and the
/// badminton `timeOrStage` of a live card with no clock.
pub const LIVE_LABEL: &str = "Live";
pub const UNKNOWN_TOURNAMENT: &str = "Unknown Tournament";
pub const UNKNOWN_CATEGORY: &str = "Unknown Category";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Cricket,
    Football,
    Badminton,
    Kabaddi,
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sport::Cricket => "cricket",
            Sport::Football => "football",
            Sport::Badminton => "badminton",
            Sport::Kabaddi => "kabaddi",
        };
        f.write_str(s)
    }
}

/// Bucket vocabulary shared by cricket and football.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchState {
    Live,
    Upcoming,
    Finished,
}

// ── Cricket ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CricketTeam {
    pub name: String,
    /// Innings score, e.g. "187/4 (20)"
    pub score: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CricketMatch {
    pub title: String,
    pub match_number: String,
    /// dd/mm/yyyy, empty when the card has no timestamp
    pub date: String,
    /// h:mm AM|PM, empty when the card has no timestamp
    pub time: String,
    pub venue: String,
    pub teams: Vec<CricketTeam>,
    /// Status line as shown on the page
    pub status: String,
    pub state: MatchState,
    pub match_link: String,
}

// ── Football ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FootballMatch {
    pub home_team: String,
    pub away_team: String,
    pub score: String,
    pub minute: String,
    pub status: MatchState,
    pub match_url: String,
    pub has_live_commentary: bool,
}

// ── Badminton ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadmintonStatus {
    Live,
    Scheduled,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Singles,
    Doubles,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadmintonSide {
    pub players: Vec<String>,
    /// Flashscore flag code (digits of the `fl_N` class), empty when absent
    pub country: String,
    /// Games won
    pub score: String,
    pub is_serving: bool,
}

/// One game of a badminton match. `set` is 1-based and derived from the
/// pair's position on the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetScore {
    pub set: usize,
    pub home: String,
    pub away: String,
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadmintonMatch {
    pub match_id: String,
    pub match_type: MatchType,
    pub status: BadmintonStatus,
    pub time_or_stage: String,
    pub tournament: Tournament,
    pub home: BadmintonSide,
    pub away: BadmintonSide,
    pub set_scores: Vec<SetScore>,
    pub match_link: String,
    pub has_live_betting: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadmintonData {
    pub live: Vec<BadmintonMatch>,
    pub upcoming: Vec<BadmintonMatch>,
    pub finished: Vec<BadmintonMatch>,
    pub scraped_at: DateTime<Utc>,
}

impl BadmintonData {
    pub fn empty(scraped_at: DateTime<Utc>) -> Self {
        BadmintonData {
            live: Vec::new(),
            upcoming: Vec::new(),
            finished: Vec::new(),
            scraped_at,
        }
    }

    pub fn push(&mut self, m: BadmintonMatch) {
        match m.status {
            BadmintonStatus::Live => self.live.push(m),
            BadmintonStatus::Scheduled => self.upcoming.push(m),
            BadmintonStatus::Finished => self.finished.push(m),
        }
    }
}

// ── Kabaddi ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KabaddiState {
    Live,
    Upcoming,
    Recent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KabaddiTeam {
    pub name: String,
    pub score: String,
    pub won: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KabaddiMatch {
    pub match_number: String,
    pub team_a: KabaddiTeam,
    pub team_b: KabaddiTeam,
    /// Status line as shown on the page
    pub status: String,
    pub state: KabaddiState,
    pub venue: String,
    pub match_link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KabaddiData {
    pub live: Vec<KabaddiMatch>,
    pub upcoming: Vec<KabaddiMatch>,
    pub recent: Vec<KabaddiMatch>,
    pub scraped_at: DateTime<Utc>,
}

impl KabaddiData {
    pub fn empty(scraped_at: DateTime<Utc>) -> Self {
        KabaddiData {
            live: Vec::new(),
            upcoming: Vec::new(),
            recent: Vec::new(),
            scraped_at,
        }
    }

    pub fn push(&mut self, m: KabaddiMatch) {
        match m.state {
            KabaddiState::Live => self.live.push(m),
            KabaddiState::Upcoming => self.upcoming.push(m),
            KabaddiState::Recent => self.recent.push(m),
        }
    }
}

// ── Envelope ─────────────────────────────────────────────────────────────────

/// Uniform wrapper returned by every scrape. `data` has the same shape
/// whether or not the scrape succeeded.
#[derive(Debug, Clone, Serialize)]
pub struct ResultEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub data: T,
    pub timestamp: DateTime<Utc>,
}

impl<T> ResultEnvelope<T> {
    pub fn ok(data: T, message: String, timestamp: DateTime<Utc>) -> Self {
        ResultEnvelope {
            success: true,
            message: Some(message),
            error: None,
            data,
            timestamp,
        }
    }

    pub fn failed(error: String, empty: T, timestamp: DateTime<Utc>) -> Self {
        ResultEnvelope {
            success: false,
            message: None,
            error: Some(error),
            data: empty,
            timestamp,
        }
    }
}
