use std::time::Duration;
use thiserror::Error;

/// Why a page could not be loaded far enough to extract from.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("readiness selector `{selector}` not found within {timeout:?}: {reason}")]
    SelectorTimeout {
        selector: String,
        timeout: Duration,
        reason: String,
    },

    #[error("failed to read page content: {0}")]
    Content(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("page load task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

/// A single match card that could not be turned into a record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("card names no participants")]
    NoParticipants,

    #[error("card carries no match id, players or set scores")]
    EmptyCard,
}
