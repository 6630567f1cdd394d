pub mod badminton;
pub mod browser;
pub mod cricket;
pub mod dom;
pub mod extractor;
pub mod football;
pub mod kabaddi;
pub mod pipeline;
pub mod source;

pub use badminton::BadmintonExtractor;
pub use browser::{BrowserConfig, ChromeSource, DEFAULT_USER_AGENT};
pub use cricket::CricketExtractor;
pub use football::FootballExtractor;
pub use kabaddi::KabaddiExtractor;
pub use pipeline::{fetch, fetch_or_raise};
pub use source::{HttpSource, PageSource};

use anyhow::Result;

/// One extractor per sport, built once at startup and shared by all
/// requests. Extractors hold only parsed selectors and base URLs.
pub struct Extractors {
    pub cricket: CricketExtractor,
    pub football: FootballExtractor,
    pub badminton: BadmintonExtractor,
    pub kabaddi: KabaddiExtractor,
}

impl Extractors {
    pub fn new() -> Result<Self> {
        Ok(Extractors {
            cricket: CricketExtractor::new()?,
            football: FootballExtractor::new()?,
            badminton: BadmintonExtractor::new()?,
            kabaddi: KabaddiExtractor::new()?,
        })
    }
}
