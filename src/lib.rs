use chrono::{NaiveDate, NaiveTime, TimeDelta};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

pub mod cleaning;
pub mod dates;
pub mod error;
pub mod extract;
pub mod feed;
pub mod fetch;
pub mod markup;
pub mod portanova;
pub mod render;

pub use error::{Error, Result};
pub use fetch::{Fetcher, Page};

/// Screening times per calendar day.
pub type Showtimes = BTreeMap<NaiveDate, Vec<NaiveTime>>;

/// Age restriction as read from the film details.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Restriction {
    Restricted,
    Unrestricted,
    /// None of the detail fields said either way.
    #[default]
    Unknown,
}

/// A film currently in the programme.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilmRecord {
    pub title: Option<String>,
    pub director: Option<String>,
    pub genre: Option<String>,
    pub duration: Option<String>,
    pub cast: Option<String>,
    pub poster_url: Option<String>,
    pub restricted: Restriction,
    pub showtimes: Showtimes,
}

impl FilmRecord {
    pub fn is_available(&self) -> bool {
        !self.showtimes.is_empty()
    }
}

/// A film announced in the "prossimamente" section.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpcomingFilmRecord {
    /// Text of the title element as found, whitespace included.
    pub title: Option<String>,
    pub poster_url: Option<String>,
    /// `None` when the page gave no day for the release.
    pub release_date: Option<NaiveDate>,
}

pub const VALIDITY_SPAN_DAYS: i64 = 13;

/// Two-week window the listed showtimes apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidityRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl ValidityRange {
    pub fn starting(from: NaiveDate) -> Self {
        Self {
            from,
            to: from + TimeDelta::days(VALIDITY_SPAN_DAYS),
        }
    }

    /// Placeholder used when the page has no usable period label.
    pub fn unset() -> Self {
        Self::starting(Self::sentinel())
    }

    pub fn is_set(&self) -> bool {
        self.from != Self::sentinel()
    }

    fn sentinel() -> NaiveDate {
        NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or_default()
    }
}

impl Default for ValidityRange {
    fn default() -> Self {
        Self::unset()
    }
}

/// Everything one scrape of the listing produced.
///
/// When `error` is set the lists hold whatever was extracted before the
/// failure.
#[derive(Debug, Default, Serialize)]
pub struct ScrapeResult {
    pub available_films: Vec<FilmRecord>,
    pub upcoming_films: Vec<UpcomingFilmRecord>,
    pub validity: ValidityRange,
    #[serde(serialize_with = "error_as_string")]
    pub error: Option<Error>,
}

impl ScrapeResult {
    pub fn failed(error: Error) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn search(&self, query: &str) -> Option<&FilmRecord> {
        search(&self.available_films, query)
    }
}

fn error_as_string<S: Serializer>(
    error: &Option<Error>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match error {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

/// First film whose title contains `query`, ignoring case.
pub fn search<'a>(films: &'a [FilmRecord], query: &str) -> Option<&'a FilmRecord> {
    let query = query.to_lowercase();
    films.iter().find(|film| {
        film.title
            .as_deref()
            .is_some_and(|title| title.to_lowercase().contains(&query))
    })
}

/// Trait that cinema scrapers implement
#[async_trait::async_trait]
pub trait CinemaScraper {
    /// Fetch and extract the whole listing. Failures end up in `ScrapeResult::error`.
    async fn scrape(&self, fetcher: &dyn Fetcher) -> ScrapeResult;

    /// Generate RSS feed name for this scraper (used for filename)
    fn rss_filename(&self) -> String;
}
