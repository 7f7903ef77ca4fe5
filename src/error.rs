use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-200 answer from the listing server; displays as the bare code.
    #[error("{0}")]
    Status(u16),

    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    #[error("malformed schedule day label: {0:?}")]
    DayLabel(String),

    #[error("malformed showtime: {0:?}")]
    Showtime(String),

    #[error("invalid calendar date {year}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("month table error: {0}")]
    MonthTable(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("feed error: {0}")]
    Feed(#[from] rss::Error),

    #[error("feed is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    /// True for failures that happened before any markup was parsed.
    pub fn is_fetch(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Status(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
