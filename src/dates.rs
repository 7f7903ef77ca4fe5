//! Day/month resolution for the loosely formatted Italian dates found on the
//! listing page ("dal 5 ottobre", "Sabato 16/09", "21:15").

use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDate, NaiveTime};
use std::collections::HashMap;
use std::path::Path;

const ITALIAN_MONTHS: [(&str, u32); 12] = [
    ("gennaio", 1),
    ("febbraio", 2),
    ("marzo", 3),
    ("aprile", 4),
    ("maggio", 5),
    ("giugno", 6),
    ("luglio", 7),
    ("agosto", 8),
    ("settembre", 9),
    ("ottobre", 10),
    ("novembre", 11),
    ("dicembre", 12),
];

/// Lowercase month name -> month number (1-12).
#[derive(Debug, Clone)]
pub struct MonthTable {
    names: HashMap<String, u32>,
}

impl Default for MonthTable {
    fn default() -> Self {
        Self::italian()
    }
}

impl MonthTable {
    pub fn italian() -> Self {
        let names = ITALIAN_MONTHS
            .iter()
            .map(|(name, number)| (name.to_string(), *number))
            .collect();
        Self { names }
    }

    /// Load a table from a JSON object such as `{"gennaio": 1, "febbraio": 2}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, u32> = serde_json::from_str(json)?;
        let mut names = HashMap::with_capacity(raw.len());
        for (name, number) in raw {
            if !(1..=12).contains(&number) {
                return Err(Error::MonthTable(format!(
                    "month {name:?} maps to {number}, expected 1-12"
                )));
            }
            names.insert(name.to_lowercase(), number);
        }
        if names.is_empty() {
            return Err(Error::MonthTable("no month names defined".to_string()));
        }
        Ok(Self { names })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Whole-word, case-insensitive lookup.
    pub fn lookup(&self, word: &str) -> Option<u32> {
        self.names.get(&word.to_lowercase()).copied()
    }
}

/// A `(day, month)` pair; `(0, 0)` means no day was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayMonth {
    pub day: u32,
    pub month: u32,
}

impl DayMonth {
    pub const UNRESOLVED: DayMonth = DayMonth { day: 0, month: 0 };

    pub fn is_resolved(&self) -> bool {
        self.day != 0 && self.month != 0
    }
}

/// Pull a day and (optionally) a month name out of free text.
///
/// The first all-digit token is the day (unresolved if it does not fit a
/// `u32`) and the first token found in `months` is the month. When the month is missing it is assumed to be the current
/// one, or the next one if that day of the month has already come.
pub fn resolve_day_month(text: &str, months: &MonthTable, today: NaiveDate) -> DayMonth {
    let mut day = 0;
    let mut day_seen = false;
    let mut month = 0;

    for word in text.split_whitespace() {
        if !day_seen && word.chars().all(|c| c.is_ascii_digit()) {
            // An unparsable first number leaves the text unresolved.
            day_seen = true;
            day = word.parse::<u32>().unwrap_or(0);
        }
        if month == 0
            && let Some(m) = months.lookup(word)
        {
            month = m;
        }
    }

    if day == 0 {
        return DayMonth::UNRESOLVED;
    }

    if month == 0 {
        month = today.month();
        if day <= today.day() {
            month = month % 12 + 1;
        }
    }

    DayMonth { day, month }
}

/// Parse a schedule row label like `"Sabato 16/09"` into `(16, 9)`.
pub fn parse_numeric_day_month(label: &str) -> Result<(u32, u32)> {
    let malformed = || Error::DayLabel(label.to_string());
    let fragment = label.split_whitespace().nth(1).ok_or_else(malformed)?;
    let (day, month) = fragment.split_once('/').ok_or_else(malformed)?;
    let day = day.trim().parse::<u32>().map_err(|_| malformed())?;
    let month = month.trim().parse::<u32>().map_err(|_| malformed())?;
    Ok((day, month))
}

/// Parse an `"HH:MM"` token.
pub fn parse_showtime(token: &str) -> Result<NaiveTime> {
    let malformed = || Error::Showtime(token.to_string());
    let (hour, minute) = token.trim().split_once(':').ok_or_else(malformed)?;
    let hour = hour.trim().parse::<u32>().map_err(|_| malformed())?;
    let minute = minute.trim().parse::<u32>().map_err(|_| malformed())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(malformed)
}

pub fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(Error::InvalidDate { year, month, day })
}

// The three helpers below decide the same thing with different comparators;
// each one mirrors the page section it is used for.

/// Year for a schedule row date.
pub fn showtime_year(month: u32, today: NaiveDate) -> i32 {
    if today.month() <= month {
        today.year()
    } else {
        today.year() + 1
    }
}

/// Year for an upcoming release date.
pub fn release_year(month: u32, today: NaiveDate) -> i32 {
    if month >= today.month() {
        today.year()
    } else {
        today.year() + 1
    }
}

/// Year for the "current period" anchor of the validity window.
pub fn validity_year(month: u32, today: NaiveDate) -> i32 {
    if month < today.month() {
        today.year() + 1
    } else {
        today.year()
    }
}
