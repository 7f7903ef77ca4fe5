//! Italian display text for films, in the markdown flavour chat clients accept
//! (`*bold*`).

use crate::{FilmRecord, UpcomingFilmRecord, ValidityRange};
use chrono::{Datelike, NaiveDate, NaiveTime};
use std::collections::HashSet;

static IT_WEEKDAY: [&str; 7] = [
    "Lunedì",
    "Martedì",
    "Mercoledì",
    "Giovedì",
    "Venerdì",
    "Sabato",
    "Domenica",
];

static IT_MONTH: [&str; 12] = [
    "Gennaio", "Febbraio", "Marzo", "Aprile", "Maggio", "Giugno", "Luglio", "Agosto",
    "Settembre", "Ottobre", "Novembre", "Dicembre",
];

pub const ERROR_PREFIX: &str = "Ops... penso che ci sia stato un errore 😱.\nEcco ciò che so:";
pub const NOT_FOUND: &str =
    "Credo di non aver trovato il film da te richiesto 🤯... prova con qualcos'altro.";
pub const NO_UPCOMING: &str = "Al momento non sono presenti film in uscita sul portale.";
pub const FILMS_DONE: &str = "Ecco a te i film!";

pub fn weekday_name(date: NaiveDate) -> &'static str {
    IT_WEEKDAY[date.weekday().num_days_from_monday() as usize]
}

pub fn month_name(date: NaiveDate) -> &'static str {
    IT_MONTH[date.month0() as usize]
}

/// "5 Ottobre 2026"
pub fn long_date(date: NaiveDate) -> String {
    format!("{} {} {}", date.day(), month_name(date), date.year())
}

/// "Sabato 17/10"
pub fn day_label(date: NaiveDate) -> String {
    format!("{} {:02}/{:02}", weekday_name(date), date.day(), date.month())
}

pub fn format_times(times: &[NaiveTime]) -> String {
    times
        .iter()
        .map(|t| t.format("%H:%M").to_string())
        .collect::<Vec<_>>()
        .join(" - ")
}

pub fn film_caption(film: &FilmRecord) -> String {
    let mut caption = format!("\n*{}*\n", film.title.as_deref().unwrap_or_default());

    let details = [
        ("Regia", &film.director),
        ("Genere", &film.genre),
        ("Durata", &film.duration),
        ("Cast", &film.cast),
    ];
    for (label, value) in details {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            caption.push_str(&format!("\n*{label}*: {value}"));
        }
    }

    if !film.showtimes.is_empty() {
        caption.push('\n');
        for (date, times) in &film.showtimes {
            caption.push_str(&format!("\n*{} -> * {}", day_label(*date), format_times(times)));
        }
    }

    caption
}

pub fn upcoming_caption(film: &UpcomingFilmRecord) -> String {
    let mut caption = format!("*{}*", film.title.as_deref().unwrap_or_default());
    if let Some(date) = film.release_date {
        caption.push_str(&format!("\n\n*Data di uscita:* {}", long_date(date)));
    }
    caption
}

/// `None` when the page gave no period to anchor the window on.
pub fn validity_message(validity: &ValidityRange) -> Option<String> {
    if !validity.is_set() {
        return None;
    }
    Some(format!(
        "Gli orari che ti ho appena inviato sono validi dal *{}* al *{}*",
        long_date(validity.from),
        long_date(validity.to)
    ))
}

pub fn error_message(error: &crate::Error) -> String {
    format!("{ERROR_PREFIX} {error}")
}

/// Keep the first item for each title, in order.
pub fn unique_by_title<'a, T>(items: &'a [T], title: impl Fn(&T) -> Option<&str>) -> Vec<&'a T> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert(title(*item).map(str::to_string)))
        .collect()
}
