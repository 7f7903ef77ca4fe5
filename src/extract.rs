//! Walks a parsed listing page and builds the film records.

use crate::cleaning::{FilmField, clean_field};
use crate::dates::{self, MonthTable};
use crate::error::Result;
use crate::markup::MarkupNode;
use crate::{FilmRecord, ScrapeResult, Showtimes, UpcomingFilmRecord, ValidityRange};
use chrono::NaiveDate;
use tracing::{debug, warn};

const PERIOD_CLASS: &str = "progData";
const FILM_CLASS: &str = "filmContainer";
const DAY_NAME_CLASS: &str = "dayName";
const UPCOMING_CLASS: &str = "longprog_mov";
const UPCOMING_TITLE_CLASS: &str = "longprog_title";
const UPCOMING_DATE_CLASS: &str = "longprog_data";

/// Image paths on the page start with "./".
const IMAGE_PATH_PREFIX_LEN: usize = 2;

pub struct ListingExtractor<'a> {
    months: &'a MonthTable,
    image_base_url: &'a str,
    today: NaiveDate,
}

impl<'a> ListingExtractor<'a> {
    pub fn new(months: &'a MonthTable, image_base_url: &'a str, today: NaiveDate) -> Self {
        Self {
            months,
            image_base_url,
            today,
        }
    }

    /// Extract everything from the page rooted at `root`.
    ///
    /// A malformed block stops the walk; records collected up to that point
    /// are kept and the failure is stored in `error`.
    pub fn extract<N: MarkupNode>(&self, root: &N) -> ScrapeResult {
        let mut result = ScrapeResult::default();
        if let Err(e) = self.fill(root, &mut result) {
            warn!(error = %e, "listing extraction stopped early");
            result.error = Some(e);
        }
        result
    }

    fn fill<N: MarkupNode>(&self, root: &N, result: &mut ScrapeResult) -> Result<()> {
        result.validity = self.validity(root)?;

        for container in root.find_all("div", Some(FILM_CLASS))? {
            let film = self.film(&container)?;
            if film.is_available() {
                result.available_films.push(film);
            } else {
                debug!(title = ?film.title, "skipping film without showtimes");
            }
        }

        for container in root.find_all("div", Some(UPCOMING_CLASS))? {
            result.upcoming_films.push(self.upcoming(&container)?);
        }

        Ok(())
    }

    pub fn validity<N: MarkupNode>(&self, root: &N) -> Result<ValidityRange> {
        let Some(marker) = root.find_first("div", Some(PERIOD_CLASS))? else {
            return Ok(ValidityRange::unset());
        };

        let text = marker.text();
        let resolved = dates::resolve_day_month(&text, self.months, self.today);
        if !resolved.is_resolved() {
            debug!(%text, "period label has no usable date");
            return Ok(ValidityRange::unset());
        }

        let year = dates::validity_year(resolved.month, self.today);
        let from = dates::ymd(year, resolved.month, resolved.day)?;
        Ok(ValidityRange::starting(from))
    }

    pub fn film<N: MarkupNode>(&self, container: &N) -> Result<FilmRecord> {
        let mut film = FilmRecord {
            poster_url: self.poster(container)?,
            ..FilmRecord::default()
        };

        for field in FilmField::ALL {
            let Some(block) = container.find_first("div", Some(field.class()))? else {
                continue;
            };
            let cleaned = clean_field(field, &block.text());
            if let Some(restriction) = cleaned.restriction {
                film.restricted = restriction;
            }
            let slot = match field {
                FilmField::Title => &mut film.title,
                FilmField::Director => &mut film.director,
                FilmField::Genre => &mut film.genre,
                FilmField::Duration => &mut film.duration,
                FilmField::Cast => &mut film.cast,
            };
            *slot = Some(cleaned.text);
        }

        film.showtimes = self.showtimes(container)?;
        Ok(film)
    }

    /// One entry per `li` schedule row; a later row for the same day replaces
    /// the earlier one.
    pub fn showtimes<N: MarkupNode>(&self, container: &N) -> Result<Showtimes> {
        let mut showtimes = Showtimes::new();

        for row in container.find_all("li", None)? {
            let Some(day_label) = row.find_first("div", Some(DAY_NAME_CLASS))? else {
                continue;
            };
            let hours = row.find_all("span", None)?;
            if hours.is_empty() {
                continue;
            }

            let (day, month) = dates::parse_numeric_day_month(&day_label.text())?;
            let year = dates::showtime_year(month, self.today);
            let date = dates::ymd(year, month, day)?;
            let times = hours
                .iter()
                .map(|hour| dates::parse_showtime(&hour.text()))
                .collect::<Result<Vec<_>>>()?;

            if showtimes.insert(date, times).is_some() {
                debug!(%date, "schedule row replaces an earlier one for the same day");
            }
        }

        Ok(showtimes)
    }

    pub fn upcoming<N: MarkupNode>(&self, container: &N) -> Result<UpcomingFilmRecord> {
        let mut film = UpcomingFilmRecord {
            poster_url: self.poster(container)?,
            ..UpcomingFilmRecord::default()
        };

        if let Some(title) = container.find_first("div", Some(UPCOMING_TITLE_CLASS))? {
            film.title = Some(title.text());
        }

        if let Some(release) = container.find_first("div", Some(UPCOMING_DATE_CLASS))? {
            let resolved = dates::resolve_day_month(&release.text(), self.months, self.today);
            if resolved.is_resolved() {
                let year = dates::release_year(resolved.month, self.today);
                film.release_date = Some(dates::ymd(year, resolved.month, resolved.day)?);
            }
        }

        Ok(film)
    }

    fn poster<N: MarkupNode>(&self, container: &N) -> Result<Option<String>> {
        let src = container
            .find_first("img", None)?
            .and_then(|img| img.attr("src"));
        Ok(src.map(|src| poster_url(self.image_base_url, &src)))
    }
}

/// Join the site base with an image path, dropping its leading "./".
///
/// Exactly one "/" separates the two, so "../img/x.jpg" works as well.
pub fn poster_url(base: &str, relative: &str) -> String {
    let path: String = relative.chars().skip(IMAGE_PATH_PREFIX_LEN).collect();
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    format!("{base}/{path}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Restriction;
    use chrono::NaiveTime;
    use scraper::Html;

    const BASE: &str = "https://example.com";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn extract(html: &str) -> ScrapeResult {
        let months = MonthTable::italian();
        let doc = Html::parse_document(html);
        ListingExtractor::new(&months, BASE, today()).extract(&doc.root_element())
    }

    #[test]
    fn poster_url_drops_relative_prefix() {
        assert_eq!(
            poster_url("https://example.com", "./img/poster.jpg"),
            "https://example.com/img/poster.jpg"
        );
        assert_eq!(poster_url(BASE, "."), BASE);
    }

    #[test]
    fn poster_url_joins_with_a_single_slash() {
        assert_eq!(
            poster_url("https://example.com/", "../img/x.jpg"),
            "https://example.com/img/x.jpg"
        );
        assert_eq!(
            poster_url("https://example.com/", "./img/x.jpg"),
            "https://example.com/img/x.jpg"
        );
    }

    #[test]
    fn page_without_period_label_keeps_sentinel() {
        let result = extract("<html><body><p>vuoto</p></body></html>");
        assert!(result.is_ok());
        assert!(!result.validity.is_set());
        assert_eq!((result.validity.to - result.validity.from).num_days(), 13);
    }

    #[test]
    fn period_label_without_day_keeps_sentinel() {
        let result = extract(r#"<div class="progData">Programmazione settimanale</div>"#);
        assert!(!result.validity.is_set());
    }

    #[test]
    fn period_label_anchors_validity() {
        let result = extract(r#"<div class="progData">Programmazione dal 14 ottobre</div>"#);
        assert_eq!(result.validity.from, date(2026, 10, 14));
        assert_eq!(result.validity.to, date(2026, 10, 27));
    }

    #[test]
    fn period_label_in_january_rolls_to_next_year() {
        let result = extract(r#"<div class="progData">dal 7 gennaio</div>"#);
        assert_eq!(result.validity.from, date(2027, 1, 7));
    }

    #[test]
    fn builds_showtimes_per_day() {
        let result = extract(
            r#"<div class="filmContainer">
                <div class="titolo">Titolo: Dune</div>
                <ul>
                  <li><div class="dayName">Sabato 17/10</div><span>18:30</span><span>21:15</span></li>
                  <li><div class="dayName">Venerdì 08/01</div><span>20:00</span></li>
                </ul>
            </div>"#,
        );
        let film = &result.available_films[0];
        assert_eq!(film.title.as_deref(), Some("Dune"));
        assert_eq!(
            film.showtimes.get(&date(2026, 10, 17)),
            Some(&vec![time(18, 30), time(21, 15)])
        );
        assert_eq!(film.showtimes.get(&date(2027, 1, 8)), Some(&vec![time(20, 0)]));
    }

    #[test]
    fn duplicate_schedule_day_keeps_last_row() {
        let result = extract(
            r#"<div class="filmContainer"><ul>
                <li><div class="dayName">Sabato 17/10</div><span>15:00</span></li>
                <li><div class="dayName">Sabato 17/10</div><span>22:30</span></li>
            </ul></div>"#,
        );
        let showtimes = &result.available_films[0].showtimes;
        assert_eq!(showtimes.len(), 1);
        assert_eq!(showtimes[&date(2026, 10, 17)], vec![time(22, 30)]);
    }

    #[test]
    fn rows_without_label_or_times_are_skipped() {
        let result = extract(
            r#"<div class="filmContainer"><div class="titolo">Titolo: Vuoto</div><ul>
                <li><span>15:00</span></li>
                <li><div class="dayName">Sabato 17/10</div></li>
            </ul></div>"#,
        );
        assert!(result.is_ok());
        assert!(result.available_films.is_empty());
        assert!(result.upcoming_films.is_empty());
    }

    #[test]
    fn restriction_follows_the_last_informative_field() {
        let result = extract(
            r#"<div class="filmContainer">
                <div class="titolo">Joker</div>
                <div class="durata">122 min - V.M.14</div>
                <ul><li><div class="dayName">Sabato 17/10</div><span>21:00</span></li></ul>
            </div>
            <div class="filmContainer">
                <div class="titolo">NEW! Wicked</div>
                <div class="regia">Regia: Jon M. Chu</div>
                <ul><li><div class="dayName">Sabato 17/10</div><span>16:00</span></li></ul>
            </div>
            <div class="filmContainer">
                <div class="titolo">Paddington</div>
                <div class="durata">Durata: 106 min</div>
                <ul><li><div class="dayName">Sabato 17/10</div><span>15:00</span></li></ul>
            </div>"#,
        );
        let films = &result.available_films;
        assert_eq!(films[0].restricted, Restriction::Restricted);
        assert_eq!(films[0].duration.as_deref(), Some("122 min"));
        assert_eq!(films[1].restricted, Restriction::Unknown);
        assert_eq!(films[1].director.as_deref(), Some("Jon M. Chu"));
        // the plain title says unrestricted, the labelled duration leaves it alone
        assert_eq!(films[2].restricted, Restriction::Unrestricted);
        assert_eq!(films[2].duration.as_deref(), Some("106 min"));
    }

    #[test]
    fn upcoming_release_dates_are_inferred() {
        let result = extract(
            r#"<div class="longprog_mov"><img src="./img/up/avatar.jpg">
                <div class="longprog_title">Avatar: Fuoco e cenere</div>
                <div class="longprog_data">dal 3 gennaio</div></div>
               <div class="longprog_mov">
                <div class="longprog_title">Sorpresa</div>
                <div class="longprog_data">prossimamente</div></div>"#,
        );
        let upcoming = &result.upcoming_films;
        assert_eq!(upcoming.len(), 2);
        assert_eq!(upcoming[0].title.as_deref(), Some("Avatar: Fuoco e cenere"));
        assert_eq!(
            upcoming[0].poster_url.as_deref(),
            Some("https://example.com/img/up/avatar.jpg")
        );
        assert_eq!(upcoming[0].release_date, Some(date(2027, 1, 3)));
        assert_eq!(upcoming[1].release_date, None);
        assert_eq!(upcoming[1].poster_url, None);
    }

    #[test]
    fn upcoming_title_is_kept_verbatim() {
        let result = extract(
            r#"<div class="longprog_mov"><div class="longprog_title"> Wicked  For Good </div></div>"#,
        );
        assert_eq!(
            result.upcoming_films[0].title.as_deref(),
            Some(" Wicked  For Good ")
        );
    }

    #[test]
    fn malformed_row_keeps_earlier_films() {
        let result = extract(
            r#"<div class="filmContainer"><div class="titolo">Titolo: Primo</div><ul>
                <li><div class="dayName">Sabato 17/10</div><span>18:00</span></li></ul></div>
               <div class="filmContainer"><div class="titolo">Titolo: Secondo</div><ul>
                <li><div class="dayName">Sabato</div><span>18:00</span></li></ul></div>
               <div class="longprog_mov"><div class="longprog_title">Mai letto</div></div>"#,
        );
        assert!(matches!(result.error, Some(crate::Error::DayLabel(_))));
        assert_eq!(result.available_films.len(), 1);
        assert_eq!(result.available_films[0].title.as_deref(), Some("Primo"));
        assert!(result.upcoming_films.is_empty());
    }

    #[test]
    fn impossible_date_is_an_error() {
        let result = extract(
            r#"<div class="filmContainer"><ul>
                <li><div class="dayName">Lunedì 31/11</div><span>18:00</span></li></ul></div>"#,
        );
        assert!(matches!(result.error, Some(crate::Error::InvalidDate { .. })));
    }
}
