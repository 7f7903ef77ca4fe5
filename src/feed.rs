use crate::error::Result;
use crate::render::{day_label, format_times};
use crate::{FilmRecord, Restriction};
use chrono::{Local, NaiveDateTime};
use rss::{ChannelBuilder, ItemBuilder};

fn title_slug(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>()
}

/// First screening, as an RFC 2822 date in local time.
fn first_screening(film: &FilmRecord) -> Option<String> {
    let (date, times) = film.showtimes.iter().next()?;
    let time = times.first()?;
    NaiveDateTime::new(*date, *time)
        .and_local_timezone(Local)
        .earliest()
        .map(|dt| dt.to_rfc2822())
}

/// Generate RSS feed from a list of films
pub fn generate_rss(
    films: &[FilmRecord],
    channel_title: &str,
    channel_link: &str,
    channel_description: &str,
) -> Result<String> {
    let mut items = Vec::new();

    for film in films {
        let title = film.title.clone().unwrap_or_default();

        // Build description from available fields
        let mut description_parts = Vec::new();

        for (label, value) in [
            ("Regia", &film.director),
            ("Genere", &film.genre),
            ("Durata", &film.duration),
            ("Cast", &film.cast),
        ] {
            if let Some(value) = value {
                description_parts.push(format!("{}: {}", label, value));
            }
        }

        if film.restricted == Restriction::Restricted {
            description_parts.push("Vietato ai minori di 14 anni".to_string());
        }

        for (date, times) in &film.showtimes {
            description_parts.push(format!("{}: {}", day_label(*date), format_times(times)));
        }

        if let Some(ref poster) = film.poster_url {
            description_parts.push(format!("<img src=\"{}\" alt=\"Poster\" />", poster));
        }

        let description = if description_parts.is_empty() {
            format!("Film: {}", title)
        } else {
            description_parts.join("<br/>\n")
        };

        let guid = rss::Guid {
            value: format!("{}#{}", channel_link, title_slug(&title)),
            permalink: false,
        };

        let mut item_builder = ItemBuilder::default();
        item_builder.title(title);
        item_builder.link(channel_link.to_string());
        item_builder.description(description);
        item_builder.guid(guid);
        if let Some(date) = first_screening(film) {
            item_builder.pub_date(date);
        }

        items.push(item_builder.build());
    }

    let channel = ChannelBuilder::default()
        .title(channel_title)
        .link(channel_link)
        .description(channel_description)
        .items(items)
        .build();

    let mut buf = Vec::new();
    channel.write_to(&mut buf)?;
    Ok(String::from_utf8(buf)?)
}
