use clap::{Parser, Subcommand};
use portanova_scrape::dates::MonthTable;
use portanova_scrape::fetch::build_client;
use portanova_scrape::portanova::{IMAGE_BASE_URL, LISTING_URL, PortanovaScraper};
use portanova_scrape::{CinemaScraper, ScrapeResult, feed, render};
use portanova_scrape::Error as ScrapeError;
use std::error::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

/// Showtimes and upcoming releases of Multisala Portanova.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Listing page to scrape
    #[arg(long, env = "PORTANOVA_LISTING_URL", default_value = LISTING_URL)]
    listing_url: String,

    /// Base URL poster paths are resolved against
    #[arg(long, env = "PORTANOVA_IMAGE_BASE_URL", default_value = IMAGE_BASE_URL)]
    image_base_url: String,

    /// JSON file mapping month names to numbers (defaults to Italian)
    #[arg(long, env = "PORTANOVA_MONTHS")]
    months: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the current programme, or the first film whose title matches NAME
    Film { name: Vec<String> },
    /// Show films coming soon
    Upcoming,
    /// Write an RSS feed of the current programme
    Feed {
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Print the raw scrape result as JSON
    Dump,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    debug!(?cli, "parsed CLI arguments");

    let mut scraper = PortanovaScraper::new(cli.listing_url.clone(), cli.image_base_url.clone());
    if let Some(path) = &cli.months {
        scraper = scraper.with_months(MonthTable::from_path(path)?);
    }

    let client = build_client()?;
    let result = scraper.scrape(&client).await;

    match cli.command {
        Command::Film { name } => print_films(&result, &name.join(" ")),
        Command::Upcoming => print_upcoming(&result),
        Command::Feed { output } => {
            if let Some(error) = &result.error {
                report_error(error);
                return Ok(());
            }
            let xml = feed::generate_rss(
                &result.available_films,
                "Multisala Portanova",
                scraper.listing_url(),
                "Programmazione della Multisala Portanova di Crema",
            )?;
            let path = output.unwrap_or_else(|| scraper.rss_filename());
            std::fs::write(&path, xml)?;
            info!(%path, films = result.available_films.len(), "feed written");
        }
        Command::Dump => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(())
}

fn report_error(error: &ScrapeError) {
    if error.is_fetch() {
        warn!(%error, "listing could not be fetched");
    } else {
        warn!(%error, "listing could not be parsed");
    }
    println!("{}", render::error_message(error));
}

fn print_films(result: &ScrapeResult, name: &str) {
    if let Some(error) = &result.error {
        report_error(error);
        return;
    }

    let films: Vec<_> = if name.trim().is_empty() {
        result.available_films.iter().collect()
    } else {
        match result.search(name) {
            Some(film) => vec![film],
            None => {
                println!("{}", render::NOT_FOUND);
                return;
            }
        }
    };

    for film in render::unique_by_title(&films, |f| f.title.as_deref()) {
        println!("{}", render::film_caption(film));
        if let Some(poster) = &film.poster_url {
            println!("{poster}");
        }
    }

    println!("\n{}", render::FILMS_DONE);
    if let Some(message) = render::validity_message(&result.validity) {
        println!("{message}");
    }
}

fn print_upcoming(result: &ScrapeResult) {
    if let Some(error) = &result.error {
        report_error(error);
        return;
    }

    if result.upcoming_films.is_empty() {
        println!("{}", render::NO_UPCOMING);
        return;
    }

    for film in render::unique_by_title(&result.upcoming_films, |f| f.title.as_deref()) {
        println!("{}\n", render::upcoming_caption(film));
    }
}
