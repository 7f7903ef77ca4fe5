use crate::dates::MonthTable;
use crate::error::Error;
use crate::extract::ListingExtractor;
use crate::fetch::Fetcher;
use crate::{CinemaScraper, ScrapeResult};
use chrono::NaiveDate;
use scraper::Html;
use tracing::{info, instrument, warn};

pub const LISTING_URL: &str = "https://www.ilregnodelcinema.com/multisalaportanova";
pub const IMAGE_BASE_URL: &str = "https://www.ilregnodelcinema.com";

/// Scraper for Multisala Portanova (Crema), listed on ilregnodelcinema.com.
pub struct PortanovaScraper {
    listing_url: String,
    image_base_url: String,
    months: MonthTable,
}

impl Default for PortanovaScraper {
    fn default() -> Self {
        Self::new(LISTING_URL.to_string(), IMAGE_BASE_URL.to_string())
    }
}

impl PortanovaScraper {
    pub fn new(listing_url: String, image_base_url: String) -> Self {
        Self {
            listing_url,
            image_base_url,
            months: MonthTable::italian(),
        }
    }

    pub fn with_months(mut self, months: MonthTable) -> Self {
        self.months = months;
        self
    }

    pub fn listing_url(&self) -> &str {
        &self.listing_url
    }

    /// Fetch and extract the listing as seen on `today`.
    #[instrument(level = "info", skip(self, fetcher), fields(url = %self.listing_url))]
    pub async fn scrape_on(&self, fetcher: &dyn Fetcher, today: NaiveDate) -> ScrapeResult {
        let page = match fetcher.fetch(&self.listing_url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(error = %e, "listing fetch failed");
                return ScrapeResult::failed(e);
            }
        };

        if !page.is_success() {
            warn!(status = page.status, "listing answered with an error status");
            return ScrapeResult::failed(Error::Status(page.status));
        }

        let result = self.parse_listing(&page.body, today);
        info!(
            available = result.available_films.len(),
            upcoming = result.upcoming_films.len(),
            valid_from = %result.validity.from,
            "scraped listing"
        );
        result
    }

    /// Parse a listing page body. Kept synchronous so the tree never lives
    /// across an await.
    pub fn parse_listing(&self, body: &str, today: NaiveDate) -> ScrapeResult {
        let document = Html::parse_document(body);
        ListingExtractor::new(&self.months, &self.image_base_url, today)
            .extract(&document.root_element())
    }
}

#[async_trait::async_trait]
impl CinemaScraper for PortanovaScraper {
    async fn scrape(&self, fetcher: &dyn Fetcher) -> ScrapeResult {
        let today = chrono::Local::now().date_naive();
        self.scrape_on(fetcher, today).await
    }

    fn rss_filename(&self) -> String {
        "portanova.xml".to_string()
    }
}
