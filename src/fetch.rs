use crate::error::Result;
use reqwest::{Client, StatusCode, header};
use tracing::{debug, instrument};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36";

/// A fetched page. `body` is left empty for non-200 answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub status: u16,
    pub body: String,
}

impl Page {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == StatusCode::OK.as_u16()
    }
}

/// Source of listing pages.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Page>;
}

/// Client with a cookie store, like a browser session.
pub fn build_client() -> Result<Client> {
    Ok(Client::builder().cookie_store(true).build()?)
}

#[async_trait::async_trait]
impl Fetcher for Client {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<Page> {
        let resp = self
            .get(url)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            debug!(%status, "listing request was not successful");
            return Ok(Page {
                status: status.as_u16(),
                body: String::new(),
            });
        }

        let body = resp.text().await?;
        debug!(bytes = body.len(), "fetched listing page");
        Ok(Page {
            status: status.as_u16(),
            body,
        })
    }
}
