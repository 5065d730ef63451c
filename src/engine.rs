use crate::error::Result;
use crate::extract::extract;
use crate::types::{CookieSet, ScrapeRequest, ScrapeResult};
use async_trait::async_trait;
use tracing::{info, warn};

/// Network seam. The reqwest implementation lives in `impls`; tests plug in
/// stubs so the assembly logic runs without a socket.
#[async_trait]
pub trait Fetcher: Send + Sync {
    fn name(&self) -> &'static str;

    /// One GET for `url` with the caller's cookies. Single attempt, no
    /// retry anywhere in this crate.
    async fn fetch(&self, url: &str, cookies: &CookieSet) -> Result<String>;
}

/// Composes fetch and extraction into one output record.
pub struct Engine<'a> {
    pub fetcher: &'a dyn Fetcher,
}

impl<'a> Engine<'a> {
    pub fn new(fetcher: &'a dyn Fetcher) -> Self {
        Self { fetcher }
    }

    /// Fetch one listing page and assemble the output record.
    ///
    /// Fetch failures land in the record's `error` field with the business
    /// fields null; extraction is total. This method itself never fails,
    /// so the caller always has a record to emit.
    pub async fn scrape(&self, req: &ScrapeRequest) -> ScrapeResult {
        let html = match self.fetcher.fetch(&req.url, &req.cookies).await {
            Ok(html) => html,
            Err(e) => {
                warn!(url = %req.url, fetcher = self.fetcher.name(), error = %e, "fetch failed");
                return ScrapeResult::from_error(req, e.to_string());
            }
        };

        let fields = extract(&html);
        info!(url = %req.url, found_name = fields.name.is_some(), "scraped listing");
        ScrapeResult::from_fields(req, fields)
    }
}
