use crate::engine::Fetcher as FetcherT;
use crate::error::{PlacegrabError, Result};
use crate::types::CookieSet;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, USER_AGENT};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/* ===========================
FETCHER (single shot, browser-like)
=========================== */

const REQUEST_TIMEOUT_SECS: u64 = 12;
const REDIRECT_LIMIT: usize = 10;

/// Desktop Chrome; the upstream service serves the embedded-state page
/// variant to this UA.
pub const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// Same client with a caller-chosen timeout. Tests use short timeouts;
    /// production callers stick with [`ReqwestFetcher::new`].
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .redirect(reqwest::redirect::Policy::limited(REDIRECT_LIMIT))
            .timeout(timeout)
            .build()
            .map_err(|e| PlacegrabError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FetcherT for ReqwestFetcher {
    fn name(&self) -> &'static str {
        "reqwest"
    }

    async fn fetch(&self, url: &str, cookies: &CookieSet) -> Result<String> {
        Url::parse(url).map_err(|_| PlacegrabError::InvalidUrl(url.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));
        if !cookies.is_empty() {
            let value = HeaderValue::from_str(&cookies.to_header()).map_err(|e| {
                PlacegrabError::Network {
                    url: url.to_string(),
                    message: format!("cookie header not sendable: {e}"),
                    timed_out: false,
                }
            })?;
            headers.insert(COOKIE, value);
        }

        let response = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| PlacegrabError::network(url, &e))?;

        // Status is not checked; consent walls and error pages still carry
        // HTML the extractor gets to look at.
        response
            .text()
            .await
            .map_err(|e| PlacegrabError::network(url, &e))
    }
}
