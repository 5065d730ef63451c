use crate::error::{PlacegrabError, Result};
use crate::extract::ListingFields;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::form_urlencoded;

const SEARCH_URL_PREFIX: &str = "https://www.google.com/maps/search/";

/// Cookie name to value mapping. Insertion order is irrelevant; values are
/// sent verbatim, so callers must supply already-valid cookie values (no
/// escaping of `;` or `=` happens here).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieSet(pub BTreeMap<String, String>);

impl CookieSet {
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with(mut self, k: &str, v: &str) -> Self {
        self.0.insert(k.to_string(), v.to_string());
        self
    }

    /// Parse the CLI's serialized form: a JSON object literal whose keys and
    /// values are strings. Anything else is a usage error, reported before
    /// any network activity.
    pub fn from_json(raw: &str) -> Result<Self> {
        let map: BTreeMap<String, String> =
            serde_json::from_str(raw).map_err(|e| PlacegrabError::Cookies(e.to_string()))?;
        Ok(Self(map))
    }

    /// Assemble the `Cookie` header value: `name=value` pairs joined with
    /// `"; "`.
    pub fn to_header(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One scrape invocation: the listing page to fetch, the cookies to present,
/// and a free-text query label echoed into the output. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    pub url: String,
    pub cookies: CookieSet,
    pub query: String,
}

impl ScrapeRequest {
    pub fn new(url: impl Into<String>, cookies: CookieSet, query: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            cookies,
            query: query.into(),
        }
    }
}

/// The output record. Field order is part of the output contract; `error`
/// is only present on fetch failure, never on a parse miss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeResult {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub category: Option<String>,
    pub owner: Option<String>,
    pub link: String,
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrapeResult {
    /// Record for a page that was fetched; the fields may still all be null
    /// when the page carried no usable payload.
    pub fn from_fields(req: &ScrapeRequest, fields: ListingFields) -> Self {
        Self {
            name: fields.name,
            address: fields.address,
            phone: fields.phone,
            category: fields.category,
            owner: fields.owner,
            link: req.url.clone(),
            query: req.query.clone(),
            error: None,
        }
    }

    /// Record for a fetch failure: all business fields null, `error` set.
    pub fn from_error(req: &ScrapeRequest, message: impl Into<String>) -> Self {
        Self {
            name: None,
            address: None,
            phone: None,
            category: None,
            owner: None,
            link: req.url.clone(),
            query: req.query.clone(),
            error: Some(message.into()),
        }
    }
}

/// Build a map search URL from a free-text query.
///
/// Spaces become `+` and everything else is percent-encoded, matching how
/// the listing links this crate consumes are produced in the first place.
///
/// # Examples
/// ```
/// use placegrab::types::search_url;
///
/// assert_eq!(
///     search_url("Hotel di Padang"),
///     "https://www.google.com/maps/search/Hotel+di+Padang"
/// );
/// ```
pub fn search_url(query: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("{SEARCH_URL_PREFIX}{encoded}")
}
