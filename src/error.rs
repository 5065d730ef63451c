use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlacegrabError>;

/// Crate error. Parse-tier failures never appear here: the extractor is a
/// total function and degrades to null fields instead of erroring.
#[derive(Debug, Error)]
pub enum PlacegrabError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Usage-tier: the cookies argument was not a JSON object of strings.
    #[error("invalid cookies: {0}")]
    Cookies(String),

    /// Transport-level failure: DNS, TLS, reset, timeout, unreadable body.
    /// `timed_out` keeps the request-timeout case distinguishable.
    #[error("{message}")]
    Network {
        url: String,
        message: String,
        timed_out: bool,
    },

    #[error("failed to build http client: {0}")]
    Client(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PlacegrabError {
    /// Wrap a reqwest transport error, preserving the timeout flag.
    pub fn network(url: impl Into<String>, err: &reqwest::Error) -> Self {
        PlacegrabError::Network {
            url: url.into(),
            message: err.to_string(),
            timed_out: err.is_timeout(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, PlacegrabError::Network { timed_out: true, .. })
    }
}
