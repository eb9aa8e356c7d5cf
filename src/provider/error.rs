use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bad status: {0}")]
    BadStatus(u16),
    #[error("missing data field")]
    MissingData,
}

impl ProviderError {
    /// Whether repeating the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::BadStatus(status) => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Json(_) | Self::MissingData => false,
        }
    }
}
