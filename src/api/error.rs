use thiserror::Error;

/// Every failure of a backend call. Non-2xx statuses are one class; the code is kept for the log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{endpoint} request failed: HTTP {status}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
