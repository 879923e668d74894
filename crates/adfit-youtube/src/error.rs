use thiserror::Error;

/// Errors returned by the YouTube Data API client.
#[derive(Debug, Error)]
pub enum YoutubeError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API rejected the call for quota reasons (403 / `quotaExceeded`).
    /// Never retried — burning more requests cannot help.
    #[error("YouTube API quota rejected: {0}")]
    QuotaRejected(String),

    /// Any other API-level error response.
    #[error("YouTube API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
