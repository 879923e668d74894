//! Best-effort transcript retrieval.
//!
//! Transcripts only enrich scoring — their absence degrades quality, never
//! availability. [`TranscriptClient::acquire`] therefore always succeeds at
//! the interface level: a disabled provider, a rate-limited call, missing
//! captions, or a malformed response all come back as
//! [`Transcript::Unavailable`] with a warning in the log.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Outcome of a transcript lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcript {
    Available {
        text: String,
        /// Language code of the transcript that was found (e.g. `en`).
        language: Option<String>,
    },
    Unavailable,
}

impl Transcript {
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Transcript::Available { text, .. } => Some(text),
            Transcript::Unavailable => None,
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Transcript::Available { .. })
    }
}

/// Internal errors; never surfaced through [`TranscriptClient::acquire`].
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("transcript provider returned status {0}")]
    UnexpectedStatus(u16),
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    #[serde(default)]
    text: String,
    #[serde(default)]
    language: Option<String>,
}

/// Client for the transcript extraction provider.
///
/// Constructed disabled when no provider URL is configured; a disabled
/// client answers every lookup with [`Transcript::Unavailable`] without
/// touching the network.
pub struct TranscriptClient {
    inner: Option<Inner>,
}

struct Inner {
    client: reqwest::Client,
    base_url: String,
}

impl TranscriptClient {
    /// Creates a client for the provider at `base_url`, or a disabled client
    /// when `base_url` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`TranscriptError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(base_url: Option<&str>, timeout_secs: u64) -> Result<Self, TranscriptError> {
        let inner = match base_url {
            Some(url) => {
                let client = reqwest::Client::builder()
                    .timeout(Duration::from_secs(timeout_secs))
                    .connect_timeout(Duration::from_secs(10))
                    .user_agent("adfit/0.1 (campaign-discovery)")
                    .build()?;
                Some(Inner {
                    client,
                    base_url: url.trim_end_matches('/').to_owned(),
                })
            }
            None => None,
        };
        Ok(Self { inner })
    }

    /// A client that never performs lookups.
    #[must_use]
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Fetches the transcript for a video, preferring `languages` in order.
    ///
    /// Never fails: provider errors are logged and mapped to
    /// [`Transcript::Unavailable`]. An empty transcript body also counts as
    /// unavailable — there is nothing to score.
    pub async fn acquire(&self, video_id: &str, languages: &[String]) -> Transcript {
        let Some(inner) = &self.inner else {
            return Transcript::Unavailable;
        };

        match fetch(inner, video_id, languages).await {
            Ok(Some(transcript)) => transcript,
            Ok(None) => {
                tracing::debug!(video_id, "no transcript available");
                Transcript::Unavailable
            }
            Err(e) => {
                tracing::warn!(video_id, error = %e, "transcript fetch failed");
                Transcript::Unavailable
            }
        }
    }
}

async fn fetch(
    inner: &Inner,
    video_id: &str,
    languages: &[String],
) -> Result<Option<Transcript>, TranscriptError> {
    let url = format!("{}/transcripts/{video_id}", inner.base_url);
    let mut request = inner.client.get(&url);
    if !languages.is_empty() {
        request = request.query(&[("languages", languages.join(","))]);
    }

    let response = request.send().await?;
    let status = response.status();

    // 404 is the provider's "no captions for this video".
    if status.as_u16() == 404 {
        return Ok(None);
    }
    if !status.is_success() {
        return Err(TranscriptError::UnexpectedStatus(status.as_u16()));
    }

    let parsed: TranscriptResponse = response.json().await?;
    if parsed.text.trim().is_empty() {
        return Ok(None);
    }

    Ok(Some(Transcript::Available {
        text: parsed.text,
        language: parsed.language,
    }))
}

/// Transcript language preference order for a campaign.
///
/// The campaign's primary language comes first, then its regional variant,
/// then the English fallbacks, deduplicated while preserving order.
#[must_use]
pub fn preferred_languages(primary_language: Option<&str>) -> Vec<String> {
    let mut ordered: Vec<String> = Vec::new();
    if let Some(primary) = primary_language {
        let lower = primary.to_lowercase();
        ordered.push(lower.clone());
        ordered.push(format!("{lower}-{}", primary.to_uppercase()));
    }
    ordered.push("en".to_string());
    ordered.push("en-US".to_string());

    let mut seen = std::collections::HashSet::new();
    ordered.retain(|lang| seen.insert(lang.clone()));
    ordered
}
