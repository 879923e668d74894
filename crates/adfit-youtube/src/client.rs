//! HTTP client for the YouTube Data API v3.
//!
//! Wraps `reqwest` with API key management, typed response deserialization,
//! quota-rejection detection, and bounded retry for transient failures. All
//! calls go through [`YoutubeClient::with_base_url`]-style construction so
//! tests can point the client at a wiremock server.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};

use adfit_core::{NormalizedChannel, NormalizedVideo};

use crate::error::YoutubeError;
use crate::normalize::{normalize_channel, normalize_video};
use crate::retry::retry_with_backoff;
use crate::types::{ApiErrorEnvelope, ChannelListResponse, SearchListResponse, VideoListResponse};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// `videos.list`/`channels.list` accept at most 50 ids per request.
const METADATA_BATCH_SIZE: usize = 50;

/// Locale and window filters applied to every search in a fetch cycle.
#[derive(Debug, Clone)]
pub struct SearchFilters {
    /// ISO 639-1 relevance language.
    pub language: String,
    /// ISO 3166-1 alpha-2 region code.
    pub region: String,
    /// Sort order: relevance, date, rating, viewCount, title.
    pub order: String,
    /// Results per keyword, clamped to the API maximum of 50.
    pub max_results: u32,
    pub published_after: Option<DateTime<Utc>>,
    pub published_before: Option<DateTime<Utc>>,
    /// Duration filter (short, medium, long); `None` or "any" means no filter.
    pub video_duration: Option<String>,
    /// Definition filter (standard, high); `None` or "any" means no filter.
    pub video_definition: Option<String>,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            region: "US".to_string(),
            order: "relevance".to_string(),
            max_results: 10,
            published_after: None,
            published_before: None,
            video_duration: None,
            video_definition: None,
        }
    }
}

/// Candidate ids returned by one keyword search, in result order.
#[derive(Debug, Clone, Default)]
pub struct SearchHits {
    pub video_ids: Vec<String>,
    pub channel_ids: Vec<String>,
}

/// Client for the YouTube Data API v3.
pub struct YoutubeClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl YoutubeClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, YoutubeError> {
        Self::with_base_url(api_key, timeout_secs, max_retries, backoff_base_ms, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
        base_url: &str,
    ) -> Result<Self, YoutubeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("adfit/0.1 (campaign-discovery)")
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            max_retries,
            backoff_base_ms,
        })
    }

    /// Searches for embeddable, syndicated videos matching one keyword.
    ///
    /// Returns candidate video and channel ids in result order. Costs one
    /// search call regardless of how many results come back; the caller
    /// records the quota charge.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::QuotaRejected`] if the API rejects for quota reasons.
    /// - [`YoutubeError::Http`] / [`YoutubeError::ApiError`] on network or
    ///   API failure after retries.
    /// - [`YoutubeError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn search(
        &self,
        keyword: &str,
        filters: &SearchFilters,
    ) -> Result<SearchHits, YoutubeError> {
        let url = format!("{}/search", self.base_url);
        let mut params: Vec<(&str, String)> = vec![
            ("key", self.api_key.clone()),
            ("part", "snippet".to_string()),
            ("q", keyword.to_string()),
            ("type", "video".to_string()),
            ("maxResults", filters.max_results.clamp(1, 50).to_string()),
            ("relevanceLanguage", filters.language.clone()),
            ("regionCode", filters.region.clone()),
            ("order", filters.order.clone()),
            ("videoEmbeddable", "true".to_string()),
            ("videoSyndicated", "true".to_string()),
        ];
        if let Some(after) = filters.published_after {
            params.push((
                "publishedAfter",
                after.to_rfc3339_opts(SecondsFormat::Secs, true),
            ));
        }
        if let Some(before) = filters.published_before {
            params.push((
                "publishedBefore",
                before.to_rfc3339_opts(SecondsFormat::Secs, true),
            ));
        }
        if let Some(duration) = filters.video_duration.as_deref() {
            if duration != "any" {
                params.push(("videoDuration", duration.to_string()));
            }
        }
        if let Some(definition) = filters.video_definition.as_deref() {
            if definition != "any" {
                params.push(("videoDefinition", definition.to_string()));
            }
        }

        let body = self.request_json(&url, &params).await?;
        let parsed: SearchListResponse =
            serde_json::from_value(body).map_err(|e| YoutubeError::Deserialize {
                context: format!("search(q={keyword})"),
                source: e,
            })?;

        let mut hits = SearchHits::default();
        for item in parsed.items {
            if item.id.kind != "youtube#video" {
                continue;
            }
            if let Some(video_id) = item.id.video_id {
                hits.video_ids.push(video_id);
            }
            if let Some(channel_id) = item.snippet.and_then(|s| s.channel_id) {
                hits.channel_ids.push(channel_id);
            }
        }
        Ok(hits)
    }

    /// Resolves full metadata for a set of video ids.
    ///
    /// Ids are batched 50 per request (the API maximum); items that cannot be
    /// normalized (no snippet / no channel linkage) are warn-logged and
    /// skipped. The number of batch calls issued is returned alongside the
    /// records so the caller can charge quota per physical call.
    ///
    /// # Errors
    ///
    /// Same error surface as [`YoutubeClient::search`].
    pub async fn list_videos(
        &self,
        ids: &[String],
    ) -> Result<(Vec<NormalizedVideo>, u64), YoutubeError> {
        let url = format!("{}/videos", self.base_url);
        let mut videos = Vec::with_capacity(ids.len());
        let mut batch_calls = 0u64;

        for chunk in ids.chunks(METADATA_BATCH_SIZE) {
            let params: Vec<(&str, String)> = vec![
                ("key", self.api_key.clone()),
                ("part", "snippet,contentDetails,statistics".to_string()),
                ("id", chunk.join(",")),
            ];
            let body = self.request_json(&url, &params).await?;
            batch_calls += 1;

            let parsed: VideoListResponse =
                serde_json::from_value(body).map_err(|e| YoutubeError::Deserialize {
                    context: format!("videos.list({} ids)", chunk.len()),
                    source: e,
                })?;

            for item in &parsed.items {
                match normalize_video(item) {
                    Some(video) => videos.push(video),
                    None => {
                        tracing::warn!(video_id = %item.id, "skipping video item without channel linkage");
                    }
                }
            }
        }

        Ok((videos, batch_calls))
    }

    /// Resolves metadata for a set of channel ids, batched 50 per request.
    ///
    /// # Errors
    ///
    /// Same error surface as [`YoutubeClient::search`].
    pub async fn list_channels(
        &self,
        ids: &[String],
    ) -> Result<(Vec<NormalizedChannel>, u64), YoutubeError> {
        let url = format!("{}/channels", self.base_url);
        let mut channels = Vec::with_capacity(ids.len());
        let mut batch_calls = 0u64;

        for chunk in ids.chunks(METADATA_BATCH_SIZE) {
            let params: Vec<(&str, String)> = vec![
                ("key", self.api_key.clone()),
                ("part", "snippet,statistics".to_string()),
                ("id", chunk.join(",")),
            ];
            let body = self.request_json(&url, &params).await?;
            batch_calls += 1;

            let parsed: ChannelListResponse =
                serde_json::from_value(body).map_err(|e| YoutubeError::Deserialize {
                    context: format!("channels.list({} ids)", chunk.len()),
                    source: e,
                })?;

            for item in &parsed.items {
                match normalize_channel(item) {
                    Some(channel) => channels.push(channel),
                    None => {
                        tracing::warn!(channel_id = %item.id, "skipping channel item without snippet");
                    }
                }
            }
        }

        Ok((channels, batch_calls))
    }

    /// Sends a GET request with retry, returning the parsed JSON body.
    async fn request_json(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<serde_json::Value, YoutubeError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.request_json_once(url, params)
        })
        .await
    }

    /// One GET attempt: asserts a 2xx status, mapping the API's error
    /// envelope to [`YoutubeError::QuotaRejected`] / [`YoutubeError::ApiError`].
    async fn request_json_once(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<serde_json::Value, YoutubeError> {
        let response = self.client.get(url).query(params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(&body) {
                if envelope.is_quota_rejection() {
                    return Err(YoutubeError::QuotaRejected(envelope.error.message));
                }
                return Err(YoutubeError::ApiError {
                    status: status.as_u16(),
                    message: envelope.error.message,
                });
            }
            return Err(YoutubeError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| YoutubeError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}
