//! YouTube Data API v3 response types.
//!
//! Only the fields the pipeline consumes are modeled; everything else in the
//! API payloads is ignored. Statistics counts arrive as JSON strings and are
//! parsed during normalization.

use serde::Deserialize;

// ---------------------------------------------------------------------------
// search.list
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
pub struct SearchItem {
    pub id: SearchItemId,
    #[serde(default)]
    pub snippet: Option<SearchSnippet>,
}

/// Search results can reference videos, channels, or playlists; `kind`
/// disambiguates and the matching id field is populated.
#[derive(Debug, Deserialize)]
pub struct SearchItemId {
    pub kind: String,
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
    #[serde(rename = "channelId")]
    pub channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    pub channel_id: Option<String>,
}

// ---------------------------------------------------------------------------
// videos.list
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<VideoSnippet>,
    #[serde(default)]
    pub content_details: Option<ContentDetails>,
    #[serde(default)]
    pub statistics: Option<VideoStatistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub channel_id: Option<String>,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub channel_title: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub category_id: Option<String>,
    pub published_at: Option<String>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
pub struct Thumbnails {
    pub high: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDetails {
    pub duration: Option<String>,
}

/// Counts are decimal strings in the API payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    pub comment_count: Option<String>,
}

// ---------------------------------------------------------------------------
// channels.list
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ChannelListResponse {
    #[serde(default)]
    pub items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
pub struct ChannelItem {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<ChannelSnippet>,
    #[serde(default)]
    pub statistics: Option<ChannelStatistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSnippet {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub country: Option<String>,
    pub published_at: Option<String>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatistics {
    pub view_count: Option<String>,
    pub subscriber_count: Option<String>,
    /// Channels may hide their subscriber count; the count field is then
    /// absent or meaningless.
    #[serde(default)]
    pub hidden_subscriber_count: bool,
    pub video_count: Option<String>,
}

// ---------------------------------------------------------------------------
// Error envelope
// ---------------------------------------------------------------------------

/// Error payload returned with non-2xx responses:
/// `{"error": {"code": 403, "message": "...", "errors": [{"reason": "quotaExceeded"}]}}`.
#[derive(Debug, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ApiErrorItem>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorItem {
    pub reason: Option<String>,
}

impl ApiErrorEnvelope {
    /// `true` when any error item carries a quota-related reason.
    #[must_use]
    pub fn is_quota_rejection(&self) -> bool {
        self.error.errors.iter().any(|e| {
            e.reason
                .as_deref()
                .is_some_and(|r| r == "quotaExceeded" || r == "dailyLimitExceeded" || r == "rateLimitExceeded")
        })
    }
}
