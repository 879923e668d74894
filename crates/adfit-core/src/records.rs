//! Normalized discovery records.
//!
//! The YouTube client normalizes raw API items into these shapes; the store
//! upserts them. Counts are already parsed out of the API's string fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedVideo {
    pub video_id: String,
    pub channel_id: String,
    pub title: String,
    pub description: Option<String>,
    pub channel_title: Option<String>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    /// ISO-8601 duration as returned by the API (e.g. `PT4M13S`).
    pub duration: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    /// Denormalized channel metrics captured at fetch time.
    pub channel_subscriber_count: Option<i64>,
    pub channel_view_count: Option<i64>,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedChannel {
    pub channel_id: String,
    pub title: String,
    pub description: Option<String>,
    pub country: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub thumbnail_url: Option<String>,
    /// `None` when the channel hides its subscriber count.
    pub subscriber_count: Option<i64>,
    pub view_count: Option<i64>,
    pub video_count: Option<i64>,
}
