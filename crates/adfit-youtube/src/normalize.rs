//! Conversion from raw API items to normalized discovery records.

use chrono::{DateTime, Utc};

use adfit_core::{NormalizedChannel, NormalizedVideo};

use crate::types::{ChannelItem, Thumbnails, VideoItem};

/// Convert a `videos.list` item into a [`NormalizedVideo`].
///
/// Returns `None` when the item has no snippet or no channel id — such items
/// cannot be linked to a channel and are skipped (and logged by the caller).
/// Denormalized channel metrics start as `None`; the discovery layer fills
/// them in after resolving channels.
#[must_use]
pub fn normalize_video(item: &VideoItem) -> Option<NormalizedVideo> {
    let snippet = item.snippet.as_ref()?;
    let channel_id = snippet.channel_id.clone()?;

    let stats = item.statistics.as_ref();
    Some(NormalizedVideo {
        video_id: item.id.clone(),
        channel_id,
        title: snippet.title.clone(),
        description: snippet.description.clone(),
        channel_title: snippet.channel_title.clone(),
        tags: snippet.tags.clone(),
        category: snippet.category_id.clone(),
        duration: item
            .content_details
            .as_ref()
            .and_then(|d| d.duration.clone()),
        published_at: snippet.published_at.as_deref().and_then(parse_datetime),
        view_count: parse_count(stats.and_then(|s| s.view_count.as_deref())),
        like_count: parse_count(stats.and_then(|s| s.like_count.as_deref())),
        comment_count: parse_count(stats.and_then(|s| s.comment_count.as_deref())),
        channel_subscriber_count: None,
        channel_view_count: None,
        thumbnail_url: best_thumbnail(&snippet.thumbnails),
    })
}

/// Convert a `channels.list` item into a [`NormalizedChannel`].
#[must_use]
pub fn normalize_channel(item: &ChannelItem) -> Option<NormalizedChannel> {
    let snippet = item.snippet.as_ref()?;
    let stats = item.statistics.as_ref();

    let subscriber_count = match stats {
        Some(s) if !s.hidden_subscriber_count => parse_opt_count(s.subscriber_count.as_deref()),
        _ => None,
    };

    Some(NormalizedChannel {
        channel_id: item.id.clone(),
        title: snippet.title.clone(),
        description: snippet.description.clone(),
        country: snippet.country.clone(),
        published_at: snippet.published_at.as_deref().and_then(parse_datetime),
        thumbnail_url: best_thumbnail(&snippet.thumbnails),
        subscriber_count,
        view_count: parse_opt_count(stats.and_then(|s| s.view_count.as_deref())),
        video_count: parse_opt_count(stats.and_then(|s| s.video_count.as_deref())),
    })
}

/// Parse a decimal-string count, treating absent or malformed values as zero.
fn parse_count(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.parse::<i64>().ok()).unwrap_or(0)
}

/// Parse a decimal-string count, keeping absence distinct from zero.
fn parse_opt_count(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.parse::<i64>().ok())
}

/// Parse an RFC 3339 timestamp from the API, dropping malformed values.
fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Highest-resolution thumbnail available: high, then medium, then default.
fn best_thumbnail(thumbnails: &Thumbnails) -> Option<String> {
    thumbnails
        .high
        .as_ref()
        .or(thumbnails.medium.as_ref())
        .or(thumbnails.default.as_ref())
        .map(|t| t.url.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn video_item(value: serde_json::Value) -> VideoItem {
        serde_json::from_value(value).expect("test fixture should deserialize")
    }

    #[test]
    fn normalize_video_parses_string_counts() {
        let item = video_item(json!({
            "id": "dQw4w9WgXcQ",
            "snippet": {
                "channelId": "UC123",
                "title": "Top 5 Summer Drinks",
                "description": "Refreshing picks",
                "channelTitle": "Drink Lab",
                "tags": ["drinks", "summer"],
                "categoryId": "26",
                "publishedAt": "2025-06-01T12:00:00Z",
                "thumbnails": { "high": { "url": "https://img/hq.jpg" } }
            },
            "contentDetails": { "duration": "PT4M13S" },
            "statistics": { "viewCount": "1234", "likeCount": "56", "commentCount": "7" }
        }));

        let video = normalize_video(&item).expect("should normalize");
        assert_eq!(video.video_id, "dQw4w9WgXcQ");
        assert_eq!(video.channel_id, "UC123");
        assert_eq!(video.view_count, 1234);
        assert_eq!(video.like_count, 56);
        assert_eq!(video.comment_count, 7);
        assert_eq!(video.duration.as_deref(), Some("PT4M13S"));
        assert_eq!(video.thumbnail_url.as_deref(), Some("https://img/hq.jpg"));
        assert!(video.published_at.is_some());
        assert!(video.channel_subscriber_count.is_none());
    }

    #[test]
    fn normalize_video_defaults_missing_statistics_to_zero() {
        let item = video_item(json!({
            "id": "abc",
            "snippet": { "channelId": "UC123", "title": "t" }
        }));

        let video = normalize_video(&item).expect("should normalize");
        assert_eq!(video.view_count, 0);
        assert_eq!(video.like_count, 0);
        assert_eq!(video.comment_count, 0);
        assert!(video.tags.is_empty());
    }

    #[test]
    fn normalize_video_skips_item_without_channel() {
        let item = video_item(json!({
            "id": "abc",
            "snippet": { "title": "orphan" }
        }));

        assert!(normalize_video(&item).is_none());
    }

    #[test]
    fn normalize_video_tolerates_malformed_count() {
        let item = video_item(json!({
            "id": "abc",
            "snippet": { "channelId": "UC123", "title": "t" },
            "statistics": { "viewCount": "not-a-number" }
        }));

        let video = normalize_video(&item).expect("should normalize");
        assert_eq!(video.view_count, 0);
    }

    #[test]
    fn normalize_channel_respects_hidden_subscriber_count() {
        let item: ChannelItem = serde_json::from_value(json!({
            "id": "UC123",
            "snippet": { "title": "Drink Lab", "country": "US" },
            "statistics": {
                "viewCount": "1000000",
                "subscriberCount": "20000",
                "hiddenSubscriberCount": true,
                "videoCount": "120"
            }
        }))
        .unwrap();

        let channel = normalize_channel(&item).expect("should normalize");
        assert!(
            channel.subscriber_count.is_none(),
            "hidden subscriber count must not be surfaced"
        );
        assert_eq!(channel.view_count, Some(1_000_000));
        assert_eq!(channel.video_count, Some(120));
    }

    #[test]
    fn best_thumbnail_falls_back_through_resolutions() {
        let thumbs: Thumbnails = serde_json::from_value(json!({
            "medium": { "url": "https://img/mq.jpg" },
            "default": { "url": "https://img/default.jpg" }
        }))
        .unwrap();
        assert_eq!(best_thumbnail(&thumbs).as_deref(), Some("https://img/mq.jpg"));

        let empty: Thumbnails = serde_json::from_value(json!({})).unwrap();
        assert!(best_thumbnail(&empty).is_none());
    }
}
