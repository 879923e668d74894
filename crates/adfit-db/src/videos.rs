//! Database operations for the `videos` table.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;

use adfit_core::NormalizedVideo;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `videos` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VideoRow {
    pub id: i64,
    pub campaign_id: i64,
    pub video_id: String,
    pub channel_id: String,
    pub title: String,
    pub description: Option<String>,
    pub channel_title: Option<String>,
    pub tags: Value,
    pub category: Option<String>,
    pub duration: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub channel_subscriber_count: Option<i64>,
    pub channel_view_count: Option<i64>,
    pub thumbnail_url: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

impl VideoRow {
    /// Video tags as plain strings (empty when unset).
    #[must_use]
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Whether an upsert created a new row or refreshed an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Refreshed,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

const VIDEO_COLUMNS: &str = "id, campaign_id, video_id, channel_id, title, description, \
     channel_title, tags, category, duration, published_at, view_count, like_count, \
     comment_count, channel_subscriber_count, channel_view_count, thumbnail_url, fetched_at";

/// Insert a discovered video or refresh the stored copy.
///
/// Keyed on `(campaign_id, video_id)`. A conflict refreshes only the mutable
/// metrics (view/like/comment counts, denormalized channel counts, thumbnail)
/// and `fetched_at`; descriptive fields keep their first-seen values. The
/// `(xmax = 0)` check distinguishes a fresh insert from a refresh, which is
/// what the fetch report counts as new vs. duplicate.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_video(
    pool: &PgPool,
    campaign_id: i64,
    video: &NormalizedVideo,
) -> Result<UpsertOutcome, DbError> {
    let inserted: bool = sqlx::query_scalar(
        "INSERT INTO videos \
             (campaign_id, video_id, channel_id, title, description, channel_title, \
              tags, category, duration, published_at, view_count, like_count, \
              comment_count, channel_subscriber_count, channel_view_count, thumbnail_url) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
         ON CONFLICT (campaign_id, video_id) DO UPDATE SET \
             view_count               = EXCLUDED.view_count, \
             like_count               = EXCLUDED.like_count, \
             comment_count            = EXCLUDED.comment_count, \
             channel_subscriber_count = EXCLUDED.channel_subscriber_count, \
             channel_view_count       = EXCLUDED.channel_view_count, \
             thumbnail_url            = EXCLUDED.thumbnail_url, \
             fetched_at               = NOW() \
         RETURNING (xmax = 0)",
    )
    .bind(campaign_id)
    .bind(&video.video_id)
    .bind(&video.channel_id)
    .bind(&video.title)
    .bind(&video.description)
    .bind(&video.channel_title)
    .bind(serde_json::json!(video.tags))
    .bind(&video.category)
    .bind(&video.duration)
    .bind(video.published_at)
    .bind(video.view_count)
    .bind(video.like_count)
    .bind(video.comment_count)
    .bind(video.channel_subscriber_count)
    .bind(video.channel_view_count)
    .bind(&video.thumbnail_url)
    .fetch_one(pool)
    .await?;

    Ok(if inserted {
        UpsertOutcome::Inserted
    } else {
        UpsertOutcome::Refreshed
    })
}

/// Fetch a stored video by its natural key, or `None` if not stored.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_video(
    pool: &PgPool,
    campaign_id: i64,
    video_id: &str,
) -> Result<Option<VideoRow>, DbError> {
    let row = sqlx::query_as::<_, VideoRow>(&format!(
        "SELECT {VIDEO_COLUMNS} FROM videos WHERE campaign_id = $1 AND video_id = $2"
    ))
    .bind(campaign_id)
    .bind(video_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Fetch stored videos for a campaign by their natural video ids.
///
/// Ids with no stored row are simply absent from the result; callers that
/// need per-id accounting compare against the requested list.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_videos_by_ids(
    pool: &PgPool,
    campaign_id: i64,
    video_ids: &[String],
) -> Result<Vec<VideoRow>, DbError> {
    let rows = sqlx::query_as::<_, VideoRow>(&format!(
        "SELECT {VIDEO_COLUMNS} FROM videos \
         WHERE campaign_id = $1 AND video_id = ANY($2)"
    ))
    .bind(campaign_id)
    .bind(video_ids)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns stored videos for a campaign that have no score yet.
///
/// Used by the batch orchestrator to find pending work.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_unscored_videos(
    pool: &PgPool,
    campaign_id: i64,
    limit: i64,
) -> Result<Vec<VideoRow>, DbError> {
    let rows = sqlx::query_as::<_, VideoRow>(
        "SELECT v.id, v.campaign_id, v.video_id, v.channel_id, v.title, v.description, \
                v.channel_title, v.tags, v.category, v.duration, v.published_at, \
                v.view_count, v.like_count, v.comment_count, v.channel_subscriber_count, \
                v.channel_view_count, v.thumbnail_url, v.fetched_at \
         FROM videos v \
         LEFT JOIN video_scores s \
           ON s.campaign_id = v.campaign_id AND s.video_id = v.video_id \
         WHERE v.campaign_id = $1 AND s.id IS NULL \
         ORDER BY v.view_count DESC, v.id \
         LIMIT $2",
    )
    .bind(campaign_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Count the videos stored for a campaign.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_videos(pool: &PgPool, campaign_id: i64) -> Result<i64, DbError> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM videos WHERE campaign_id = $1")
            .bind(campaign_id)
            .fetch_one(pool)
            .await?;

    Ok(count)
}
