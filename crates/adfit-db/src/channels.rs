//! Database operations for the `channels` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use adfit_core::NormalizedChannel;

use crate::videos::UpsertOutcome;
use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `channels` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChannelRow {
    pub id: i64,
    pub campaign_id: i64,
    pub channel_id: String,
    pub title: String,
    pub description: Option<String>,
    pub country: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub thumbnail_url: Option<String>,
    pub subscriber_count: Option<i64>,
    pub view_count: Option<i64>,
    pub video_count: Option<i64>,
    pub fetched_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Insert a discovered channel or refresh the stored copy.
///
/// Keyed on `(campaign_id, channel_id)`; same refresh rule as videos —
/// conflicts update only the metric fields and `fetched_at`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_channel(
    pool: &PgPool,
    campaign_id: i64,
    channel: &NormalizedChannel,
) -> Result<UpsertOutcome, DbError> {
    let inserted: bool = sqlx::query_scalar(
        "INSERT INTO channels \
             (campaign_id, channel_id, title, description, country, published_at, \
              thumbnail_url, subscriber_count, view_count, video_count) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         ON CONFLICT (campaign_id, channel_id) DO UPDATE SET \
             subscriber_count = EXCLUDED.subscriber_count, \
             view_count       = EXCLUDED.view_count, \
             video_count      = EXCLUDED.video_count, \
             thumbnail_url    = EXCLUDED.thumbnail_url, \
             fetched_at       = NOW() \
         RETURNING (xmax = 0)",
    )
    .bind(campaign_id)
    .bind(&channel.channel_id)
    .bind(&channel.title)
    .bind(&channel.description)
    .bind(&channel.country)
    .bind(channel.published_at)
    .bind(&channel.thumbnail_url)
    .bind(channel.subscriber_count)
    .bind(channel.view_count)
    .bind(channel.video_count)
    .fetch_one(pool)
    .await?;

    Ok(if inserted {
        UpsertOutcome::Inserted
    } else {
        UpsertOutcome::Refreshed
    })
}
