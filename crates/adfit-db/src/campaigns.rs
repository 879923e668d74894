//! Database operations for the `campaigns` table.
//!
//! Campaigns are created and edited by the management surface; the pipeline
//! reads them and only writes back the rolling engagement averages.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `campaigns` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CampaignRow {
    pub id: i64,
    pub public_id: Uuid,
    pub name: String,
    pub brand_name: String,
    pub brand_url: Option<String>,
    pub product_category: String,
    pub campaign_goal: String,
    pub campaign_definition: String,
    pub brand_context_text: Option<String>,
    pub status: String,
    pub audience_intent: Option<String>,
    pub audience_persona: Option<String>,
    pub tone_profile: Option<String>,
    pub emotion_guidance: Value,
    pub interest_guidance: Value,
    pub guardrail_terms: Value,
    pub primary_language: Option<String>,
    pub primary_market: Option<String>,
    pub avg_view_count: Option<f64>,
    pub avg_like_count: Option<f64>,
    pub avg_comment_count: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CampaignRow {
    /// Declared emotion guidance tags (empty when unset).
    #[must_use]
    pub fn emotion_guidance_tags(&self) -> Vec<String> {
        json_string_array(&self.emotion_guidance)
    }

    /// Interest guidance clusters (empty when unset).
    #[must_use]
    pub fn interest_clusters(&self) -> Vec<String> {
        json_string_array(&self.interest_guidance)
    }

    /// Guardrail terms whose presence demotes a video (empty when unset).
    #[must_use]
    pub fn guardrail_term_list(&self) -> Vec<String> {
        json_string_array(&self.guardrail_terms)
    }
}

/// Extract a `Vec<String>` from a JSONB array column, skipping non-string
/// entries. Non-array values yield an empty vec.
fn json_string_array(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Aggregate engagement statistics across a campaign's stored videos.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct CampaignVideoStats {
    pub total_videos: i64,
    pub total_views: i64,
    pub total_likes: i64,
    pub total_comments: i64,
    pub unique_channels: i64,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

const CAMPAIGN_COLUMNS: &str = "id, public_id, name, brand_name, brand_url, product_category, \
     campaign_goal, campaign_definition, brand_context_text, status, \
     audience_intent, audience_persona, tone_profile, emotion_guidance, \
     interest_guidance, guardrail_terms, primary_language, primary_market, \
     avg_view_count, avg_like_count, avg_comment_count, created_at, updated_at";

/// Fetch a campaign by its public UUID, or `None` if it does not exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_campaign_by_public_id(
    pool: &PgPool,
    public_id: Uuid,
) -> Result<Option<CampaignRow>, DbError> {
    let row = sqlx::query_as::<_, CampaignRow>(&format!(
        "SELECT {CAMPAIGN_COLUMNS} FROM campaigns WHERE public_id = $1"
    ))
    .bind(public_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Compute aggregate engagement stats for a campaign's stored videos.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn campaign_video_stats(
    pool: &PgPool,
    campaign_id: i64,
) -> Result<CampaignVideoStats, DbError> {
    let stats = sqlx::query_as::<_, CampaignVideoStats>(
        "SELECT COUNT(*) AS total_videos, \
                COALESCE(SUM(view_count), 0)::BIGINT AS total_views, \
                COALESCE(SUM(like_count), 0)::BIGINT AS total_likes, \
                COALESCE(SUM(comment_count), 0)::BIGINT AS total_comments, \
                COUNT(DISTINCT channel_id) AS unique_channels \
         FROM videos \
         WHERE campaign_id = $1",
    )
    .bind(campaign_id)
    .fetch_one(pool)
    .await?;

    Ok(stats)
}

/// Refresh the campaign's rolling average view/like/comment counts.
///
/// Called after a fetch cycle so scoring can compare a video's engagement
/// against the campaign baseline.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no campaign has the given `id`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn update_campaign_rolling_averages(
    pool: &PgPool,
    campaign_id: i64,
    avg_views: f64,
    avg_likes: f64,
    avg_comments: f64,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE campaigns \
         SET avg_view_count = $1, avg_like_count = $2, avg_comment_count = $3, \
             updated_at = NOW() \
         WHERE id = $4",
    )
    .bind(avg_views)
    .bind(avg_likes)
    .bind(avg_comments)
    .bind(campaign_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}
