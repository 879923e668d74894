//! Database operations for the `video_scores` table.
//!
//! A video has at most one score row per campaign; rescoring strictly
//! overwrites the previous row.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `video_scores` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VideoScoreRow {
    pub id: i64,
    pub campaign_id: i64,
    pub video_id: String,
    pub semantic_similarity_score: f64,
    pub intent_score: f64,
    pub interest_score: f64,
    pub emotion_score: f64,
    pub intent_type: String,
    pub interest_topics: Value,
    pub emotion_type: String,
    pub contextual_score: f64,
    pub brand_safety_status: String,
    pub brand_suitability: String,
    pub sentiment: String,
    pub tone: String,
    pub key_entities: Value,
    pub key_topics: Value,
    pub targeting_recommendation: String,
    pub suggested_bid_modifier: f64,
    pub transcript_used: bool,
    pub reasoning: Option<String>,
    pub scored_at: DateTime<Utc>,
}

/// Insert/overwrite payload for one video's score.
///
/// Enum-valued fields are already rendered to their lowercase string forms;
/// the scoring crate owns the typed versions.
#[derive(Debug, Clone)]
pub struct NewVideoScore {
    pub video_id: String,
    pub semantic_similarity_score: f64,
    pub intent_score: f64,
    pub interest_score: f64,
    pub emotion_score: f64,
    pub intent_type: String,
    pub interest_topics: Vec<String>,
    pub emotion_type: String,
    pub contextual_score: f64,
    pub brand_safety_status: String,
    pub brand_suitability: String,
    pub sentiment: String,
    pub tone: String,
    pub key_entities: Vec<String>,
    pub key_topics: Vec<String>,
    pub targeting_recommendation: String,
    pub suggested_bid_modifier: f64,
    pub transcript_used: bool,
    pub reasoning: Option<String>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

const SCORE_COLUMNS: &str = "id, campaign_id, video_id, semantic_similarity_score, intent_score, \
     interest_score, emotion_score, intent_type, interest_topics, emotion_type, \
     contextual_score, brand_safety_status, brand_suitability, sentiment, tone, \
     key_entities, key_topics, targeting_recommendation, suggested_bid_modifier, \
     transcript_used, reasoning, scored_at";

/// Insert or overwrite the score for one video.
///
/// Keyed on `(campaign_id, video_id)`; a conflict replaces every scored field
/// and stamps a fresh `scored_at`, so re-running a batch is idempotent. The
/// write is a single statement — concurrent rescoring of the same video
/// serializes on the unique constraint and resolves to one row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_video_score(
    pool: &PgPool,
    campaign_id: i64,
    score: &NewVideoScore,
) -> Result<VideoScoreRow, DbError> {
    let row = sqlx::query_as::<_, VideoScoreRow>(&format!(
        "INSERT INTO video_scores \
             (campaign_id, video_id, semantic_similarity_score, intent_score, \
              interest_score, emotion_score, intent_type, interest_topics, emotion_type, \
              contextual_score, brand_safety_status, brand_suitability, sentiment, tone, \
              key_entities, key_topics, targeting_recommendation, suggested_bid_modifier, \
              transcript_used, reasoning) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, \
                 $11, $12, $13, $14, $15, $16, $17, $18, $19, $20) \
         ON CONFLICT (campaign_id, video_id) DO UPDATE SET \
             semantic_similarity_score = EXCLUDED.semantic_similarity_score, \
             intent_score              = EXCLUDED.intent_score, \
             interest_score            = EXCLUDED.interest_score, \
             emotion_score             = EXCLUDED.emotion_score, \
             intent_type               = EXCLUDED.intent_type, \
             interest_topics           = EXCLUDED.interest_topics, \
             emotion_type              = EXCLUDED.emotion_type, \
             contextual_score          = EXCLUDED.contextual_score, \
             brand_safety_status       = EXCLUDED.brand_safety_status, \
             brand_suitability         = EXCLUDED.brand_suitability, \
             sentiment                 = EXCLUDED.sentiment, \
             tone                      = EXCLUDED.tone, \
             key_entities              = EXCLUDED.key_entities, \
             key_topics                = EXCLUDED.key_topics, \
             targeting_recommendation  = EXCLUDED.targeting_recommendation, \
             suggested_bid_modifier    = EXCLUDED.suggested_bid_modifier, \
             transcript_used           = EXCLUDED.transcript_used, \
             reasoning                 = EXCLUDED.reasoning, \
             scored_at                 = NOW() \
         RETURNING {SCORE_COLUMNS}"
    ))
    .bind(campaign_id)
    .bind(&score.video_id)
    .bind(score.semantic_similarity_score)
    .bind(score.intent_score)
    .bind(score.interest_score)
    .bind(score.emotion_score)
    .bind(&score.intent_type)
    .bind(serde_json::json!(score.interest_topics))
    .bind(&score.emotion_type)
    .bind(score.contextual_score)
    .bind(&score.brand_safety_status)
    .bind(&score.brand_suitability)
    .bind(&score.sentiment)
    .bind(&score.tone)
    .bind(serde_json::json!(score.key_entities))
    .bind(serde_json::json!(score.key_topics))
    .bind(&score.targeting_recommendation)
    .bind(score.suggested_bid_modifier)
    .bind(score.transcript_used)
    .bind(&score.reasoning)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Fetch the stored score for one video, or `None` if the video is unscored.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_score(
    pool: &PgPool,
    campaign_id: i64,
    video_id: &str,
) -> Result<Option<VideoScoreRow>, DbError> {
    let row = sqlx::query_as::<_, VideoScoreRow>(&format!(
        "SELECT {SCORE_COLUMNS} FROM video_scores \
         WHERE campaign_id = $1 AND video_id = $2"
    ))
    .bind(campaign_id)
    .bind(video_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns all scores for a campaign, strongest contextual fit first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_scores_for_campaign(
    pool: &PgPool,
    campaign_id: i64,
) -> Result<Vec<VideoScoreRow>, DbError> {
    let rows = sqlx::query_as::<_, VideoScoreRow>(&format!(
        "SELECT {SCORE_COLUMNS} FROM video_scores \
         WHERE campaign_id = $1 \
         ORDER BY contextual_score DESC, id"
    ))
    .bind(campaign_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Count the score rows stored for a campaign.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_scores(pool: &PgPool, campaign_id: i64) -> Result<i64, DbError> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM video_scores WHERE campaign_id = $1")
            .bind(campaign_id)
            .fetch_one(pool)
            .await?;

    Ok(count)
}
