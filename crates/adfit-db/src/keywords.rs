//! Database operations for the `keywords` table.
//!
//! Keyword creation and the per-bucket active cap are owned by the campaign
//! management surface; the pipeline reads active keywords and writes back
//! rotation bookkeeping (`last_used_at`, `fetch_count`, `total_results`).

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `keywords` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct KeywordRow {
    pub id: i64,
    pub public_id: Uuid,
    pub campaign_id: i64,
    pub keyword: String,
    pub keyword_type: String,
    pub relevance_score: f64,
    pub source: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub fetch_count: i32,
    pub total_results: i32,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns all active keywords for a campaign.
///
/// Ordered by keyword text for a stable baseline; the rotation scheduler
/// applies its own priority ordering on top.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_keywords(
    pool: &PgPool,
    campaign_id: i64,
) -> Result<Vec<KeywordRow>, DbError> {
    let rows = sqlx::query_as::<_, KeywordRow>(
        "SELECT id, public_id, campaign_id, keyword, keyword_type, relevance_score, \
                source, status, created_at, last_used_at, fetch_count, total_results \
         FROM keywords \
         WHERE campaign_id = $1 AND status = 'active' \
         ORDER BY keyword",
    )
    .bind(campaign_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Marks the given keywords as used by the current fetch cycle.
///
/// Sets `last_used_at = NOW()` and increments `fetch_count` in a single
/// statement so the next scheduling call for the same campaign observes the
/// rotation (read-after-write).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn mark_keywords_used(pool: &PgPool, keyword_ids: &[i64]) -> Result<(), DbError> {
    if keyword_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        "UPDATE keywords \
         SET last_used_at = NOW(), fetch_count = fetch_count + 1 \
         WHERE id = ANY($1)",
    )
    .bind(keyword_ids)
    .execute(pool)
    .await?;

    Ok(())
}

/// Adds the number of unique search hits a keyword produced this cycle to its
/// running `total_results` counter.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn add_keyword_results(
    pool: &PgPool,
    keyword_id: i64,
    unique_hits: i32,
) -> Result<(), DbError> {
    sqlx::query(
        "UPDATE keywords \
         SET total_results = total_results + $1 \
         WHERE id = $2",
    )
    .bind(unique_hits)
    .bind(keyword_id)
    .execute(pool)
    .await?;

    Ok(())
}
