//! Live integration tests for adfit-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/adfit-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use adfit_core::{NormalizedChannel, NormalizedVideo};
use adfit_db::{
    count_scores, count_videos, get_score, list_active_keywords, list_unscored_videos,
    mark_keywords_used, upsert_channel, upsert_video, upsert_video_score, NewVideoScore,
    UpsertOutcome,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Insert a minimal campaign row and return its generated `id`.
async fn insert_test_campaign(pool: &sqlx::PgPool, name: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO campaigns \
             (name, brand_name, product_category, campaign_goal, campaign_definition, status) \
         VALUES ($1, 'Acme', 'beverages', 'awareness', 'Launch the sparkling line', 'active') \
         RETURNING id",
    )
    .bind(name)
    .fetch_one(pool)
    .await
    .unwrap_or_else(|e| panic!("insert_test_campaign failed for '{name}': {e}"))
}

/// Insert an active keyword row and return its generated `id`.
async fn insert_test_keyword(pool: &sqlx::PgPool, campaign_id: i64, keyword: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO keywords (campaign_id, keyword, keyword_type, relevance_score) \
         VALUES ($1, $2, 'core', 0.8) RETURNING id",
    )
    .bind(campaign_id)
    .bind(keyword)
    .fetch_one(pool)
    .await
    .unwrap_or_else(|e| panic!("insert_test_keyword failed for '{keyword}': {e}"))
}

fn make_video(video_id: &str, view_count: i64) -> NormalizedVideo {
    NormalizedVideo {
        video_id: video_id.to_string(),
        channel_id: "UCtest".to_string(),
        title: "Top 5 Summer Drinks".to_string(),
        description: Some("Refreshing picks for hot days".to_string()),
        channel_title: Some("Drink Lab".to_string()),
        tags: vec!["drinks".to_string(), "summer".to_string()],
        category: Some("26".to_string()),
        duration: Some("PT4M13S".to_string()),
        published_at: None,
        view_count,
        like_count: 50,
        comment_count: 10,
        channel_subscriber_count: Some(20_000),
        channel_view_count: Some(1_000_000),
        thumbnail_url: Some("https://img.example/hq.jpg".to_string()),
    }
}

fn make_score(video_id: &str, contextual: f64) -> NewVideoScore {
    NewVideoScore {
        video_id: video_id.to_string(),
        semantic_similarity_score: 0.8,
        intent_score: 0.6,
        interest_score: 0.7,
        emotion_score: 0.5,
        intent_type: "informational".to_string(),
        interest_topics: vec!["drinks".to_string()],
        emotion_type: "joyful".to_string(),
        contextual_score: contextual,
        brand_safety_status: "safe".to_string(),
        brand_suitability: "high".to_string(),
        sentiment: "positive".to_string(),
        tone: "enthusiastic and informative".to_string(),
        key_entities: vec!["summer".to_string()],
        key_topics: vec!["drinks".to_string()],
        targeting_recommendation: "moderate_match".to_string(),
        suggested_bid_modifier: 1.17,
        transcript_used: true,
        reasoning: Some("semantic overlap dominates".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Section 1: Video upsert dedup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn video_upsert_inserts_then_refreshes(pool: sqlx::PgPool) {
    let campaign_id = insert_test_campaign(&pool, "dedup").await;

    let first = upsert_video(&pool, campaign_id, &make_video("vid-1", 1000))
        .await
        .expect("first upsert failed");
    assert_eq!(first, UpsertOutcome::Inserted);

    // Same natural key with refreshed metrics.
    let second = upsert_video(&pool, campaign_id, &make_video("vid-1", 2000))
        .await
        .expect("second upsert failed");
    assert_eq!(second, UpsertOutcome::Refreshed);

    assert_eq!(count_videos(&pool, campaign_id).await.unwrap(), 1);

    let stored = adfit_db::get_video(&pool, campaign_id, "vid-1")
        .await
        .unwrap()
        .expect("video should be stored");
    assert_eq!(stored.view_count, 2000, "metrics should refresh on re-fetch");
}

#[sqlx::test(migrations = "../../migrations")]
async fn same_video_id_is_independent_per_campaign(pool: sqlx::PgPool) {
    let campaign_a = insert_test_campaign(&pool, "a").await;
    let campaign_b = insert_test_campaign(&pool, "b").await;

    let a = upsert_video(&pool, campaign_a, &make_video("vid-1", 1000))
        .await
        .unwrap();
    let b = upsert_video(&pool, campaign_b, &make_video("vid-1", 1000))
        .await
        .unwrap();

    assert_eq!(a, UpsertOutcome::Inserted);
    assert_eq!(b, UpsertOutcome::Inserted);
}

#[sqlx::test(migrations = "../../migrations")]
async fn channel_upsert_follows_same_rule(pool: sqlx::PgPool) {
    let campaign_id = insert_test_campaign(&pool, "channels").await;
    let channel = NormalizedChannel {
        channel_id: "UCtest".to_string(),
        title: "Drink Lab".to_string(),
        description: None,
        country: Some("US".to_string()),
        published_at: None,
        thumbnail_url: None,
        subscriber_count: Some(20_000),
        view_count: Some(1_000_000),
        video_count: Some(120),
    };

    let first = upsert_channel(&pool, campaign_id, &channel).await.unwrap();
    let second = upsert_channel(&pool, campaign_id, &channel).await.unwrap();

    assert_eq!(first, UpsertOutcome::Inserted);
    assert_eq!(second, UpsertOutcome::Refreshed);
}

// ---------------------------------------------------------------------------
// Section 2: Score overwrite
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn rescoring_overwrites_single_row(pool: sqlx::PgPool) {
    let campaign_id = insert_test_campaign(&pool, "rescore").await;
    upsert_video(&pool, campaign_id, &make_video("vid-1", 1000))
        .await
        .unwrap();

    upsert_video_score(&pool, campaign_id, &make_score("vid-1", 0.40))
        .await
        .expect("first score failed");
    upsert_video_score(&pool, campaign_id, &make_score("vid-1", 0.91))
        .await
        .expect("second score failed");

    assert_eq!(count_scores(&pool, campaign_id).await.unwrap(), 1);

    let stored = get_score(&pool, campaign_id, "vid-1")
        .await
        .unwrap()
        .expect("score should exist");
    assert!(
        (stored.contextual_score - 0.91).abs() < 1e-9,
        "latest score should win, got {}",
        stored.contextual_score
    );
}

// ---------------------------------------------------------------------------
// Section 3: Unscored query
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn unscored_query_excludes_scored_videos(pool: sqlx::PgPool) {
    let campaign_id = insert_test_campaign(&pool, "pending").await;
    upsert_video(&pool, campaign_id, &make_video("vid-1", 1000))
        .await
        .unwrap();
    upsert_video(&pool, campaign_id, &make_video("vid-2", 5000))
        .await
        .unwrap();

    upsert_video_score(&pool, campaign_id, &make_score("vid-1", 0.5))
        .await
        .unwrap();

    let pending = list_unscored_videos(&pool, campaign_id, 100).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].video_id, "vid-2");
}

// ---------------------------------------------------------------------------
// Section 4: Keyword rotation bookkeeping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn mark_keywords_used_is_visible_to_next_read(pool: sqlx::PgPool) {
    let campaign_id = insert_test_campaign(&pool, "rotation").await;
    let kw_a = insert_test_keyword(&pool, campaign_id, "sparkling water").await;
    insert_test_keyword(&pool, campaign_id, "summer drinks").await;

    mark_keywords_used(&pool, &[kw_a]).await.unwrap();

    let keywords = list_active_keywords(&pool, campaign_id).await.unwrap();
    let used = keywords.iter().find(|k| k.id == kw_a).unwrap();
    let unused = keywords.iter().find(|k| k.id != kw_a).unwrap();

    assert!(used.last_used_at.is_some(), "used keyword must be stamped");
    assert_eq!(used.fetch_count, 1);
    assert!(unused.last_used_at.is_none());
    assert_eq!(unused.fetch_count, 0);
}
