//! Keyword-driven video/channel discovery with dedup and quota accounting.
//!
//! One search per rotated keyword, isolated per keyword: a failing search is
//! recorded and the rest of the batch proceeds. Candidates are deduplicated
//! against stored records via natural-key upserts, so re-fetching an
//! unchanged result set produces only duplicate counts.

use std::collections::{HashMap, HashSet};

use futures::stream::{self, StreamExt};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use adfit_db::{KeywordRow, UpsertOutcome};
use adfit_youtube::{CostTable, QuotaLedger, SearchFilters, SearchHits};

use crate::error::PipelineError;
use crate::providers::{MetadataProvider, SearchProvider};
use crate::rotation::{select_keywords, RotationWeights};

const MAX_FETCH_RESULTS: u32 = 500;
const METADATA_BATCH_SIZE: usize = 50;

/// One discovery cycle's parameters.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Campaign public id.
    pub campaign_id: Uuid,
    /// Total videos to aim for across all keywords (1..=500).
    pub max_results: u32,
    /// Locale/window/order filters; `max_results` inside is overwritten with
    /// the per-keyword share.
    pub filters: SearchFilters,
    /// Keyword slots to rotate this cycle.
    pub keyword_slots: usize,
    pub rotation_weights: RotationWeights,
    /// Whether to resolve and store channel records as well.
    pub channel_discovery: bool,
    /// Bounded concurrency for the per-keyword searches.
    pub max_concurrent_searches: usize,
}

/// A per-item failure inside an otherwise successful fetch.
#[derive(Debug, Clone, Serialize)]
pub struct FetchFailure {
    /// The keyword whose search failed, or a `videos.list`/`channels.list`
    /// stage label for metadata batch failures.
    pub keyword: String,
    pub error: String,
}

/// Summary of one discovery cycle. Always produced, even under partial
/// failure — callers inspect `failures` rather than assuming all-or-nothing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FetchOutcome {
    pub new_count: usize,
    pub duplicate_count: usize,
    pub new_channel_count: usize,
    pub duplicate_channel_count: usize,
    /// Total videos now stored for the campaign.
    pub total_videos: i64,
    /// Quota units consumed by this cycle's session.
    pub quota_used: u64,
    pub failures: Vec<FetchFailure>,
}

/// Run one discovery cycle for a campaign.
///
/// Flow: rotate keywords → one search per keyword (concurrent, isolated) →
/// dedupe candidate ids → resolve metadata in batches → denormalize channel
/// metrics → upsert videos/channels → update keyword hit accounting and the
/// campaign's rolling engagement averages.
///
/// Returns a fresh session id's worth of quota in `quota_used`; the caller
/// owns the [`QuotaLedger`] and may aggregate across cycles.
///
/// # Errors
///
/// - [`PipelineError::Validation`] for out-of-range `max_results` or zero
///   `keyword_slots`.
/// - [`PipelineError::CampaignNotFound`] when the campaign does not exist.
/// - [`PipelineError::Db`] on store failures.
///
/// Per-keyword search failures and per-batch metadata failures do NOT error;
/// they are collected into [`FetchOutcome::failures`].
pub async fn fetch_for_campaign<S, M>(
    pool: &PgPool,
    search: &S,
    metadata: &M,
    ledger: &QuotaLedger,
    costs: &CostTable,
    request: &FetchRequest,
) -> Result<FetchOutcome, PipelineError>
where
    S: SearchProvider,
    M: MetadataProvider,
{
    if request.max_results == 0 || request.max_results > MAX_FETCH_RESULTS {
        return Err(PipelineError::Validation(format!(
            "max_results must be in 1..={MAX_FETCH_RESULTS}, got {}",
            request.max_results
        )));
    }

    let campaign = adfit_db::get_campaign_by_public_id(pool, request.campaign_id)
        .await?
        .ok_or(PipelineError::CampaignNotFound(request.campaign_id))?;

    let session = Uuid::new_v4();
    let mut outcome = FetchOutcome::default();

    let selected = select_keywords(
        pool,
        campaign.id,
        request.keyword_slots,
        &request.rotation_weights,
    )
    .await?;
    if selected.is_empty() {
        tracing::info!(campaign = %request.campaign_id, "no active keywords — nothing to fetch");
        outcome.total_videos = adfit_db::count_videos(pool, campaign.id).await?;
        return Ok(outcome);
    }

    // Per-keyword share of the requested total, within the API's 1..=50.
    #[allow(clippy::cast_possible_truncation)]
    let per_keyword = (request.max_results / selected.len() as u32).clamp(1, 50);
    let filters = SearchFilters {
        max_results: per_keyword,
        ..request.filters.clone()
    };

    // One isolated search per keyword, bounded concurrency, rotation order
    // restored afterwards.
    let max_concurrent = request.max_concurrent_searches.max(1);
    let mut results: Vec<(usize, &KeywordRow, Result<SearchHits, String>)> =
        stream::iter(selected.iter().enumerate())
            .map(|(index, keyword)| {
                let filters = filters.clone();
                async move {
                    let result = search.search(&keyword.keyword, &filters).await;
                    match result {
                        Ok(hits) => {
                            ledger.record(request.campaign_id, session, costs.search_units);
                            tracing::debug!(
                                keyword = %keyword.keyword,
                                videos = hits.video_ids.len(),
                                "keyword search complete"
                            );
                            (index, keyword, Ok(hits))
                        }
                        Err(e) => {
                            tracing::warn!(
                                keyword = %keyword.keyword,
                                error = %e,
                                "keyword search failed — continuing with remaining keywords"
                            );
                            (index, keyword, Err(e.to_string()))
                        }
                    }
                }
            })
            .buffer_unordered(max_concurrent)
            .collect()
            .await;
    results.sort_by_key(|(index, _, _)| *index);

    // Collect candidates in rotation order, dedup across keywords, and track
    // per-keyword unique hits for rotation accounting.
    let mut candidate_ids: Vec<String> = Vec::new();
    let mut seen_videos: HashSet<String> = HashSet::new();
    let mut search_channel_ids: Vec<String> = Vec::new();
    let mut seen_channels: HashSet<String> = HashSet::new();

    for (_, keyword, result) in results {
        match result {
            Ok(hits) => {
                let unique_hits: HashSet<&String> = hits.video_ids.iter().collect();
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                adfit_db::add_keyword_results(pool, keyword.id, unique_hits.len() as i32).await?;

                for video_id in hits.video_ids {
                    if seen_videos.insert(video_id.clone()) {
                        candidate_ids.push(video_id);
                    }
                }
                for channel_id in hits.channel_ids {
                    if seen_channels.insert(channel_id.clone()) {
                        search_channel_ids.push(channel_id);
                    }
                }
            }
            Err(error) => outcome.failures.push(FetchFailure {
                keyword: keyword.keyword.clone(),
                error,
            }),
        }
    }

    if candidate_ids.is_empty() {
        tracing::warn!(campaign = %request.campaign_id, "no candidate videos found this cycle");
        outcome.total_videos = adfit_db::count_videos(pool, campaign.id).await?;
        outcome.quota_used = ledger.usage(request.campaign_id, session);
        return Ok(outcome);
    }

    // Resolve full video metadata, batch-isolated: one failing batch is
    // recorded and the remaining batches proceed.
    let mut videos = Vec::with_capacity(candidate_ids.len());
    for (batch_index, chunk) in candidate_ids.chunks(METADATA_BATCH_SIZE).enumerate() {
        match metadata.fetch_videos(chunk).await {
            Ok((batch, calls)) => {
                ledger.record(
                    request.campaign_id,
                    session,
                    calls.saturating_mul(costs.video_list_units),
                );
                videos.extend(batch);
            }
            Err(e) => {
                tracing::warn!(batch = batch_index, error = %e, "video metadata batch failed");
                outcome.failures.push(FetchFailure {
                    keyword: format!("videos.list[batch {batch_index}]"),
                    error: e.to_string(),
                });
            }
        }
    }

    // Channel discovery: resolve distinct channels, denormalize their metrics
    // onto the video records, and upsert the channel rows.
    if request.channel_discovery {
        for video in &videos {
            if seen_channels.insert(video.channel_id.clone()) {
                search_channel_ids.push(video.channel_id.clone());
            }
        }

        let mut channels = Vec::with_capacity(search_channel_ids.len());
        for (batch_index, chunk) in search_channel_ids.chunks(METADATA_BATCH_SIZE).enumerate() {
            match metadata.fetch_channels(chunk).await {
                Ok((batch, calls)) => {
                    ledger.record(
                        request.campaign_id,
                        session,
                        calls.saturating_mul(costs.channel_list_units),
                    );
                    channels.extend(batch);
                }
                Err(e) => {
                    tracing::warn!(batch = batch_index, error = %e, "channel metadata batch failed");
                    outcome.failures.push(FetchFailure {
                        keyword: format!("channels.list[batch {batch_index}]"),
                        error: e.to_string(),
                    });
                }
            }
        }

        let channel_metrics: HashMap<String, (Option<i64>, Option<i64>)> = channels
            .iter()
            .map(|c| (c.channel_id.clone(), (c.subscriber_count, c.view_count)))
            .collect();
        for video in &mut videos {
            if let Some((subscribers, views)) = channel_metrics.get(&video.channel_id) {
                video.channel_subscriber_count = *subscribers;
                video.channel_view_count = *views;
            }
        }

        for channel in &channels {
            match adfit_db::upsert_channel(pool, campaign.id, channel).await? {
                UpsertOutcome::Inserted => outcome.new_channel_count += 1,
                UpsertOutcome::Refreshed => outcome.duplicate_channel_count += 1,
            }
        }
    }

    for video in &videos {
        match adfit_db::upsert_video(pool, campaign.id, video).await? {
            UpsertOutcome::Inserted => outcome.new_count += 1,
            UpsertOutcome::Refreshed => outcome.duplicate_count += 1,
        }
    }

    refresh_rolling_averages(pool, campaign.id).await?;

    outcome.total_videos = adfit_db::count_videos(pool, campaign.id).await?;
    outcome.quota_used = ledger.usage(request.campaign_id, session);

    tracing::info!(
        campaign = %request.campaign_id,
        new = outcome.new_count,
        duplicates = outcome.duplicate_count,
        failures = outcome.failures.len(),
        quota_used = outcome.quota_used,
        "discovery cycle complete"
    );

    Ok(outcome)
}

/// Recompute the campaign's rolling average engagement counts from its
/// stored videos.
#[allow(clippy::cast_precision_loss)]
async fn refresh_rolling_averages(pool: &PgPool, campaign_id: i64) -> Result<(), PipelineError> {
    let stats = adfit_db::campaign_video_stats(pool, campaign_id).await?;
    if stats.total_videos == 0 {
        return Ok(());
    }
    let denom = stats.total_videos as f64;
    adfit_db::update_campaign_rolling_averages(
        pool,
        campaign_id,
        stats.total_views as f64 / denom,
        stats.total_likes as f64 / denom,
        stats.total_comments as f64 / denom,
    )
    .await?;
    Ok(())
}
