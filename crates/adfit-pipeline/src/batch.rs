//! Batch scoring orchestration.
//!
//! Drives transcript acquisition → signal scoring → blending → persistence
//! over a set of video ids. Every video is processed independently: one
//! failure is recorded and the rest of the batch proceeds. Persistence is an
//! atomic per-video upsert, so re-running a batch strictly overwrites prior
//! scores with no duplication.

use std::collections::HashMap;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use adfit_db::{CampaignRow, NewVideoScore, VideoRow};
use adfit_scoring::{blend, CampaignGuidance, ScoringConfig, ScoringInput, ScoringModel};
use adfit_transcript::{preferred_languages, Transcript};

use crate::error::PipelineError;
use crate::providers::TranscriptProvider;

/// One scoring batch's parameters. Rescoring a single video is a batch of
/// size one through the same path.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    /// Campaign public id.
    pub campaign_id: Uuid,
    /// Natural YouTube video ids to score.
    pub video_ids: Vec<String>,
    /// Whether to attempt transcript enrichment per video.
    pub use_transcript: bool,
    /// Bounded concurrency for per-video scoring.
    pub max_concurrent: usize,
}

/// Per-video summary returned in the batch report.
#[derive(Debug, Clone, Serialize)]
pub struct VideoScoreSummary {
    pub video_id: String,
    pub contextual_score: f64,
    pub targeting_recommendation: String,
    pub brand_suitability: String,
    pub transcript_used: bool,
}

/// A per-video failure inside an otherwise successful batch.
#[derive(Debug, Clone, Serialize)]
pub struct VideoFailure {
    pub video_id: String,
    pub error: String,
}

/// The normal return shape of a batch — partial failure is data, not an
/// exception. `processed + failed == requested video count`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub processed: usize,
    pub failed: usize,
    pub results: Vec<VideoScoreSummary>,
    pub errors: Vec<VideoFailure>,
}

/// Build the scorer-side guidance view of a campaign row.
#[must_use]
pub fn guidance_from_campaign(campaign: &CampaignRow) -> CampaignGuidance {
    CampaignGuidance {
        name: campaign.name.clone(),
        brand_name: campaign.brand_name.clone(),
        product_category: campaign.product_category.clone(),
        campaign_goal: campaign.campaign_goal.clone(),
        campaign_definition: campaign.campaign_definition.clone(),
        brand_context_text: campaign.brand_context_text.clone(),
        audience_intent: campaign.audience_intent.clone(),
        audience_persona: campaign.audience_persona.clone(),
        tone_profile: campaign.tone_profile.clone(),
        emotion_guidance: campaign.emotion_guidance_tags(),
        interest_guidance: campaign.interest_clusters(),
        guardrail_terms: campaign.guardrail_term_list(),
        primary_language: campaign.primary_language.clone(),
    }
}

/// Score one stored video: acquire transcript (optional) → classify → blend.
///
/// No store access — the caller persists the returned payload.
///
/// # Errors
///
/// Returns the scoring model's error string; transcript acquisition never
/// fails (absence degrades to the metadata-only path).
async fn score_video_record<T, M>(
    transcript: &T,
    model: &M,
    config: &ScoringConfig,
    guidance: &CampaignGuidance,
    video: &VideoRow,
    use_transcript: bool,
) -> Result<NewVideoScore, String>
where
    T: TranscriptProvider,
    M: ScoringModel,
{
    let input = if use_transcript {
        let languages = preferred_languages(guidance.primary_language.as_deref());
        match transcript.acquire(&video.video_id, &languages).await {
            Transcript::Available { text, .. } => ScoringInput::WithTranscript {
                title: video.title.clone(),
                description: video.description.clone(),
                tags: video.tag_list(),
                transcript: text,
            },
            Transcript::Unavailable => ScoringInput::MetadataOnly {
                title: video.title.clone(),
                description: video.description.clone(),
                tags: video.tag_list(),
            },
        }
    } else {
        ScoringInput::MetadataOnly {
            title: video.title.clone(),
            description: video.description.clone(),
            tags: video.tag_list(),
        }
    };

    let report = model
        .classify(guidance, &input)
        .await
        .map_err(|e| e.to_string())?;

    let outcome = blend(
        &report,
        &video.title,
        video.description.as_deref(),
        &guidance.guardrail_terms,
        config,
    );

    Ok(NewVideoScore {
        video_id: video.video_id.clone(),
        semantic_similarity_score: report.scores.semantic_similarity,
        intent_score: report.scores.intent,
        interest_score: report.scores.interest,
        emotion_score: report.scores.emotion,
        intent_type: report.intent_type.as_str().to_string(),
        interest_topics: report.interest_topics.clone(),
        emotion_type: report.emotion_type.clone(),
        contextual_score: outcome.contextual_score,
        brand_safety_status: outcome.brand_safety_status.as_str().to_string(),
        brand_suitability: outcome.brand_suitability.as_str().to_string(),
        sentiment: report.sentiment.as_str().to_string(),
        tone: report.tone.clone(),
        key_entities: report.key_entities.clone(),
        key_topics: report.key_topics.clone(),
        targeting_recommendation: outcome.targeting_recommendation.as_str().to_string(),
        suggested_bid_modifier: outcome.suggested_bid_modifier,
        transcript_used: report.transcript_used,
        reasoning: Some(outcome.reasoning),
    })
}

/// Score a set of loaded video rows with per-video isolation.
///
/// Pure with respect to the store: returns score payloads and failures in
/// input order; the caller persists. Exposed for the orchestrator and its
/// tests.
pub async fn process_videos<T, M>(
    transcript: &T,
    model: &M,
    config: &ScoringConfig,
    guidance: &CampaignGuidance,
    videos: &[VideoRow],
    use_transcript: bool,
    max_concurrent: usize,
) -> (Vec<NewVideoScore>, Vec<VideoFailure>)
where
    T: TranscriptProvider,
    M: ScoringModel,
{
    let max_concurrent = max_concurrent.max(1);
    let mut results: Vec<(usize, Result<NewVideoScore, VideoFailure>)> =
        stream::iter(videos.iter().enumerate())
            .map(|(index, video)| async move {
                let result =
                    score_video_record(transcript, model, config, guidance, video, use_transcript)
                        .await;
                match result {
                    Ok(score) => (index, Ok(score)),
                    Err(error) => {
                        tracing::warn!(
                            video_id = %video.video_id,
                            error = %error,
                            "video scoring failed — continuing with remaining videos"
                        );
                        (
                            index,
                            Err(VideoFailure {
                                video_id: video.video_id.clone(),
                                error,
                            }),
                        )
                    }
                }
            })
            .buffer_unordered(max_concurrent)
            .collect()
            .await;
    results.sort_by_key(|(index, _)| *index);

    let mut scores = Vec::new();
    let mut failures = Vec::new();
    for (_, result) in results {
        match result {
            Ok(score) => scores.push(score),
            Err(failure) => failures.push(failure),
        }
    }
    (scores, failures)
}

/// Run a scoring batch: load → score (isolated per video) → persist.
///
/// Requested ids with no stored video record become failures; everything
/// else flows through [`process_videos`] and an atomic per-video upsert.
/// Re-running the same batch overwrites the same rows (idempotent).
///
/// # Errors
///
/// - [`PipelineError::Validation`] for an empty id list.
/// - [`PipelineError::CampaignNotFound`] when the campaign does not exist.
/// - [`PipelineError::Db`] when loading the batch's inputs fails.
///
/// Per-video scoring and persistence failures do NOT error; they are
/// collected into [`BatchReport::errors`].
pub async fn run_batch<T, M>(
    pool: &PgPool,
    transcript: &T,
    model: &M,
    config: &ScoringConfig,
    request: &BatchRequest,
) -> Result<BatchReport, PipelineError>
where
    T: TranscriptProvider,
    M: ScoringModel,
{
    if request.video_ids.is_empty() {
        return Err(PipelineError::Validation(
            "video_ids must not be empty".to_string(),
        ));
    }

    let campaign = adfit_db::get_campaign_by_public_id(pool, request.campaign_id)
        .await?
        .ok_or(PipelineError::CampaignNotFound(request.campaign_id))?;
    let guidance = guidance_from_campaign(&campaign);

    let stored = adfit_db::list_videos_by_ids(pool, campaign.id, &request.video_ids).await?;
    let stored_by_id: HashMap<&str, &VideoRow> =
        stored.iter().map(|v| (v.video_id.as_str(), v)).collect();

    let mut report = BatchReport::default();
    let mut to_score: Vec<VideoRow> = Vec::with_capacity(stored.len());
    for video_id in &request.video_ids {
        match stored_by_id.get(video_id.as_str()) {
            Some(row) => to_score.push((*row).clone()),
            None => report.errors.push(VideoFailure {
                video_id: video_id.clone(),
                error: "video not stored for campaign".to_string(),
            }),
        }
    }

    let (scores, failures) = process_videos(
        transcript,
        model,
        config,
        &guidance,
        &to_score,
        request.use_transcript,
        request.max_concurrent,
    )
    .await;
    report.errors.extend(failures);

    for score in scores {
        match adfit_db::upsert_video_score(pool, campaign.id, &score).await {
            Ok(row) => report.results.push(VideoScoreSummary {
                video_id: row.video_id,
                contextual_score: row.contextual_score,
                targeting_recommendation: row.targeting_recommendation,
                brand_suitability: row.brand_suitability,
                transcript_used: row.transcript_used,
            }),
            Err(e) => {
                tracing::error!(video_id = %score.video_id, error = %e, "score persistence failed");
                report.errors.push(VideoFailure {
                    video_id: score.video_id.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    report.processed = report.results.len();
    report.failed = report.errors.len();

    tracing::info!(
        campaign = %request.campaign_id,
        processed = report.processed,
        failed = report.failed,
        "scoring batch complete"
    );

    Ok(report)
}

/// Score the campaign's stored-but-unscored videos through the batch path.
///
/// # Errors
///
/// Same error surface as [`run_batch`]; an empty pending set returns an
/// empty report rather than a validation error.
pub async fn score_pending<T, M>(
    pool: &PgPool,
    transcript: &T,
    model: &M,
    config: &ScoringConfig,
    campaign_id: Uuid,
    limit: i64,
    use_transcript: bool,
    max_concurrent: usize,
) -> Result<BatchReport, PipelineError>
where
    T: TranscriptProvider,
    M: ScoringModel,
{
    let campaign = adfit_db::get_campaign_by_public_id(pool, campaign_id)
        .await?
        .ok_or(PipelineError::CampaignNotFound(campaign_id))?;

    let pending = adfit_db::list_unscored_videos(pool, campaign.id, limit).await?;
    if pending.is_empty() {
        tracing::info!(campaign = %campaign_id, "no unscored videos pending");
        return Ok(BatchReport::default());
    }

    let request = BatchRequest {
        campaign_id,
        video_ids: pending.into_iter().map(|v| v.video_id).collect(),
        use_transcript,
        max_concurrent,
    };
    run_batch(pool, transcript, model, config, &request).await
}
