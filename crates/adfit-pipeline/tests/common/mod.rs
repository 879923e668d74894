//! Deterministic provider fakes shared by the pipeline test binaries.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;

use adfit_core::{NormalizedChannel, NormalizedVideo};
use adfit_db::VideoRow;
use adfit_pipeline::{MetadataProvider, SearchProvider, TranscriptProvider};
use adfit_scoring::{CampaignGuidance, HeuristicModel, ModelError, ScoringInput, ScoringModel, SignalReport};
use adfit_transcript::Transcript;
use adfit_youtube::{SearchFilters, SearchHits, YoutubeError};

/// Search fake: fixed result lists per keyword, with designated failures.
#[derive(Default)]
pub struct FakeSearch {
    pub results: HashMap<String, Vec<String>>,
    pub failing: HashSet<String>,
}

#[async_trait]
impl SearchProvider for FakeSearch {
    async fn search(
        &self,
        keyword: &str,
        _filters: &SearchFilters,
    ) -> Result<SearchHits, YoutubeError> {
        if self.failing.contains(keyword) {
            return Err(YoutubeError::ApiError {
                status: 500,
                message: "backend unavailable".to_string(),
            });
        }
        Ok(SearchHits {
            video_ids: self.results.get(keyword).cloned().unwrap_or_default(),
            channel_ids: Vec::new(),
        })
    }
}

/// Metadata fake: synthesizes stable records from the requested ids.
pub struct FakeMetadata;

#[async_trait]
impl MetadataProvider for FakeMetadata {
    async fn fetch_videos(
        &self,
        ids: &[String],
    ) -> Result<(Vec<NormalizedVideo>, u64), YoutubeError> {
        let videos = ids.iter().map(|id| make_normalized_video(id)).collect();
        Ok((videos, 1))
    }

    async fn fetch_channels(
        &self,
        ids: &[String],
    ) -> Result<(Vec<NormalizedChannel>, u64), YoutubeError> {
        let channels = ids
            .iter()
            .map(|id| NormalizedChannel {
                channel_id: id.clone(),
                title: format!("Channel {id}"),
                description: None,
                country: Some("US".to_string()),
                published_at: None,
                thumbnail_url: None,
                subscriber_count: Some(10_000),
                view_count: Some(500_000),
                video_count: Some(50),
            })
            .collect();
        Ok((channels, 1))
    }
}

/// Transcript fake backed by a fixed map; everything else is unavailable.
#[derive(Default)]
pub struct FakeTranscript {
    pub transcripts: HashMap<String, String>,
}

#[async_trait]
impl TranscriptProvider for FakeTranscript {
    async fn acquire(&self, video_id: &str, _languages: &[String]) -> Transcript {
        match self.transcripts.get(video_id) {
            Some(text) => Transcript::Available {
                text: text.clone(),
                language: Some("en".to_string()),
            },
            None => Transcript::Unavailable,
        }
    }
}

/// Model fake: heuristic scoring, but videos whose title carries the
/// `[fail]` marker error like a timed-out provider.
pub struct FlakyModel;

#[async_trait]
impl ScoringModel for FlakyModel {
    async fn classify(
        &self,
        guidance: &CampaignGuidance,
        input: &ScoringInput,
    ) -> Result<SignalReport, ModelError> {
        if input.title().contains("[fail]") {
            return Err(ModelError::Provider("model timeout".to_string()));
        }
        HeuristicModel.classify(guidance, input).await
    }
}

pub fn make_normalized_video(video_id: &str) -> NormalizedVideo {
    NormalizedVideo {
        video_id: video_id.to_string(),
        channel_id: "UC-fake".to_string(),
        title: format!("Video {video_id}"),
        description: Some("summer sparkling water review".to_string()),
        channel_title: Some("Fake Channel".to_string()),
        tags: vec!["summer".to_string()],
        category: None,
        duration: Some("PT3M".to_string()),
        published_at: None,
        view_count: 100,
        like_count: 10,
        comment_count: 2,
        channel_subscriber_count: None,
        channel_view_count: None,
        thumbnail_url: None,
    }
}

pub fn make_video_row(id: i64, video_id: &str, title: &str) -> VideoRow {
    VideoRow {
        id,
        campaign_id: 1,
        video_id: video_id.to_string(),
        channel_id: "UC-fake".to_string(),
        title: title.to_string(),
        description: Some("summer sparkling water review".to_string()),
        channel_title: Some("Fake Channel".to_string()),
        tags: serde_json::json!(["summer"]),
        category: None,
        duration: None,
        published_at: None,
        view_count: 100,
        like_count: 10,
        comment_count: 2,
        channel_subscriber_count: None,
        channel_view_count: None,
        thumbnail_url: None,
        fetched_at: Utc::now(),
    }
}

pub fn test_guidance() -> CampaignGuidance {
    CampaignGuidance {
        name: "Summer Launch".to_string(),
        brand_name: "Acme Sparkling".to_string(),
        product_category: "sparkling water".to_string(),
        campaign_goal: "awareness".to_string(),
        campaign_definition: "Introduce the sparkling water line".to_string(),
        brand_context_text: None,
        audience_intent: Some("find refreshing summer drinks".to_string()),
        audience_persona: None,
        tone_profile: None,
        emotion_guidance: vec!["joyful".to_string()],
        interest_guidance: vec!["summer recipes".to_string()],
        guardrail_terms: vec!["alcohol".to_string()],
        primary_language: Some("en".to_string()),
    }
}
