//! Scoring input/output types.

use serde::{Deserialize, Serialize};

use adfit_core::{IntentType, Sentiment};

/// A campaign may declare at most this many emotion guidance tags; extras
/// are ignored rather than rejected.
pub const MAX_EMOTION_GUIDANCE_TAGS: usize = 5;

/// The campaign-side guidance the scorer compares video text against.
///
/// Assembled from the campaign record by the pipeline; the scorer never
/// touches the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignGuidance {
    pub name: String,
    pub brand_name: String,
    pub product_category: String,
    pub campaign_goal: String,
    pub campaign_definition: String,
    pub brand_context_text: Option<String>,
    pub audience_intent: Option<String>,
    pub audience_persona: Option<String>,
    pub tone_profile: Option<String>,
    pub emotion_guidance: Vec<String>,
    pub interest_guidance: Vec<String>,
    pub guardrail_terms: Vec<String>,
    pub primary_language: Option<String>,
}

impl CampaignGuidance {
    /// All campaign-side text concatenated for similarity comparison.
    #[must_use]
    pub fn campaign_text(&self) -> String {
        let mut parts: Vec<&str> = vec![
            &self.name,
            &self.brand_name,
            &self.product_category,
            &self.campaign_goal,
            &self.campaign_definition,
        ];
        if let Some(context) = self.brand_context_text.as_deref() {
            parts.push(context);
        }
        if let Some(persona) = self.audience_persona.as_deref() {
            parts.push(persona);
        }
        parts.join(" ")
    }

    /// Declared emotion tags, capped at [`MAX_EMOTION_GUIDANCE_TAGS`].
    #[must_use]
    pub fn emotion_tags(&self) -> &[String] {
        let cap = self.emotion_guidance.len().min(MAX_EMOTION_GUIDANCE_TAGS);
        &self.emotion_guidance[..cap]
    }
}

/// The video-side text a score is computed from.
///
/// The transcript branch is a distinct variant rather than an optional field
/// so the metadata-only fallback path is explicit and testable in isolation.
#[derive(Debug, Clone)]
pub enum ScoringInput {
    WithTranscript {
        title: String,
        description: Option<String>,
        tags: Vec<String>,
        transcript: String,
    },
    MetadataOnly {
        title: String,
        description: Option<String>,
        tags: Vec<String>,
    },
}

impl ScoringInput {
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            ScoringInput::WithTranscript { title, .. }
            | ScoringInput::MetadataOnly { title, .. } => title,
        }
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match self {
            ScoringInput::WithTranscript { description, .. }
            | ScoringInput::MetadataOnly { description, .. } => description.as_deref(),
        }
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        match self {
            ScoringInput::WithTranscript { tags, .. }
            | ScoringInput::MetadataOnly { tags, .. } => tags,
        }
    }

    #[must_use]
    pub fn transcript_used(&self) -> bool {
        matches!(self, ScoringInput::WithTranscript { .. })
    }

    /// Title + description + tags, always available.
    #[must_use]
    pub fn metadata_text(&self) -> String {
        let mut parts = vec![self.title().to_string()];
        if let Some(description) = self.description() {
            parts.push(description.to_string());
        }
        parts.push(self.tags().join(" "));
        parts.join(" ")
    }

    /// The best text available: metadata enriched by the transcript when
    /// one was acquired.
    #[must_use]
    pub fn scoring_text(&self) -> String {
        match self {
            ScoringInput::WithTranscript { transcript, .. } => {
                format!("{} {transcript}", self.metadata_text())
            }
            ScoringInput::MetadataOnly { .. } => self.metadata_text(),
        }
    }
}

/// The four independent sub-scores, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub semantic_similarity: f64,
    pub intent: f64,
    pub interest: f64,
    pub emotion: f64,
}

/// Full classification output of a scoring model for one video.
#[derive(Debug, Clone)]
pub struct SignalReport {
    pub scores: SubScores,
    pub sentiment: Sentiment,
    pub intent_type: IntentType,
    /// Interest clusters from the campaign guidance that matched (≤3), or
    /// tag/token fallbacks when no guidance is declared.
    pub interest_topics: Vec<String>,
    /// One of [`crate::lexicon::EMOTION_OPTIONS`].
    pub emotion_type: String,
    pub tone: String,
    pub key_topics: Vec<String>,
    pub key_entities: Vec<String>,
    /// Whether the transcript path produced this report; metadata-only
    /// reports are lower-confidence by construction.
    pub transcript_used: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emotion_tags_are_capped_at_five() {
        let guidance = CampaignGuidance {
            emotion_guidance: (0..8).map(|i| format!("tag{i}")).collect(),
            ..CampaignGuidance::default()
        };
        assert_eq!(guidance.emotion_tags().len(), 5);
    }

    #[test]
    fn scoring_text_includes_transcript_when_present() {
        let input = ScoringInput::WithTranscript {
            title: "Title".to_string(),
            description: Some("Desc".to_string()),
            tags: vec!["tag".to_string()],
            transcript: "spoken words".to_string(),
        };
        let text = input.scoring_text();
        assert!(text.contains("Title"));
        assert!(text.contains("spoken words"));
        assert!(input.transcript_used());
    }

    #[test]
    fn metadata_only_scoring_text_has_no_transcript() {
        let input = ScoringInput::MetadataOnly {
            title: "Title".to_string(),
            description: None,
            tags: vec![],
        };
        assert_eq!(input.scoring_text().trim(), "Title");
        assert!(!input.transcript_used());
    }
}
