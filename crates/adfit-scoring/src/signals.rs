//! Deterministic heuristic analysis producing the four sub-scores and the
//! discrete classification evidence.
//!
//! Identical guidance + identical input text always yields the identical
//! report: no randomness, no wall-clock reads, ordered set iteration.

use std::collections::BTreeSet;

use adfit_core::{IntentType, Sentiment};

use crate::lexicon::{
    ANALYTICAL_TERMS, CALM_TERMS, COMMERCIAL_TERMS, INFORMATIONAL_TERMS, INTENT_TERMS,
    LAUNCH_TERMS, LEARNING_TERMS, NEGATIVE_TERMS, NOSTALGIA_TERMS, POSITIVE_TERMS, PROMO_TERMS,
    TONE_ANALYTICAL, TONE_CALM, TONE_CRITICAL, TONE_DEFAULT, TONE_ENTHUSIASTIC, TONE_NOSTALGIC,
    TONE_URGENT, TONE_WARM,
};
use crate::text::{jaccard, token_set, tokenize};
use crate::types::{CampaignGuidance, ScoringInput, SignalReport, SubScores};

/// Confidence damping applied to text-derived sub-scores when no transcript
/// is available. Metadata alone is a weaker signal; the damped path is
/// marked via `transcript_used = false` on the report.
pub const METADATA_ONLY_DAMPING: f64 = 0.85;

/// Run the full heuristic analysis for one video.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn analyze(guidance: &CampaignGuidance, input: &ScoringInput) -> SignalReport {
    let video_tokens = tokenize(&input.scoring_text());
    let video_set: BTreeSet<String> = video_tokens.iter().cloned().collect();
    let campaign_set = token_set(&guidance.campaign_text());

    let semantic = jaccard(&video_set, &campaign_set);

    // Intent: lexicon hits plus audience-intent guidance overlap, anchored
    // on the semantic baseline.
    let lexicon_hits = count_matches(&video_set, INTENT_TERMS);
    let guidance_hits = guidance
        .audience_intent
        .as_deref()
        .map(|text| token_set(text).intersection(&video_set).count())
        .unwrap_or(0);
    let intent = (0.35 + 0.1 * lexicon_hits as f64 + 0.1 * guidance_hits as f64 + 0.4 * semantic)
        .min(1.0);

    // Interest: which declared clusters does the video text touch?
    let matched_clusters: Vec<String> = guidance
        .interest_guidance
        .iter()
        .filter(|cluster| {
            let cluster_set = token_set(cluster);
            !cluster_set.is_empty() && cluster_set.intersection(&video_set).next().is_some()
        })
        .cloned()
        .collect();
    let cluster_ratio = if guidance.interest_guidance.is_empty() {
        0.0
    } else {
        matched_clusters.len() as f64 / guidance.interest_guidance.len() as f64
    };
    let tag_bonus = (input.tags().len() as f64 * 0.02).min(0.25);
    let interest = (0.1 + 0.5 * semantic + 0.3 * cluster_ratio + tag_bonus).min(1.0);

    let interest_topics = if matched_clusters.is_empty() {
        fallback_topics(input)
    } else {
        matched_clusters.into_iter().take(3).collect()
    };

    // Emotion: lexicon polarity, then alignment against declared tags.
    let positive_hits = video_tokens
        .iter()
        .filter(|t| POSITIVE_TERMS.contains(&t.as_str()))
        .count();
    let negative_hits = video_tokens
        .iter()
        .filter(|t| NEGATIVE_TERMS.contains(&t.as_str()))
        .count();
    let total_hits = (positive_hits + negative_hits).max(1);
    let emotion_base =
        ((positive_hits as f64 + 1.0) / (total_hits as f64 + 1.0)).clamp(0.1, 1.0);

    let sentiment = if positive_hits > negative_hits + 1 {
        Sentiment::Positive
    } else if negative_hits > positive_hits + 1 {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    };

    let emotion_type = infer_emotion_type(sentiment, &video_set);
    let emotion = align_emotion(emotion_base, &emotion_type, guidance);

    let tone = infer_tone(sentiment, &video_set);
    let intent_type = infer_intent_type(&video_set);

    let key_topics = key_topics(&video_set, &campaign_set, input);
    let key_entities = key_entities(input, &key_topics);

    let transcript_used = input.transcript_used();
    let damping = if transcript_used {
        1.0
    } else {
        METADATA_ONLY_DAMPING
    };

    SignalReport {
        scores: SubScores {
            semantic_similarity: round3(semantic * damping),
            intent: round3(intent * damping),
            interest: round3(interest * damping),
            emotion: round3(emotion),
        },
        sentiment,
        intent_type,
        interest_topics,
        emotion_type,
        tone,
        key_topics,
        key_entities,
        transcript_used,
    }
}

fn count_matches(tokens: &BTreeSet<String>, terms: &[&str]) -> usize {
    terms.iter().filter(|t| tokens.contains(**t)).count()
}

fn has_any(tokens: &BTreeSet<String>, terms: &[&str]) -> bool {
    terms.iter().any(|t| tokens.contains(*t))
}

fn round3(value: f64) -> f64 {
    (value.clamp(0.0, 1.0) * 1000.0).round() / 1000.0
}

/// Boost the base emotion score when the inferred emotion matches a declared
/// guidance tag, damp it when guidance exists but does not match.
fn align_emotion(base: f64, emotion_type: &str, guidance: &CampaignGuidance) -> f64 {
    let tags = guidance.emotion_tags();
    if tags.is_empty() {
        return base;
    }
    let aligned = tags
        .iter()
        .any(|tag| tag.trim().eq_ignore_ascii_case(emotion_type));
    if aligned {
        (base + 0.25).min(1.0)
    } else {
        (base * 0.5).max(0.05)
    }
}

fn infer_emotion_type(sentiment: Sentiment, tokens: &BTreeSet<String>) -> String {
    if sentiment == Sentiment::Negative {
        return "critical".to_string();
    }
    for (emotion, terms) in [
        ("excited", LAUNCH_TERMS),
        ("persuasive", PROMO_TERMS),
        ("inspired", LEARNING_TERMS),
        ("nostalgic", NOSTALGIA_TERMS),
        ("calm", CALM_TERMS),
        ("serious", ANALYTICAL_TERMS),
    ] {
        if has_any(tokens, terms) {
            return emotion.to_string();
        }
    }
    if sentiment == Sentiment::Positive {
        return "joyful".to_string();
    }
    "neutral".to_string()
}

fn infer_tone(sentiment: Sentiment, tokens: &BTreeSet<String>) -> String {
    for (tone, terms) in [
        (TONE_ENTHUSIASTIC, LAUNCH_TERMS),
        (TONE_URGENT, PROMO_TERMS),
        (TONE_ANALYTICAL, ANALYTICAL_TERMS),
        (TONE_NOSTALGIC, NOSTALGIA_TERMS),
        (TONE_CALM, CALM_TERMS),
    ] {
        if has_any(tokens, terms) {
            return tone.to_string();
        }
    }
    if sentiment == Sentiment::Negative {
        return TONE_CRITICAL.to_string();
    }
    if has_any(tokens, LEARNING_TERMS) {
        return TONE_WARM.to_string();
    }
    TONE_DEFAULT.to_string()
}

fn infer_intent_type(tokens: &BTreeSet<String>) -> IntentType {
    if has_any(tokens, COMMERCIAL_TERMS) {
        IntentType::Commercial
    } else if has_any(tokens, INFORMATIONAL_TERMS) {
        IntentType::Informational
    } else {
        IntentType::Entertainment
    }
}

/// Interest-topic fallback when no declared cluster matched: declared tags
/// first (≤3), otherwise the first distinctive title tokens (deduplicated).
fn fallback_topics(input: &ScoringInput) -> Vec<String> {
    if !input.tags().is_empty() {
        return input.tags().iter().take(3).cloned().collect();
    }
    let mut topics: Vec<String> = Vec::new();
    for token in tokenize(input.title()).into_iter().take(3) {
        if !topics.contains(&token) {
            topics.push(token);
        }
    }
    topics
}

/// Campaign/video token overlap, longest terms first; tag fallback keeps the
/// evidence list non-empty for videos with no overlap.
fn key_topics(
    video_set: &BTreeSet<String>,
    campaign_set: &BTreeSet<String>,
    input: &ScoringInput,
) -> Vec<String> {
    let mut overlap: Vec<String> = video_set.intersection(campaign_set).cloned().collect();
    overlap.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    overlap.truncate(5);
    if !overlap.is_empty() {
        return overlap;
    }
    if !input.tags().is_empty() {
        return input.tags().iter().take(5).cloned().collect();
    }
    video_set.iter().take(5).cloned().collect()
}

/// First distinctive title tokens, used as entity evidence.
fn key_entities(input: &ScoringInput, key_topics: &[String]) -> Vec<String> {
    let mut entities: Vec<String> = Vec::new();
    for token in tokenize(input.title()) {
        if token.len() > 3 && !entities.contains(&token) {
            entities.push(token);
        }
        if entities.len() == 3 {
            break;
        }
    }
    if entities.is_empty() {
        entities = key_topics.iter().take(3).cloned().collect();
    }
    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guidance() -> CampaignGuidance {
        CampaignGuidance {
            name: "Summer Launch".to_string(),
            brand_name: "Acme Sparkling".to_string(),
            product_category: "sparkling water".to_string(),
            campaign_goal: "awareness".to_string(),
            campaign_definition: "Introduce the new sparkling water line to summer audiences"
                .to_string(),
            brand_context_text: None,
            audience_intent: Some("find refreshing summer drink recommendations".to_string()),
            audience_persona: None,
            tone_profile: None,
            emotion_guidance: vec!["joyful".to_string(), "excited".to_string()],
            interest_guidance: vec![
                "summer recipes".to_string(),
                "outdoor living".to_string(),
            ],
            guardrail_terms: vec!["alcohol".to_string()],
            primary_language: Some("en".to_string()),
        }
    }

    fn matching_input() -> ScoringInput {
        ScoringInput::WithTranscript {
            title: "Top 5 Refreshing Summer Drinks".to_string(),
            description: Some("Our guide to sparkling water and summer recipes".to_string()),
            tags: vec!["summer".to_string(), "drinks".to_string()],
            transcript: "today we review the best sparkling water for refreshing summer days"
                .to_string(),
        }
    }

    #[test]
    fn analysis_is_deterministic() {
        let g = guidance();
        let input = matching_input();
        let a = analyze(&g, &input);
        let b = analyze(&g, &input);
        assert_eq!(a.scores, b.scores);
        assert_eq!(a.interest_topics, b.interest_topics);
        assert_eq!(a.key_topics, b.key_topics);
        assert_eq!(a.emotion_type, b.emotion_type);
        assert_eq!(a.tone, b.tone);
    }

    #[test]
    fn all_scores_stay_in_unit_interval() {
        let g = guidance();
        for input in [
            matching_input(),
            ScoringInput::MetadataOnly {
                title: String::new(),
                description: None,
                tags: vec![],
            },
            ScoringInput::MetadataOnly {
                title: "completely unrelated quantum chromodynamics lecture".to_string(),
                description: None,
                tags: (0..40).map(|i| format!("tag{i}")).collect(),
            },
        ] {
            let report = analyze(&g, &input);
            for score in [
                report.scores.semantic_similarity,
                report.scores.intent,
                report.scores.interest,
                report.scores.emotion,
            ] {
                assert!((0.0..=1.0).contains(&score), "score out of range: {score}");
            }
        }
    }

    #[test]
    fn related_video_scores_higher_than_unrelated() {
        let g = guidance();
        let related = analyze(&g, &matching_input());
        let unrelated = analyze(
            &g,
            &ScoringInput::WithTranscript {
                title: "Engine teardown gone wrong".to_string(),
                description: Some("rust removal on a diesel block".to_string()),
                tags: vec![],
                transcript: "we pull the crankshaft and inspect the bearings".to_string(),
            },
        );
        assert!(
            related.scores.semantic_similarity > unrelated.scores.semantic_similarity,
            "related {} should beat unrelated {}",
            related.scores.semantic_similarity,
            unrelated.scores.semantic_similarity
        );
    }

    #[test]
    fn metadata_only_path_is_damped_and_marked() {
        let g = guidance();
        let with = analyze(
            &g,
            &ScoringInput::WithTranscript {
                title: "Summer sparkling water guide".to_string(),
                description: None,
                tags: vec![],
                // Empty transcript text: same effective text as metadata-only.
                transcript: String::new(),
            },
        );
        let without = analyze(
            &g,
            &ScoringInput::MetadataOnly {
                title: "Summer sparkling water guide".to_string(),
                description: None,
                tags: vec![],
            },
        );

        assert!(with.transcript_used);
        assert!(!without.transcript_used);
        assert!(
            without.scores.semantic_similarity <= with.scores.semantic_similarity,
            "metadata-only semantic must not exceed transcript path"
        );
        assert!(without.scores.intent < with.scores.intent);
    }

    #[test]
    fn interest_topics_come_from_matched_clusters() {
        let report = analyze(&guidance(), &matching_input());
        assert!(
            report
                .interest_topics
                .contains(&"summer recipes".to_string()),
            "expected matched cluster, got {:?}",
            report.interest_topics
        );
        assert!(report.interest_topics.len() <= 3);
    }

    #[test]
    fn interest_topics_fall_back_to_tags_without_guidance() {
        let mut g = guidance();
        g.interest_guidance.clear();
        let report = analyze(&g, &matching_input());
        assert_eq!(report.interest_topics, vec!["summer", "drinks"]);
    }

    #[test]
    fn negative_text_classifies_as_critical() {
        let report = analyze(
            &guidance(),
            &ScoringInput::MetadataOnly {
                title: "worst drink fail disaster".to_string(),
                description: Some("a tragic problem with a bad product".to_string()),
                tags: vec![],
            },
        );
        assert_eq!(report.sentiment, Sentiment::Negative);
        assert_eq!(report.emotion_type, "critical");
        assert_eq!(report.tone, "critical and candid");
    }

    #[test]
    fn emotion_alignment_with_guidance_boosts_score() {
        let g = guidance(); // declares joyful + excited
        let aligned = analyze(
            &g,
            &ScoringInput::MetadataOnly {
                title: "Launch event live unboxing".to_string(),
                description: None,
                tags: vec![],
            },
        );
        assert_eq!(aligned.emotion_type, "excited");

        let mut no_guidance = g.clone();
        no_guidance.emotion_guidance.clear();
        let baseline = analyze(
            &no_guidance,
            &ScoringInput::MetadataOnly {
                title: "Launch event live unboxing".to_string(),
                description: None,
                tags: vec![],
            },
        );
        assert!(
            aligned.scores.emotion > baseline.scores.emotion,
            "aligned emotion {} should exceed baseline {}",
            aligned.scores.emotion,
            baseline.scores.emotion
        );
    }

    #[test]
    fn commercial_tokens_classify_intent_type() {
        let report = analyze(
            &guidance(),
            &ScoringInput::MetadataOnly {
                title: "best price deal buy now".to_string(),
                description: None,
                tags: vec![],
            },
        );
        assert_eq!(report.intent_type, adfit_core::IntentType::Commercial);
    }

    #[test]
    fn emotion_guidance_beyond_five_tags_is_ignored() {
        let mut g = guidance();
        // Tags 6..8 include the one that would align; it must be ignored.
        g.emotion_guidance = vec![
            "calm".to_string(),
            "serious".to_string(),
            "nostalgic".to_string(),
            "critical".to_string(),
            "persuasive".to_string(),
            "excited".to_string(),
        ];
        let report = analyze(
            &g,
            &ScoringInput::MetadataOnly {
                title: "Launch event live unboxing".to_string(),
                description: None,
                tags: vec![],
            },
        );
        assert_eq!(report.emotion_type, "excited");
        // Not aligned within the first five tags → damped below the 0.5 base.
        assert!(
            report.scores.emotion < 0.5,
            "expected damped emotion, got {}",
            report.scores.emotion
        );
    }
}
