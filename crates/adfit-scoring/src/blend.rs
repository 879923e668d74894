//! Blend the four sub-scores into the contextual score, recommendation,
//! safety classification, and bid modifier.

use adfit_core::{BrandSafetyStatus, BrandSuitability, Sentiment, TargetingRecommendation};

use crate::config::ScoringConfig;
use crate::lexicon::{REVIEW_TERMS, RISKY_TERMS};
use crate::text::{contains_term_ci, token_set};
use crate::types::SignalReport;

/// Blended scoring verdict for one video.
#[derive(Debug, Clone)]
pub struct BlendOutcome {
    pub contextual_score: f64,
    pub targeting_recommendation: TargetingRecommendation,
    pub brand_safety_status: BrandSafetyStatus,
    pub brand_suitability: BrandSuitability,
    pub suggested_bid_modifier: f64,
    pub reasoning: String,
}

/// Blend a signal report into the final verdict.
///
/// - `contextual_score` is the fixed-weight linear combination of the four
///   sub-scores (weights from config, validated to sum to 1).
/// - The recommendation follows the ordered thresholds and is monotonic in
///   the contextual score; demotions only ever cap it.
/// - A campaign guardrail term appearing in the title or description
///   (case-insensitive substring) caps the recommendation at weak match,
///   drops suitability to low, and flags safety for review. Risky-lexicon
///   tokens escalate to unsafe, which forces avoid.
/// - The bid modifier is a monotonic linear map of the contextual score onto
///   the configured range and is unaffected by demotions.
pub fn blend(
    report: &SignalReport,
    title: &str,
    description: Option<&str>,
    guardrail_terms: &[String],
    config: &ScoringConfig,
) -> BlendOutcome {
    let scores = &report.scores;
    let w = &config.weights;
    let contextual_score = (w.semantic * scores.semantic_similarity
        + w.intent * scores.intent
        + w.interest * scores.interest
        + w.emotion * scores.emotion)
        .clamp(0.0, 1.0);

    let guardrail_hit = find_guardrail_hit(title, description, guardrail_terms);
    let metadata_tokens = {
        let mut text = title.to_string();
        if let Some(description) = description {
            text.push(' ');
            text.push_str(description);
        }
        token_set(&text)
    };
    let risky_hit = RISKY_TERMS.iter().any(|t| metadata_tokens.contains(*t));
    let review_hit = REVIEW_TERMS.iter().any(|t| metadata_tokens.contains(*t));

    let brand_safety_status = if risky_hit {
        BrandSafetyStatus::Unsafe
    } else if guardrail_hit.is_some() || review_hit || report.sentiment == Sentiment::Negative {
        BrandSafetyStatus::Review
    } else {
        BrandSafetyStatus::Safe
    };

    let brand_suitability = if brand_safety_status == BrandSafetyStatus::Unsafe
        || guardrail_hit.is_some()
    {
        BrandSuitability::Low
    } else if contextual_score >= 0.75 && report.sentiment == Sentiment::Positive {
        BrandSuitability::High
    } else if contextual_score >= 0.5 {
        BrandSuitability::Medium
    } else {
        BrandSuitability::Low
    };

    let mut targeting_recommendation = classify(contextual_score, config);
    if guardrail_hit.is_some() {
        targeting_recommendation =
            targeting_recommendation.min(TargetingRecommendation::WeakMatch);
    }
    if brand_safety_status == BrandSafetyStatus::Unsafe {
        targeting_recommendation = TargetingRecommendation::Avoid;
    }

    let suggested_bid_modifier = bid_modifier(contextual_score, config);

    let reasoning = build_reasoning(
        report,
        contextual_score,
        targeting_recommendation,
        guardrail_hit.as_deref(),
    );

    BlendOutcome {
        contextual_score,
        targeting_recommendation,
        brand_safety_status,
        brand_suitability,
        suggested_bid_modifier,
        reasoning,
    }
}

/// Ordered-threshold classification; higher scores never classify weaker.
fn classify(contextual_score: f64, config: &ScoringConfig) -> TargetingRecommendation {
    let t = &config.thresholds;
    if contextual_score >= t.strong {
        TargetingRecommendation::StrongMatch
    } else if contextual_score >= t.moderate {
        TargetingRecommendation::ModerateMatch
    } else if contextual_score >= t.weak {
        TargetingRecommendation::WeakMatch
    } else {
        TargetingRecommendation::Avoid
    }
}

/// Linear map of the contextual score onto the configured bid range,
/// rounded to two decimals.
fn bid_modifier(contextual_score: f64, config: &ScoringConfig) -> f64 {
    let b = &config.bid_range;
    let raw = b.min + contextual_score * (b.max - b.min);
    (raw * 100.0).round() / 100.0
}

/// First guardrail term found in the title or description, if any.
fn find_guardrail_hit(
    title: &str,
    description: Option<&str>,
    guardrail_terms: &[String],
) -> Option<String> {
    guardrail_terms.iter().find_map(|term| {
        let in_title = contains_term_ci(title, term);
        let in_description = description.is_some_and(|d| contains_term_ci(d, term));
        (in_title || in_description).then(|| term.clone())
    })
}

/// Short justification citing the dominant sub-score(s), plus the demotion
/// cause when a guardrail term fired.
fn build_reasoning(
    report: &SignalReport,
    contextual_score: f64,
    recommendation: TargetingRecommendation,
    guardrail_hit: Option<&str>,
) -> String {
    let scores = &report.scores;
    let mut ranked = [
        ("semantic similarity", scores.semantic_similarity),
        ("intent alignment", scores.intent),
        ("interest overlap", scores.interest),
        ("emotional fit", scores.emotion),
    ];
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let confidence = if report.transcript_used {
        "transcript-backed"
    } else {
        "metadata-only"
    };
    let mut reasoning = format!(
        "Contextual score {:.2} ({confidence}) driven by {} ({:.2}) and {} ({:.2}); recommendation: {}.",
        contextual_score,
        ranked[0].0,
        ranked[0].1,
        ranked[1].0,
        ranked[1].1,
        recommendation.as_str().replace('_', " "),
    );
    if let Some(term) = guardrail_hit {
        reasoning.push_str(&format!(" Demoted: guardrail term '{term}' present."));
    }
    reasoning
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SubScores;
    use adfit_core::IntentType;

    fn report(scores: SubScores) -> SignalReport {
        SignalReport {
            scores,
            sentiment: Sentiment::Positive,
            intent_type: IntentType::Informational,
            interest_topics: vec!["drinks".to_string()],
            emotion_type: "joyful".to_string(),
            tone: "warm and conversational".to_string(),
            key_topics: vec!["summer".to_string()],
            key_entities: vec!["summer".to_string()],
            transcript_used: true,
        }
    }

    fn subscores(semantic: f64, intent: f64, interest: f64, emotion: f64) -> SubScores {
        SubScores {
            semantic_similarity: semantic,
            intent,
            interest,
            emotion,
        }
    }

    #[test]
    fn blend_is_the_documented_weighted_sum() {
        let outcome = blend(
            &report(subscores(0.8, 0.6, 0.7, 0.5)),
            "Top 5 Summer Drinks",
            None,
            &[],
            &ScoringConfig::default(),
        );
        // 0.3*0.8 + 0.25*0.6 + 0.25*0.7 + 0.2*0.5 = 0.665
        assert!(
            (outcome.contextual_score - 0.665).abs() < 1e-9,
            "expected 0.665, got {}",
            outcome.contextual_score
        );
        assert_eq!(
            outcome.targeting_recommendation,
            TargetingRecommendation::ModerateMatch
        );
    }

    #[test]
    fn blend_is_deterministic() {
        let r = report(subscores(0.8, 0.6, 0.7, 0.5));
        let config = ScoringConfig::default();
        let a = blend(&r, "Title", None, &[], &config);
        let b = blend(&r, "Title", None, &[], &config);
        assert!((a.contextual_score - b.contextual_score).abs() < f64::EPSILON);
        assert_eq!(a.targeting_recommendation, b.targeting_recommendation);
        assert_eq!(a.reasoning, b.reasoning);
    }

    #[test]
    fn recommendation_is_monotonic_in_contextual_score() {
        let config = ScoringConfig::default();
        let mut previous = TargetingRecommendation::Avoid;
        for step in 0..=100 {
            let score = f64::from(step) / 100.0;
            let current = classify(score, &config);
            assert!(
                current >= previous,
                "recommendation downgraded from {previous:?} to {current:?} at score {score}"
            );
            previous = current;
        }
    }

    #[test]
    fn threshold_boundaries_classify_upward() {
        let config = ScoringConfig::default();
        assert_eq!(classify(0.75, &config), TargetingRecommendation::StrongMatch);
        assert_eq!(classify(0.55, &config), TargetingRecommendation::ModerateMatch);
        assert_eq!(classify(0.35, &config), TargetingRecommendation::WeakMatch);
        assert_eq!(classify(0.349, &config), TargetingRecommendation::Avoid);
    }

    #[test]
    fn guardrail_term_blocks_strong_match() {
        let outcome = blend(
            &report(subscores(0.95, 0.95, 0.95, 0.95)),
            "Best whiskey cocktails for summer",
            Some("Featuring premium alcohol brands"),
            &["alcohol".to_string()],
            &ScoringConfig::default(),
        );
        assert!(
            outcome.targeting_recommendation <= TargetingRecommendation::WeakMatch,
            "guardrail hit must cap the recommendation, got {:?}",
            outcome.targeting_recommendation
        );
        assert_eq!(outcome.brand_suitability, BrandSuitability::Low);
        assert_eq!(outcome.brand_safety_status, BrandSafetyStatus::Review);
        assert!(outcome.reasoning.contains("alcohol"));
    }

    #[test]
    fn guardrail_match_is_case_insensitive_substring() {
        let outcome = blend(
            &report(subscores(0.9, 0.9, 0.9, 0.9)),
            "CRYPTO CASINO night",
            None,
            &["casino".to_string()],
            &ScoringConfig::default(),
        );
        assert_eq!(
            outcome.targeting_recommendation,
            TargetingRecommendation::WeakMatch
        );
    }

    #[test]
    fn risky_token_forces_unsafe_and_avoid() {
        let outcome = blend(
            &report(subscores(0.9, 0.9, 0.9, 0.9)),
            "Gun range unboxing",
            None,
            &[],
            &ScoringConfig::default(),
        );
        assert_eq!(outcome.brand_safety_status, BrandSafetyStatus::Unsafe);
        assert_eq!(
            outcome.targeting_recommendation,
            TargetingRecommendation::Avoid
        );
    }

    #[test]
    fn clean_high_scoring_video_gets_strong_match() {
        let outcome = blend(
            &report(subscores(0.9, 0.8, 0.85, 0.8)),
            "Summer sparkling water taste test",
            Some("We try every flavor"),
            &["alcohol".to_string()],
            &ScoringConfig::default(),
        );
        assert_eq!(
            outcome.targeting_recommendation,
            TargetingRecommendation::StrongMatch
        );
        assert_eq!(outcome.brand_safety_status, BrandSafetyStatus::Safe);
        assert_eq!(outcome.brand_suitability, BrandSuitability::High);
    }

    #[test]
    fn bid_modifier_is_monotonic_and_bounded() {
        let config = ScoringConfig::default();
        let mut previous = f64::MIN;
        for step in 0..=20 {
            let score = f64::from(step) / 20.0;
            let bid = bid_modifier(score, &config);
            assert!(bid >= previous, "bid decreased at score {score}");
            assert!(
                (config.bid_range.min..=config.bid_range.max).contains(&bid),
                "bid {bid} outside configured range"
            );
            previous = bid;
        }
        assert!((bid_modifier(0.0, &config) - 0.5).abs() < 1e-9);
        assert!((bid_modifier(1.0, &config) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn demotion_does_not_change_bid_modifier() {
        let config = ScoringConfig::default();
        let clean = blend(
            &report(subscores(0.9, 0.9, 0.9, 0.9)),
            "Summer drinks",
            None,
            &[],
            &config,
        );
        let demoted = blend(
            &report(subscores(0.9, 0.9, 0.9, 0.9)),
            "Summer drinks with alcohol",
            None,
            &["alcohol".to_string()],
            &config,
        );
        assert!((clean.suggested_bid_modifier - demoted.suggested_bid_modifier).abs() < 1e-9);
    }

    #[test]
    fn reasoning_cites_dominant_subscores() {
        let outcome = blend(
            &report(subscores(0.9, 0.2, 0.8, 0.1)),
            "Title",
            None,
            &[],
            &ScoringConfig::default(),
        );
        assert!(outcome.reasoning.contains("semantic similarity"));
        assert!(outcome.reasoning.contains("interest overlap"));
        assert!(outcome.reasoning.contains("transcript-backed"));
    }

    #[test]
    fn metadata_only_reports_are_labelled_in_reasoning() {
        let mut r = report(subscores(0.5, 0.5, 0.5, 0.5));
        r.transcript_used = false;
        let outcome = blend(&r, "Title", None, &[], &ScoringConfig::default());
        assert!(outcome.reasoning.contains("metadata-only"));
    }

    #[test]
    fn negative_sentiment_flags_review_without_demotion_to_avoid() {
        let mut r = report(subscores(0.8, 0.8, 0.8, 0.8));
        r.sentiment = Sentiment::Negative;
        let outcome = blend(&r, "Honest critique", None, &[], &ScoringConfig::default());
        assert_eq!(outcome.brand_safety_status, BrandSafetyStatus::Review);
        assert_eq!(
            outcome.targeting_recommendation,
            TargetingRecommendation::StrongMatch,
            "review status alone must not cap the recommendation"
        );
    }
}
