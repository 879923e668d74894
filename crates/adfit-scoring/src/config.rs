//! Scoring configuration: blend weights, recommendation thresholds, bid range.
//!
//! The numbers are deliberately configuration, not code — the defaults below
//! are reasonable, not canonical. An optional YAML file overrides them:
//!
//! ```yaml
//! weights:
//!   semantic: 0.3
//!   intent: 0.25
//!   interest: 0.25
//!   emotion: 0.2
//! thresholds:
//!   strong: 0.75
//!   moderate: 0.55
//!   weak: 0.35
//! bid_range:
//!   min: 0.5
//!   max: 1.5
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ScoringConfigError;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Weights of the four sub-scores in the contextual blend. Must sum to 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BlendWeights {
    pub semantic: f64,
    pub intent: f64,
    pub interest: f64,
    pub emotion: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            semantic: 0.3,
            intent: 0.25,
            interest: 0.25,
            emotion: 0.2,
        }
    }
}

/// Ordered, non-overlapping classification thresholds on the contextual
/// score: `>= strong` → strong match, `>= moderate` → moderate match,
/// `>= weak` → weak match, else avoid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RecommendationThresholds {
    pub strong: f64,
    pub moderate: f64,
    pub weak: f64,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            strong: 0.75,
            moderate: 0.55,
            weak: 0.35,
        }
    }
}

/// Bounds of the linear contextual-score → bid-modifier mapping.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BidRange {
    pub min: f64,
    pub max: f64,
}

impl Default for BidRange {
    fn default() -> Self {
        Self { min: 0.5, max: 1.5 }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: BlendWeights,
    pub thresholds: RecommendationThresholds,
    pub bid_range: BidRange,
}

impl ScoringConfig {
    /// Validate weight, threshold, and bid-range consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringConfigError::Validation`] when the weights do not sum
    /// to 1, any weight is outside [0, 1], the thresholds are not strictly
    /// descending within (0, 1), or the bid range is inverted or negative.
    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        let w = &self.weights;
        for (name, value) in [
            ("semantic", w.semantic),
            ("intent", w.intent),
            ("interest", w.interest),
            ("emotion", w.emotion),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ScoringConfigError::Validation(format!(
                    "weight '{name}' must be in [0, 1], got {value}"
                )));
            }
        }
        let sum = w.semantic + w.intent + w.interest + w.emotion;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ScoringConfigError::Validation(format!(
                "weights must sum to 1.0, got {sum}"
            )));
        }

        let t = &self.thresholds;
        if !(t.strong > t.moderate && t.moderate > t.weak) {
            return Err(ScoringConfigError::Validation(format!(
                "thresholds must be strictly descending: strong {} > moderate {} > weak {}",
                t.strong, t.moderate, t.weak
            )));
        }
        if !(0.0 < t.weak && t.strong < 1.0) {
            return Err(ScoringConfigError::Validation(format!(
                "thresholds must lie within (0, 1): strong {}, weak {}",
                t.strong, t.weak
            )));
        }

        let b = &self.bid_range;
        if b.min < 0.0 || b.max < b.min {
            return Err(ScoringConfigError::Validation(format!(
                "bid range must satisfy 0 <= min <= max, got [{}, {}]",
                b.min, b.max
            )));
        }

        Ok(())
    }
}

/// Load and validate the scoring configuration from a YAML file, or return
/// validated defaults when `path` is `None`.
///
/// # Errors
///
/// Returns `ScoringConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_scoring_config(path: Option<&Path>) -> Result<ScoringConfig, ScoringConfigError> {
    let config = match path {
        Some(path) => {
            let content =
                std::fs::read_to_string(path).map_err(|e| ScoringConfigError::Io {
                    path: path.display().to_string(),
                    source: e,
                })?;
            serde_yaml::from_str::<ScoringConfig>(&content)?
        }
        None => ScoringConfig::default(),
    };

    config.validate()?;
    Ok(config)
}
