//! The scoring-model capability seam.
//!
//! The pipeline treats classification as a capability: the built-in
//! [`HeuristicModel`] is a pure local function, and a remote model (LLM or
//! embedding service) can implement the same trait without touching the
//! orchestration code.

use async_trait::async_trait;

use crate::error::ModelError;
use crate::signals;
use crate::types::{CampaignGuidance, ScoringInput, SignalReport};

#[async_trait]
pub trait ScoringModel: Send + Sync {
    /// Classify one video's text against the campaign guidance.
    ///
    /// Implementations must be deterministic for identical inputs and model
    /// version — repeat calls may not drift.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] when a remote provider fails; the local
    /// heuristic model never errors.
    async fn classify(
        &self,
        guidance: &CampaignGuidance,
        input: &ScoringInput,
    ) -> Result<SignalReport, ModelError>;
}

/// The documented deterministic scoring mode: pure lexicon/overlap
/// heuristics, no network, no randomness.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicModel;

#[async_trait]
impl ScoringModel for HeuristicModel {
    async fn classify(
        &self,
        guidance: &CampaignGuidance,
        input: &ScoringInput,
    ) -> Result<SignalReport, ModelError> {
        Ok(signals::analyze(guidance, input))
    }
}
