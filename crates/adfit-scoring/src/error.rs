use thiserror::Error;

/// Errors loading or validating the scoring configuration file.
#[derive(Debug, Error)]
pub enum ScoringConfigError {
    #[error("failed to read scoring config at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scoring config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid scoring config: {0}")]
    Validation(String),
}

/// Errors surfaced by a [`crate::ScoringModel`] implementation.
///
/// The built-in heuristic model never fails; remote model implementations map
/// their transport/provider failures here so the batch orchestrator can
/// record them per video.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("scoring model provider error: {0}")]
    Provider(String),
}
