use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod records;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use records::{NormalizedChannel, NormalizedVideo};
pub use types::{
    BrandSafetyStatus, BrandSuitability, CampaignStatus, IntentType, KeywordSource, KeywordStatus,
    KeywordType, Sentiment, TargetingRecommendation,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Error returned when parsing a domain enum from its wire/database string.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown {kind} value: '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}
