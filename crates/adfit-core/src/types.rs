//! Domain enums shared across the discovery and scoring crates.
//!
//! Database rows store these as lowercase strings (the same convention the
//! rest of the stack uses for status columns); `as_str`/`FromStr` are the
//! only conversion points.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Draft,
    Active,
    Paused,
    Completed,
}

impl CampaignStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CampaignStatus::Draft => "draft",
            CampaignStatus::Active => "active",
            CampaignStatus::Paused => "paused",
            CampaignStatus::Completed => "completed",
        }
    }
}

impl FromStr for CampaignStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(CampaignStatus::Draft),
            "active" => Ok(CampaignStatus::Active),
            "paused" => Ok(CampaignStatus::Paused),
            "completed" => Ok(CampaignStatus::Completed),
            other => Err(CoreError::UnknownVariant {
                kind: "campaign status",
                value: other.to_string(),
            }),
        }
    }
}

/// Keyword bucket used by the rotation scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeywordType {
    #[serde(rename = "core")]
    Core,
    #[serde(rename = "long-tail")]
    LongTail,
    #[serde(rename = "related")]
    Related,
    #[serde(rename = "intent-based")]
    IntentBased,
}

impl KeywordType {
    /// Stable bucket ordering used when allocating rotation slots.
    pub const ALL: [KeywordType; 4] = [
        KeywordType::Core,
        KeywordType::LongTail,
        KeywordType::Related,
        KeywordType::IntentBased,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            KeywordType::Core => "core",
            KeywordType::LongTail => "long-tail",
            KeywordType::Related => "related",
            KeywordType::IntentBased => "intent-based",
        }
    }
}

impl FromStr for KeywordType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "core" => Ok(KeywordType::Core),
            "long-tail" => Ok(KeywordType::LongTail),
            "related" => Ok(KeywordType::Related),
            "intent-based" => Ok(KeywordType::IntentBased),
            other => Err(CoreError::UnknownVariant {
                kind: "keyword type",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordStatus {
    Active,
    Inactive,
}

impl KeywordStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            KeywordStatus::Active => "active",
            KeywordStatus::Inactive => "inactive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeywordSource {
    #[serde(rename = "ai-generated")]
    AiGenerated,
    #[serde(rename = "manual")]
    Manual,
}

impl KeywordSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            KeywordSource::AiGenerated => "ai-generated",
            KeywordSource::Manual => "manual",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrandSafetyStatus {
    Safe,
    Review,
    Unsafe,
}

impl BrandSafetyStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BrandSafetyStatus::Safe => "safe",
            BrandSafetyStatus::Review => "review",
            BrandSafetyStatus::Unsafe => "unsafe",
        }
    }
}

impl FromStr for BrandSafetyStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "safe" => Ok(BrandSafetyStatus::Safe),
            "review" => Ok(BrandSafetyStatus::Review),
            "unsafe" => Ok(BrandSafetyStatus::Unsafe),
            other => Err(CoreError::UnknownVariant {
                kind: "brand safety status",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrandSuitability {
    Low,
    Medium,
    High,
}

impl BrandSuitability {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BrandSuitability::Low => "low",
            BrandSuitability::Medium => "medium",
            BrandSuitability::High => "high",
        }
    }
}

impl FromStr for BrandSuitability {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(BrandSuitability::Low),
            "medium" => Ok(BrandSuitability::Medium),
            "high" => Ok(BrandSuitability::High),
            other => Err(CoreError::UnknownVariant {
                kind: "brand suitability",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl FromStr for Sentiment {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            other => Err(CoreError::UnknownVariant {
                kind: "sentiment",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentType {
    Commercial,
    Informational,
    Entertainment,
}

impl IntentType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            IntentType::Commercial => "commercial",
            IntentType::Informational => "informational",
            IntentType::Entertainment => "entertainment",
        }
    }
}

/// Discrete targeting classification derived from the contextual score.
///
/// Variant order is weakest-to-strongest so `Ord` comparisons express
/// recommendation strength; demotions are `min` operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetingRecommendation {
    Avoid,
    WeakMatch,
    ModerateMatch,
    StrongMatch,
}

impl TargetingRecommendation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TargetingRecommendation::Avoid => "avoid",
            TargetingRecommendation::WeakMatch => "weak_match",
            TargetingRecommendation::ModerateMatch => "moderate_match",
            TargetingRecommendation::StrongMatch => "strong_match",
        }
    }
}

impl FromStr for TargetingRecommendation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "avoid" => Ok(TargetingRecommendation::Avoid),
            "weak_match" => Ok(TargetingRecommendation::WeakMatch),
            "moderate_match" => Ok(TargetingRecommendation::ModerateMatch),
            "strong_match" => Ok(TargetingRecommendation::StrongMatch),
            other => Err(CoreError::UnknownVariant {
                kind: "targeting recommendation",
                value: other.to_string(),
            }),
        }
    }
}
