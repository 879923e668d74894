//! Term lexicons for the heuristic scoring model.
//!
//! Single lowercase words matched against tokenized video text. These are
//! tuning surfaces, not ground truth — the blend only promises determinism
//! and monotonicity, not semantic accuracy.

/// Tokens that read as positive engagement signals.
pub(crate) const POSITIVE_TERMS: &[&str] = &[
    "best",
    "ultimate",
    "win",
    "exciting",
    "innovative",
    "amazing",
    "love",
    "top",
    "guide",
    "review",
    "how",
];

/// Tokens that read as negative signals.
pub(crate) const NEGATIVE_TERMS: &[&str] = &[
    "hate",
    "worst",
    "fail",
    "angry",
    "problem",
    "bad",
    "tragic",
    "disaster",
    "break",
    "complaint",
];

/// Tokens that force an `unsafe` brand-safety classification.
pub(crate) const RISKY_TERMS: &[&str] = &[
    "violence",
    "fight",
    "gun",
    "weapon",
    "leak",
    "politics",
    "nsfw",
    "accident",
    "gambling",
    "adult",
    "hate",
];

/// Tokens that flag a video for manual review.
pub(crate) const REVIEW_TERMS: &[&str] = &["prank", "drama", "controversy"];

/// Tokens signalling audience intent (research, comparison, purchase).
pub(crate) const INTENT_TERMS: &[&str] =
    &["how", "review", "guide", "tutorial", "tips", "versus", "compare"];

/// Tokens signalling commercial intent specifically.
pub(crate) const COMMERCIAL_TERMS: &[&str] = &["buy", "deal", "sale", "price", "review", "vs"];

/// Tokens signalling informational intent.
pub(crate) const INFORMATIONAL_TERMS: &[&str] = &["how", "guide", "tips", "tutorial"];

// Shared trigger groups feeding both emotion and tone inference.
pub(crate) const LAUNCH_TERMS: &[&str] = &["unboxing", "launch", "premiere", "event", "live"];
pub(crate) const PROMO_TERMS: &[&str] = &["deal", "offer", "sale", "discount", "buy"];
pub(crate) const ANALYTICAL_TERMS: &[&str] =
    &["analysis", "review", "breakdown", "comparison", "vs"];
pub(crate) const NOSTALGIA_TERMS: &[&str] =
    &["history", "retro", "throwback", "classic", "nostalgia"];
pub(crate) const CALM_TERMS: &[&str] = &["relax", "relaxing", "meditation", "ambient", "calm"];
pub(crate) const LEARNING_TERMS: &[&str] = &["how", "guide", "tutorial", "learn", "tips"];

/// The closed emotion vocabulary scored videos are classified into.
pub const EMOTION_OPTIONS: &[&str] = &[
    "joyful",
    "excited",
    "inspired",
    "nostalgic",
    "calm",
    "serious",
    "critical",
    "persuasive",
    "neutral",
];

pub(crate) const TONE_ENTHUSIASTIC: &str = "enthusiastic and informative";
pub(crate) const TONE_URGENT: &str = "urgent and persuasive";
pub(crate) const TONE_ANALYTICAL: &str = "analytical and balanced";
pub(crate) const TONE_NOSTALGIC: &str = "nostalgic and emotive";
pub(crate) const TONE_CALM: &str = "calm and reflective";
pub(crate) const TONE_CRITICAL: &str = "critical and candid";
pub(crate) const TONE_WARM: &str = "warm and conversational";
pub(crate) const TONE_DEFAULT: &str = "promotional and enticing";
