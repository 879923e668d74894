//! Tokenization and overlap helpers.
//!
//! Everything here is deterministic: `BTreeSet` keeps iteration order stable
//! so identical inputs always produce identical evidence lists.

use std::collections::BTreeSet;

/// Split text into lowercase alphanumeric tokens.
///
/// Mixed-script text is handled by carrying over any alphanumeric character;
/// punctuation and whitespace are separators.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if c.is_alphanumeric() {
            current.extend(c.to_lowercase());
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Unique tokens of a text, ordered.
#[must_use]
pub fn token_set(text: &str) -> BTreeSet<String> {
    tokenize(text).into_iter().collect()
}

/// Jaccard similarity of two token sets, in [0, 1].
///
/// Empty-set pairs score 0 — no evidence is not a match.
#[must_use]
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    #[allow(clippy::cast_precision_loss)]
    let score = intersection as f64 / union as f64;
    score.clamp(0.0, 1.0)
}

/// Case-insensitive substring containment, used for guardrail terms.
#[must_use]
pub fn contains_term_ci(haystack: &str, term: &str) -> bool {
    if term.trim().is_empty() {
        return false;
    }
    haystack.to_lowercase().contains(&term.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_lowercases_and_splits_on_punctuation() {
        assert_eq!(
            tokenize("Top 5 Summer-Drinks! (2025)"),
            vec!["top", "5", "summer", "drinks", "2025"]
        );
    }

    #[test]
    fn tokenize_empty_text_yields_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  ...  ").is_empty());
    }

    #[test]
    fn jaccard_identical_sets_is_one() {
        let a = token_set("summer drinks review");
        assert!((jaccard(&a, &a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn jaccard_disjoint_sets_is_zero() {
        let a = token_set("summer drinks");
        let b = token_set("winter coats");
        assert!((jaccard(&a, &b)).abs() < 1e-12);
    }

    #[test]
    fn jaccard_empty_set_is_zero() {
        let a = token_set("");
        let b = token_set("anything");
        assert!((jaccard(&a, &b)).abs() < 1e-12);
    }

    #[test]
    fn jaccard_partial_overlap() {
        let a = token_set("summer drinks");
        let b = token_set("summer coats");
        // intersection 1 (summer), union 3
        assert!((jaccard(&a, &b) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn contains_term_ci_is_case_insensitive() {
        assert!(contains_term_ci("Crypto Casino Night", "casino"));
        assert!(contains_term_ci("crypto casino night", "CASINO"));
        assert!(!contains_term_ci("card games", "casino"));
    }

    #[test]
    fn contains_term_ci_ignores_blank_terms() {
        assert!(!contains_term_ci("anything", ""));
        assert!(!contains_term_ci("anything", "   "));
    }
}
