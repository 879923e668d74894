//! Keyword rotation scheduling.
//!
//! Decides which of a campaign's active keywords drive the next fetch cycle.
//! Rotation spreads quota across the pool over time: within each
//! keyword-type bucket, least-recently-used keywords go first (never-used
//! before all others), and slots are allocated across buckets proportionally
//! so no single type dominates a cycle.

use std::collections::HashMap;
use std::str::FromStr;

use sqlx::PgPool;

use adfit_core::KeywordType;
use adfit_db::KeywordRow;

use crate::error::PipelineError;

/// Optional per-bucket slot weighting. Buckets without an entry fall back to
/// their active-keyword count, which is also the overall default.
#[derive(Debug, Clone, Default)]
pub struct RotationWeights {
    weights: HashMap<KeywordType, f64>,
}

impl RotationWeights {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_weight(mut self, keyword_type: KeywordType, weight: f64) -> Self {
        self.weights.insert(keyword_type, weight.max(0.0));
        self
    }

    #[allow(clippy::cast_precision_loss)]
    fn for_bucket(&self, keyword_type: KeywordType, bucket_len: usize) -> f64 {
        self.weights
            .get(&keyword_type)
            .copied()
            .unwrap_or(bucket_len as f64)
    }
}

/// Pure rotation planning over a snapshot of active keywords.
///
/// 1. Group by keyword type.
/// 2. Order each bucket by ascending `last_used_at` (never-used first),
///    tie-break by descending relevance, then keyword text for stability.
/// 3. Allocate `slots` across buckets proportionally to their weight
///    (largest remainder), then round-robin the output so the returned
///    sequence interleaves types in rotation order.
///
/// Fewer active keywords than `slots` returns them all; an empty snapshot
/// returns an empty plan — "nothing to fetch" is not an error.
#[must_use]
pub fn plan_rotation(
    keywords: &[KeywordRow],
    slots: usize,
    weights: &RotationWeights,
) -> Vec<KeywordRow> {
    if slots == 0 || keywords.is_empty() {
        return Vec::new();
    }

    // Bucket active keywords by type; unknown type strings are skipped.
    let mut buckets: HashMap<KeywordType, Vec<&KeywordRow>> = HashMap::new();
    for row in keywords {
        if row.status != "active" {
            continue;
        }
        match KeywordType::from_str(&row.keyword_type) {
            Ok(keyword_type) => buckets.entry(keyword_type).or_default().push(row),
            Err(_) => {
                tracing::warn!(
                    keyword = %row.keyword,
                    keyword_type = %row.keyword_type,
                    "skipping keyword with unknown type"
                );
            }
        }
    }
    if buckets.is_empty() {
        return Vec::new();
    }

    for bucket in buckets.values_mut() {
        bucket.sort_by(|a, b| {
            a.last_used_at
                .cmp(&b.last_used_at)
                .then_with(|| {
                    b.relevance_score
                        .partial_cmp(&a.relevance_score)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .then_with(|| a.keyword.cmp(&b.keyword))
        });
    }

    // Present buckets in the stable type order.
    let present: Vec<KeywordType> = KeywordType::ALL
        .into_iter()
        .filter(|t| buckets.contains_key(t))
        .collect();

    let available: usize = buckets.values().map(|b| b.len()).sum();
    let budget = slots.min(available);

    let targets = allocate_targets(&present, &buckets, budget, weights);

    // Take each bucket's share, then interleave round-robin across buckets.
    let mut queues: Vec<std::collections::VecDeque<&KeywordRow>> = present
        .iter()
        .map(|t| {
            let take = targets[t].min(buckets[t].len());
            buckets[t][..take].iter().copied().collect()
        })
        .collect();

    let mut selected: Vec<KeywordRow> = Vec::with_capacity(budget);
    while selected.len() < budget {
        let mut progressed = false;
        for queue in &mut queues {
            if let Some(row) = queue.pop_front() {
                selected.push(row.clone());
                progressed = true;
                if selected.len() == budget {
                    break;
                }
            }
        }
        if !progressed {
            break;
        }
    }

    // Under-filled targets (short buckets) leave spare slots; fill them with
    // the best remaining keywords across all buckets.
    if selected.len() < budget {
        let chosen: std::collections::HashSet<i64> = selected.iter().map(|k| k.id).collect();
        let mut leftovers: Vec<&KeywordRow> = present
            .iter()
            .flat_map(|t| buckets[t].iter().copied())
            .filter(|k| !chosen.contains(&k.id))
            .collect();
        leftovers.sort_by(|a, b| {
            a.last_used_at
                .cmp(&b.last_used_at)
                .then_with(|| {
                    b.relevance_score
                        .partial_cmp(&a.relevance_score)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .then_with(|| a.keyword.cmp(&b.keyword))
        });
        for row in leftovers {
            selected.push(row.clone());
            if selected.len() == budget {
                break;
            }
        }
    }

    selected
}

/// Largest-remainder proportional allocation of `budget` slots across the
/// present buckets.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn allocate_targets(
    present: &[KeywordType],
    buckets: &HashMap<KeywordType, Vec<&KeywordRow>>,
    budget: usize,
    weights: &RotationWeights,
) -> HashMap<KeywordType, usize> {
    let total_weight: f64 = present
        .iter()
        .map(|t| weights.for_bucket(*t, buckets[t].len()))
        .sum();

    let mut targets: HashMap<KeywordType, usize> = HashMap::new();
    if total_weight <= 0.0 {
        // Degenerate weighting: spread evenly.
        let base = budget / present.len();
        let mut extra = budget % present.len();
        for t in present {
            let mut share = base;
            if extra > 0 {
                share += 1;
                extra -= 1;
            }
            targets.insert(*t, share);
        }
        return targets;
    }

    let mut remainders: Vec<(KeywordType, f64)> = Vec::with_capacity(present.len());
    let mut assigned = 0usize;
    for t in present {
        let exact = budget as f64 * weights.for_bucket(*t, buckets[t].len()) / total_weight;
        let floor = exact.floor() as usize;
        targets.insert(*t, floor);
        assigned += floor;
        remainders.push((*t, exact - exact.floor()));
    }

    // Distribute leftover slots to the largest fractional remainders,
    // stable in type order on ties.
    remainders.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let mut remaining = budget.saturating_sub(assigned);
    for (t, _) in remainders {
        if remaining == 0 {
            break;
        }
        *targets.entry(t).or_insert(0) += 1;
        remaining -= 1;
    }

    targets
}

/// Select the keywords for the next fetch cycle and mark them used.
///
/// The `last_used_at` stamp is written in one UPDATE before returning, so a
/// subsequent scheduling call for the same campaign observes this cycle's
/// rotation (read-after-write).
///
/// # Errors
///
/// - [`PipelineError::Validation`] when `slots` is zero.
/// - [`PipelineError::Db`] on store failures.
pub async fn select_keywords(
    pool: &PgPool,
    campaign_id: i64,
    slots: usize,
    weights: &RotationWeights,
) -> Result<Vec<KeywordRow>, PipelineError> {
    if slots == 0 {
        return Err(PipelineError::Validation(
            "keyword slots must be at least 1".to_string(),
        ));
    }

    let keywords = adfit_db::list_active_keywords(pool, campaign_id).await?;
    let selected = plan_rotation(&keywords, slots, weights);
    if selected.is_empty() {
        tracing::info!(campaign_id, "no active keywords to rotate");
        return Ok(selected);
    }

    let ids: Vec<i64> = selected.iter().map(|k| k.id).collect();
    adfit_db::mark_keywords_used(pool, &ids).await?;

    let mut mix: HashMap<&str, usize> = HashMap::new();
    for keyword in &selected {
        *mix.entry(keyword.keyword_type.as_str()).or_insert(0) += 1;
    }
    tracing::info!(campaign_id, selected = selected.len(), ?mix, "keyword rotation planned");

    Ok(selected)
}
