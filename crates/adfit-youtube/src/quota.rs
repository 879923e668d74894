//! Quota cost accounting for external API calls.
//!
//! The ledger only reports usage — it never refuses a write and never
//! enforces a ceiling. Callers that want to stop fetching at a budget read
//! [`QuotaLedger::usage`] and decide for themselves.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use adfit_core::AppConfig;

/// Cost units charged per external call type.
///
/// The numbers come from configuration, not code: a search costs ~100 units,
/// list-style lookups ~1 unit per batch call.
#[derive(Debug, Clone, Copy)]
pub struct CostTable {
    pub search_units: u64,
    pub video_list_units: u64,
    pub channel_list_units: u64,
}

impl Default for CostTable {
    fn default() -> Self {
        Self {
            search_units: 100,
            video_list_units: 1,
            channel_list_units: 1,
        }
    }
}

impl CostTable {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            search_units: config.quota_search_units,
            video_list_units: config.quota_video_list_units,
            channel_list_units: config.quota_channel_list_units,
        }
    }
}

/// Running API cost per `(campaign, session)` pair.
///
/// Totals are monotonically non-decreasing within a session and live only in
/// process memory; the store never persists them. Call sites are responsible
/// for recording each physical API call exactly once.
#[derive(Debug, Default)]
pub struct QuotaLedger {
    totals: Mutex<HashMap<(Uuid, Uuid), u64>>,
}

impl QuotaLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `units` to the running total for this campaign/session.
    ///
    /// # Panics
    ///
    /// Panics only if the internal lock is poisoned, which cannot happen
    /// because no code path panics while holding it.
    pub fn record(&self, campaign: Uuid, session: Uuid, units: u64) {
        let mut totals = self.totals.lock().expect("quota ledger lock poisoned");
        let entry = totals.entry((campaign, session)).or_insert(0);
        *entry = entry.saturating_add(units);
    }

    /// The running total for this campaign/session; zero if nothing recorded.
    ///
    /// # Panics
    ///
    /// Panics only if the internal lock is poisoned (see [`Self::record`]).
    #[must_use]
    pub fn usage(&self, campaign: Uuid, session: Uuid) -> u64 {
        let totals = self.totals.lock().expect("quota ledger lock poisoned");
        totals.get(&(campaign, session)).copied().unwrap_or(0)
    }
}
