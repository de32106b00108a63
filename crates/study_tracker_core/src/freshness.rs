//! crates/study_tracker_core/src/freshness.rs
//!
//! Time-based freshness bookkeeping for the cached collections.
//!
//! A collection is fresh when it was fetched (or authoritatively written) less
//! than one TTL ago. A collection that has never been fetched has no timestamp
//! and is always stale. Timestamps live only in memory.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Five minutes.
pub const DEFAULT_TTL_SECS: i64 = 300;

/// The collections whose freshness is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Sessions,
    Chapters,
    Targets,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Sessions,
        Collection::Chapters,
        Collection::Targets,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Sessions => "sessions",
            Collection::Chapters => "chapters",
            Collection::Targets => "targets",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct FreshnessCache {
    ttl: Duration,
    last_fetched: HashMap<Collection, DateTime<Utc>>,
}

impl Default for FreshnessCache {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECS))
    }
}

impl FreshnessCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            last_fetched: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn last_fetched(&self, collection: Collection) -> Option<DateTime<Utc>> {
        self.last_fetched.get(&collection).copied()
    }

    /// True iff `now - last_fetched < ttl`.
    pub fn is_fresh(&self, collection: Collection, now: DateTime<Utc>) -> bool {
        match self.last_fetched.get(&collection) {
            Some(last) => now.signed_duration_since(*last) < self.ttl,
            None => false,
        }
    }

    pub fn mark_fresh(&mut self, collection: Collection, now: DateTime<Utc>) {
        self.last_fetched.insert(collection, now);
    }

    pub fn invalidate(&mut self, collection: Collection) {
        self.last_fetched.remove(&collection);
    }

    pub fn reset(&mut self) {
        self.last_fetched.clear();
    }

    /// Whether a fetch must go to the store. An empty local copy is always refetched,
    /// even when fresh.
    pub fn should_fetch(
        &self,
        collection: Collection,
        now: DateTime<Utc>,
        force: bool,
        held: usize,
    ) -> bool {
        force || held == 0 || !self.is_fresh(collection, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn never_fetched_is_stale() {
        let cache = FreshnessCache::default();
        for c in Collection::ALL {
            assert!(!cache.is_fresh(c, t(0)));
        }
    }

    #[test]
    fn fresh_until_ttl_elapses() {
        let mut cache = FreshnessCache::default();
        cache.mark_fresh(Collection::Sessions, t(0));

        assert!(cache.is_fresh(Collection::Sessions, t(60)));
        assert!(cache.is_fresh(Collection::Sessions, t(299)));
        assert!(!cache.is_fresh(Collection::Sessions, t(300)));
        assert!(!cache.is_fresh(Collection::Sessions, t(400)));
        assert!(!cache.is_fresh(Collection::Chapters, t(60)));
    }

    #[test]
    fn should_fetch_honours_force_and_empty_copy() {
        let mut cache = FreshnessCache::new(Duration::seconds(300));
        cache.mark_fresh(Collection::Targets, t(0));

        assert!(!cache.should_fetch(Collection::Targets, t(10), false, 3));
        assert!(cache.should_fetch(Collection::Targets, t(10), true, 3));
        assert!(cache.should_fetch(Collection::Targets, t(10), false, 0));
    }

    #[test]
    fn invalidate_and_reset_forget_timestamps() {
        let mut cache = FreshnessCache::default();
        cache.mark_fresh(Collection::Sessions, t(0));
        cache.mark_fresh(Collection::Chapters, t(0));

        cache.invalidate(Collection::Sessions);
        assert_eq!(cache.last_fetched(Collection::Sessions), None);
        assert!(cache.is_fresh(Collection::Chapters, t(1)));

        cache.reset();
        assert!(!cache.is_fresh(Collection::Chapters, t(1)));
    }
}
