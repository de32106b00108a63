//! services/api/src/web/registry.rs
//!
//! The signed-in users' trackers. One `PracticeTracker` per user, created at
//! login, dropped at logout.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use study_tracker_core::ports::{Clock, PracticeStore};
use study_tracker_core::{FreshnessCache, PracticeTracker, StudyCalendar};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

pub struct TrackerRegistry {
    store: Arc<dyn PracticeStore>,
    clock: Arc<dyn Clock>,
    calendar: StudyCalendar,
    ttl: Duration,
    trackers: RwLock<HashMap<Uuid, Arc<PracticeTracker>>>,
}

impl TrackerRegistry {
    pub fn new(
        store: Arc<dyn PracticeStore>,
        clock: Arc<dyn Clock>,
        calendar: StudyCalendar,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            clock,
            calendar,
            ttl,
            trackers: RwLock::new(HashMap::new()),
        }
    }

    fn build(&self, user_id: Uuid) -> Arc<PracticeTracker> {
        Arc::new(PracticeTracker::new(
            user_id,
            self.store.clone(),
            self.clock.clone(),
            self.calendar,
            FreshnessCache::new(self.ttl),
        ))
    }

    /// Starts a fresh tracker for the user, replacing any previous one.
    pub async fn sign_in(&self, user_id: Uuid) -> Arc<PracticeTracker> {
        let tracker = self.build(user_id);
        self.trackers.write().await.insert(user_id, tracker.clone());
        info!("Started tracker for user {}", user_id);
        tracker
    }

    /// Drops the user's tracker and everything it held.
    pub async fn sign_out(&self, user_id: Uuid) {
        let removed = self.trackers.write().await.remove(&user_id);
        if let Some(tracker) = removed {
            tracker.discard().await;
            info!("Discarded tracker for user {}", user_id);
        }
    }

    pub async fn get(&self, user_id: Uuid) -> Option<Arc<PracticeTracker>> {
        self.trackers.read().await.get(&user_id).cloned()
    }

    /// Returns the user's tracker, creating one if the user holds a valid login but
    /// no tracker, e.g. after a restart.
    pub async fn get_or_create(&self, user_id: Uuid) -> Arc<PracticeTracker> {
        if let Some(tracker) = self.get(user_id).await {
            return tracker;
        }
        let mut trackers = self.trackers.write().await;
        trackers
            .entry(user_id)
            .or_insert_with(|| self.build(user_id))
            .clone()
    }

    pub async fn len(&self) -> usize {
        self.trackers.read().await.len()
    }
}
