//! crates/study_tracker_core/src/tracker.rs
//!
//! The per-user practice tracker: owns the in-memory sessions, chapters and
//! targets for one signed-in user, decides when they must be re-read from the
//! store, and applies the user's writes to both the store and the local copy.
//!
//! A tracker is created when a user signs in and dropped when they sign out.
//! Reads never fail from the caller's point of view: a failed fetch is logged
//! and the previous copy is kept. Writes propagate store errors and only touch
//! the local copy once the store has accepted them.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analytics::{self, AnalyticsSummary, TargetProgress};
use crate::calendar::StudyCalendar;
use crate::domain::{
    ChapterDelta, ChapterProgress, ChapterUpdate, NewSession, NewTarget, PracticeSession,
    SessionUpdate, Target, TargetUpdate, ValidationError,
};
use crate::freshness::{Collection, FreshnessCache};
use crate::ports::{Clock, PortError, PracticeStore};

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),
    #[error("Store error: {0}")]
    Store(PortError),
}

impl From<PortError> for TrackerError {
    fn from(e: PortError) -> Self {
        match e {
            PortError::Invalid(v) => TrackerError::Validation(v),
            other => TrackerError::Store(other),
        }
    }
}

pub type TrackerResult<T> = Result<T, TrackerError>;

/// What a fetch did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(tag = "status", content = "count", rename_all = "lowercase")]
pub enum FetchOutcome {
    /// The local copy was fresh and non-empty; the store was not called.
    Skipped,
    /// The local copy was replaced with this many rows.
    Refreshed(usize),
    /// The store call failed; the local copy and its timestamp are unchanged.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RefreshReport {
    pub sessions: FetchOutcome,
    pub chapters: FetchOutcome,
    pub targets: FetchOutcome,
}

enum Rows {
    Sessions(Vec<PracticeSession>),
    Chapters(Vec<ChapterProgress>),
    Targets(Vec<Target>),
}

#[derive(Default)]
struct TrackerState {
    sessions: Vec<PracticeSession>,
    chapters: Vec<ChapterProgress>,
    targets: Vec<Target>,
    freshness: FreshnessCache,
}

impl TrackerState {
    fn held(&self, collection: Collection) -> usize {
        match collection {
            Collection::Sessions => self.sessions.len(),
            Collection::Chapters => self.chapters.len(),
            Collection::Targets => self.targets.len(),
        }
    }

    /// Full replace, never a merge.
    fn replace(&mut self, rows: Rows) -> usize {
        match rows {
            Rows::Sessions(rows) => {
                self.sessions = rows;
                self.sessions.len()
            }
            Rows::Chapters(rows) => {
                self.chapters = rows;
                self.chapters.len()
            }
            Rows::Targets(rows) => {
                self.targets = rows;
                self.targets.len()
            }
        }
    }

    /// After a write the local copy is as current as the store's answer, but only if
    /// it held the full collection to begin with. An unloaded collection stays stale
    /// so the next fetch still reads everything.
    fn mark_written(&mut self, collection: Collection, now: DateTime<Utc>) {
        if self.freshness.last_fetched(collection).is_some() {
            self.freshness.mark_fresh(collection, now);
        }
    }

    fn put_session(&mut self, session: PracticeSession) {
        self.sessions.retain(|s| s.id != session.id);
        let pos = self
            .sessions
            .iter()
            .position(|s| s.date <= session.date)
            .unwrap_or(self.sessions.len());
        self.sessions.insert(pos, session);
    }

    fn put_chapter(&mut self, chapter: ChapterProgress) {
        self.chapters
            .retain(|c| c.id != chapter.id && c.key() != chapter.key());
        let pos = self
            .chapters
            .iter()
            .position(|c| c.last_practiced <= chapter.last_practiced)
            .unwrap_or(self.chapters.len());
        self.chapters.insert(pos, chapter);
    }

    fn put_target(&mut self, target: Target) {
        self.targets.retain(|t| t.id != target.id);
        let pos = self
            .targets
            .iter()
            .position(|t| t.start_date <= target.start_date)
            .unwrap_or(self.targets.len());
        self.targets.insert(pos, target);
    }
}

pub struct PracticeTracker {
    user_id: Uuid,
    store: Arc<dyn PracticeStore>,
    clock: Arc<dyn Clock>,
    calendar: StudyCalendar,
    state: RwLock<TrackerState>,
}

impl PracticeTracker {
    pub fn new(
        user_id: Uuid,
        store: Arc<dyn PracticeStore>,
        clock: Arc<dyn Clock>,
        calendar: StudyCalendar,
        freshness: FreshnessCache,
    ) -> Self {
        Self {
            user_id,
            store,
            clock,
            calendar,
            state: RwLock::new(TrackerState {
                freshness,
                ..TrackerState::default()
            }),
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Today's date in the study calendar.
    pub fn today(&self) -> NaiveDate {
        self.calendar.today(self.clock.now())
    }

    //=====================================================================================
    // Reads
    //=====================================================================================

    /// Reads the collection from the store unless the local copy is fresh and
    /// non-empty. `force` always reads.
    pub async fn fetch(&self, collection: Collection, force: bool) -> FetchOutcome {
        let now = self.clock.now();
        {
            let state = self.state.read().await;
            if !state
                .freshness
                .should_fetch(collection, now, force, state.held(collection))
            {
                debug!(user_id = %self.user_id, %collection, "Serving cached collection");
                return FetchOutcome::Skipped;
            }
        }

        let result = match collection {
            Collection::Sessions => self.store.list_sessions(self.user_id).await.map(Rows::Sessions),
            Collection::Chapters => self.store.list_chapters(self.user_id).await.map(Rows::Chapters),
            Collection::Targets => self.store.list_targets(self.user_id).await.map(Rows::Targets),
        };

        match result {
            Ok(rows) => {
                let mut state = self.state.write().await;
                let count = state.replace(rows);
                state.freshness.mark_fresh(collection, self.clock.now());
                debug!(user_id = %self.user_id, %collection, count, "Collection refreshed");
                FetchOutcome::Refreshed(count)
            }
            Err(e) => {
                warn!(user_id = %self.user_id, %collection, error = %e, "Failed to fetch collection; keeping cached copy");
                FetchOutcome::Failed
            }
        }
    }

    pub async fn fetch_sessions(&self, force: bool) -> FetchOutcome {
        self.fetch(Collection::Sessions, force).await
    }

    pub async fn fetch_chapters(&self, force: bool) -> FetchOutcome {
        self.fetch(Collection::Chapters, force).await
    }

    pub async fn fetch_targets(&self, force: bool) -> FetchOutcome {
        self.fetch(Collection::Targets, force).await
    }

    /// The catch-up refresh run when the user comes back: every collection is
    /// fetched without forcing, so only stale ones hit the store.
    pub async fn refresh_stale(&self) -> RefreshReport {
        RefreshReport {
            sessions: self.fetch(Collection::Sessions, false).await,
            chapters: self.fetch(Collection::Chapters, false).await,
            targets: self.fetch(Collection::Targets, false).await,
        }
    }

    pub async fn sessions(&self) -> Vec<PracticeSession> {
        self.state.read().await.sessions.clone()
    }

    pub async fn chapters(&self) -> Vec<ChapterProgress> {
        self.state.read().await.chapters.clone()
    }

    pub async fn targets(&self) -> Vec<Target> {
        self.state.read().await.targets.clone()
    }

    pub async fn last_fetched(&self, collection: Collection) -> Option<DateTime<Utc>> {
        self.state.read().await.freshness.last_fetched(collection)
    }

    pub async fn summary(&self) -> AnalyticsSummary {
        let today = self.today();
        let state = self.state.read().await;
        analytics::summary(&state.sessions, today)
    }

    pub async fn target_progress(&self) -> Vec<TargetProgress> {
        let today = self.today();
        let state = self.state.read().await;
        analytics::target_progress(&state.targets, &state.sessions, today)
    }

    //=====================================================================================
    // Session Writes
    //=====================================================================================

    pub async fn add_session(&self, new: NewSession) -> TrackerResult<PracticeSession> {
        new.validate()?;
        let session = self.store.insert_session(self.user_id, new).await?;
        {
            let mut state = self.state.write().await;
            state.put_session(session.clone());
            state.mark_written(Collection::Sessions, self.clock.now());
        }
        info!(user_id = %self.user_id, session_id = %session.id, "Practice session logged");

        self.apply_rollups(vec![ChapterDelta::added(&session)]).await;
        Ok(session)
    }

    pub async fn update_session(&self, update: SessionUpdate) -> TrackerResult<PracticeSession> {
        update.fields.validate()?;
        let revision = self
            .store
            .update_session(self.user_id, update.id, &update.fields)
            .await?;
        {
            let mut state = self.state.write().await;
            state.put_session(revision.after.clone());
            state.mark_written(Collection::Sessions, self.clock.now());
        }

        self.apply_rollups(ChapterDelta::between(&revision.before, &revision.after))
            .await;
        Ok(revision.after)
    }

    pub async fn delete_session(&self, session_id: Uuid) -> TrackerResult<()> {
        let removed = self.store.delete_session(self.user_id, session_id).await?;
        {
            let mut state = self.state.write().await;
            state.sessions.retain(|s| s.id != session_id);
            state.mark_written(Collection::Sessions, self.clock.now());
        }
        info!(user_id = %self.user_id, %session_id, "Practice session deleted");

        self.apply_rollups(vec![ChapterDelta::removed(&removed)]).await;
        Ok(())
    }

    /// Applies rollup deltas after a session write. Failures are logged and never
    /// reach the caller: the session write itself has already succeeded.
    async fn apply_rollups(&self, deltas: Vec<ChapterDelta>) {
        for delta in deltas {
            match self.store.apply_chapter_delta(self.user_id, &delta).await {
                Ok(chapter) => self.state.write().await.put_chapter(chapter),
                Err(e) => warn!(
                    user_id = %self.user_id,
                    subject = %delta.subject,
                    chapter = %delta.chapter_name,
                    error = %e,
                    "Failed to update chapter rollup"
                ),
            }
        }
    }

    //=====================================================================================
    // Chapter and Target Writes
    //=====================================================================================

    pub async fn update_chapter(&self, update: ChapterUpdate) -> TrackerResult<ChapterProgress> {
        update.fields.validate()?;
        let chapter = self
            .store
            .update_chapter(self.user_id, update.id, &update.fields)
            .await?;
        let mut state = self.state.write().await;
        state.put_chapter(chapter.clone());
        state.mark_written(Collection::Chapters, self.clock.now());
        Ok(chapter)
    }

    pub async fn add_target(&self, new: NewTarget) -> TrackerResult<Target> {
        new.validate()?;
        let target = self.store.insert_target(self.user_id, new).await?;
        let mut state = self.state.write().await;
        state.put_target(target.clone());
        state.mark_written(Collection::Targets, self.clock.now());
        Ok(target)
    }

    pub async fn update_target(&self, update: TargetUpdate) -> TrackerResult<Target> {
        update.fields.validate()?;
        {
            let state = self.state.read().await;
            if let Some(current) = state.targets.iter().find(|t| t.id == update.id) {
                update.fields.validate_against(current)?;
            }
        }
        let target = self
            .store
            .update_target(self.user_id, update.id, &update.fields)
            .await?;
        let mut state = self.state.write().await;
        state.put_target(target.clone());
        state.mark_written(Collection::Targets, self.clock.now());
        Ok(target)
    }

    pub async fn delete_target(&self, target_id: Uuid) -> TrackerResult<()> {
        self.store.delete_target(self.user_id, target_id).await?;
        let mut state = self.state.write().await;
        state.targets.retain(|t| t.id != target_id);
        state.mark_written(Collection::Targets, self.clock.now());
        Ok(())
    }

    /// Drops every cached row and timestamp.
    pub async fn discard(&self) {
        let mut state = self.state.write().await;
        state.sessions.clear();
        state.chapters.clear();
        state.targets.clear();
        state.freshness.reset();
    }
}
