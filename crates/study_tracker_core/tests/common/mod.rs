use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use study_tracker_core::domain::{
    ChapterDelta, ChapterPatch, ChapterProgress, MasteryLevel, NewSession, NewTarget,
    PracticeSession, PracticeSource, Revision, RevisionPriority, SessionPatch, Subject, Target,
    TargetPatch,
};
use study_tracker_core::{
    Collection, FreshnessCache, ManualClock, PortError, PortResult, PracticeStore,
    PracticeTracker, StudyCalendar,
};
use uuid::Uuid;

/// 11:30 at +05:30 on 2024-03-10.
pub fn start_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 6, 0, 0).unwrap()
}

pub fn day(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

pub fn new_session(date: &str, subject: Subject, chapter: &str, solved: u32, minutes: u32) -> NewSession {
    NewSession {
        date: day(date),
        subject,
        chapter_name: chapter.to_string(),
        source: PracticeSource::Module,
        source_details: None,
        questions_target: 20,
        questions_solved: solved,
        time_spent: minutes,
        difficulty: None,
        accuracy_percentage: None,
        notes: None,
    }
}

pub fn new_target(start: &str, end: &str) -> NewTarget {
    NewTarget {
        target_type: study_tracker_core::domain::TargetType::Weekly,
        subject: study_tracker_core::SubjectScope::All,
        questions_goal: 50,
        time_goal: 120,
        start_date: day(start),
        end_date: day(end),
    }
}

#[derive(Default)]
struct Inner {
    sessions: Vec<PracticeSession>,
    chapters: Vec<ChapterProgress>,
    targets: Vec<Target>,
    reads: HashMap<Collection, usize>,
    writes: usize,
    failing_reads: Vec<Collection>,
    fail_writes: bool,
    fail_rollups: bool,
}

/// A `PracticeStore` that counts reads and can be told to fail.
#[derive(Default)]
pub struct ScriptedStore {
    inner: Mutex<Inner>,
}

impl ScriptedStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    pub fn reads(&self, collection: Collection) -> usize {
        self.lock().reads.get(&collection).copied().unwrap_or(0)
    }

    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    pub fn fail_reads(&self, collection: Collection, fail: bool) {
        let mut inner = self.lock();
        inner.failing_reads.retain(|c| *c != collection);
        if fail {
            inner.failing_reads.push(collection);
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    pub fn fail_rollups(&self, fail: bool) {
        self.lock().fail_rollups = fail;
    }

    pub fn seed_session(&self, user_id: Uuid, new: NewSession) -> PracticeSession {
        let session = new.into_session(user_id, Utc::now());
        self.lock().sessions.push(session.clone());
        session
    }

    pub fn stored_sessions(&self) -> Vec<PracticeSession> {
        self.lock().sessions.clone()
    }

    pub fn stored_chapters(&self) -> Vec<ChapterProgress> {
        self.lock().chapters.clone()
    }

    fn read<T: Clone>(
        &self,
        collection: Collection,
        pick: impl FnOnce(&Inner) -> Vec<T>,
    ) -> PortResult<Vec<T>> {
        let mut inner = self.lock();
        *inner.reads.entry(collection).or_default() += 1;
        if inner.failing_reads.contains(&collection) {
            return Err(PortError::Unexpected("connection reset".to_string()));
        }
        Ok(pick(&inner))
    }

    fn write(&self) -> PortResult<std::sync::MutexGuard<'_, Inner>> {
        let mut inner = self.lock();
        inner.writes += 1;
        if inner.fail_writes {
            return Err(PortError::Unexpected("write rejected".to_string()));
        }
        Ok(inner)
    }
}

fn not_found(what: &str, id: Uuid) -> PortError {
    PortError::NotFound(format!("{} {} not found", what, id))
}

#[async_trait]
impl PracticeStore for ScriptedStore {
    async fn list_sessions(&self, user_id: Uuid) -> PortResult<Vec<PracticeSession>> {
        self.read(Collection::Sessions, |inner| {
            let mut rows: Vec<_> = inner
                .sessions
                .iter()
                .filter(|s| s.user_id == user_id)
                .cloned()
                .collect();
            rows.sort_by(|a, b| b.date.cmp(&a.date));
            rows
        })
    }

    async fn insert_session(&self, user_id: Uuid, new: NewSession) -> PortResult<PracticeSession> {
        let mut inner = self.write()?;
        let session = new.into_session(user_id, Utc::now());
        inner.sessions.push(session.clone());
        Ok(session)
    }

    async fn update_session(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        patch: &SessionPatch,
    ) -> PortResult<Revision<PracticeSession>> {
        let mut inner = self.write()?;
        let row = inner
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id && s.user_id == user_id)
            .ok_or_else(|| not_found("Session", session_id))?;
        let before = row.clone();
        patch.apply(row);
        Ok(Revision {
            before,
            after: row.clone(),
        })
    }

    async fn delete_session(&self, user_id: Uuid, session_id: Uuid) -> PortResult<PracticeSession> {
        let mut inner = self.write()?;
        let pos = inner
            .sessions
            .iter()
            .position(|s| s.id == session_id && s.user_id == user_id)
            .ok_or_else(|| not_found("Session", session_id))?;
        Ok(inner.sessions.remove(pos))
    }

    async fn list_chapters(&self, user_id: Uuid) -> PortResult<Vec<ChapterProgress>> {
        self.read(Collection::Chapters, |inner| {
            inner
                .chapters
                .iter()
                .filter(|c| c.user_id == user_id)
                .cloned()
                .collect()
        })
    }

    async fn apply_chapter_delta(
        &self,
        user_id: Uuid,
        delta: &ChapterDelta,
    ) -> PortResult<ChapterProgress> {
        let mut inner = self.lock();
        if inner.fail_rollups {
            return Err(PortError::Unexpected("rollup table locked".to_string()));
        }
        let pos = inner.chapters.iter().position(|c| {
            c.user_id == user_id
                && c.subject == delta.subject
                && c.chapter_name == delta.chapter_name
        });
        let pos = match pos {
            Some(pos) => pos,
            None => {
                let now = Utc::now();
                inner.chapters.push(ChapterProgress {
                    id: Uuid::new_v4(),
                    user_id,
                    subject: delta.subject,
                    chapter_name: delta.chapter_name.clone(),
                    total_questions: 0,
                    total_time: 0,
                    last_practiced: None,
                    revision_priority: RevisionPriority::default(),
                    mastery_level: MasteryLevel::default(),
                    created_at: now,
                    updated_at: now,
                });
                inner.chapters.len() - 1
            }
        };
        let chapter = &mut inner.chapters[pos];
        delta.apply(chapter);
        Ok(chapter.clone())
    }

    async fn update_chapter(
        &self,
        user_id: Uuid,
        chapter_id: Uuid,
        patch: &ChapterPatch,
    ) -> PortResult<ChapterProgress> {
        let mut inner = self.write()?;
        let row = inner
            .chapters
            .iter_mut()
            .find(|c| c.id == chapter_id && c.user_id == user_id)
            .ok_or_else(|| not_found("Chapter", chapter_id))?;
        patch.apply(row);
        Ok(row.clone())
    }

    async fn list_targets(&self, user_id: Uuid) -> PortResult<Vec<Target>> {
        self.read(Collection::Targets, |inner| {
            inner
                .targets
                .iter()
                .filter(|t| t.user_id == user_id)
                .cloned()
                .collect()
        })
    }

    async fn insert_target(&self, user_id: Uuid, new: NewTarget) -> PortResult<Target> {
        let mut inner = self.write()?;
        let target = new.into_target(user_id, Utc::now());
        inner.targets.push(target.clone());
        Ok(target)
    }

    async fn update_target(
        &self,
        user_id: Uuid,
        target_id: Uuid,
        patch: &TargetPatch,
    ) -> PortResult<Target> {
        let mut inner = self.write()?;
        let row = inner
            .targets
            .iter_mut()
            .find(|t| t.id == target_id && t.user_id == user_id)
            .ok_or_else(|| not_found("Target", target_id))?;
        patch.validate_against(row).map_err(PortError::Invalid)?;
        patch.apply(row);
        Ok(row.clone())
    }

    async fn delete_target(&self, user_id: Uuid, target_id: Uuid) -> PortResult<()> {
        let mut inner = self.write()?;
        let before = inner.targets.len();
        inner
            .targets
            .retain(|t| !(t.id == target_id && t.user_id == user_id));
        if inner.targets.len() == before {
            return Err(not_found("Target", target_id));
        }
        Ok(())
    }
}

pub struct Harness {
    pub user_id: Uuid,
    pub store: Arc<ScriptedStore>,
    pub clock: Arc<ManualClock>,
    pub tracker: PracticeTracker,
}

pub fn harness() -> Harness {
    let user_id = Uuid::new_v4();
    let store = Arc::new(ScriptedStore::default());
    let clock = Arc::new(ManualClock::new(start_instant()));
    let tracker = PracticeTracker::new(
        user_id,
        store.clone(),
        clock.clone(),
        StudyCalendar::default(),
        FreshnessCache::default(),
    );
    Harness {
        user_id,
        store,
        clock,
        tracker,
    }
}
