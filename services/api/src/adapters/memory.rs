//! services/api/src/adapters/memory.rs
//!
//! A process-local implementation of the store ports. Selected with
//! `STORE_BACKEND=memory` for development, and used by the router tests.
//! Nothing survives a restart.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use study_tracker_core::domain::{
    ChapterDelta, ChapterPatch, ChapterProgress, MasteryLevel, NewSession, NewTarget, NewTask,
    PracticeSession, Revision, RevisionPriority, SessionPatch, StudyTask, Target, TargetPatch,
    TaskPatch, User, UserCredentials, UserMetadata,
};
use study_tracker_core::ports::{AccountStore, PortError, PortResult, PracticeStore, TaskStore};
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, (User, Option<String>)>,
    auth_sessions: HashMap<String, (Uuid, DateTime<Utc>)>,
    sessions: Vec<PracticeSession>,
    chapters: Vec<ChapterProgress>,
    targets: Vec<Target>,
    tasks: Vec<StudyTask>,
}

#[derive(Default)]
pub struct MemoryAdapter {
    tables: Mutex<Tables>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn not_found(what: &str, id: Uuid) -> PortError {
    PortError::NotFound(format!("{} {} not found", what, id))
}

/// Finds the user's row by id.
fn owned<'a, T>(
    rows: &'a mut [T],
    what: &str,
    id: Uuid,
    key: impl Fn(&T) -> (Uuid, Uuid),
    user_id: Uuid,
) -> PortResult<&'a mut T> {
    rows.iter_mut()
        .find(|row| key(row) == (id, user_id))
        .ok_or_else(|| not_found(what, id))
}

/// Removes the user's row by id and returns it.
fn take<T>(
    rows: &mut Vec<T>,
    what: &str,
    id: Uuid,
    key: impl Fn(&T) -> (Uuid, Uuid),
    user_id: Uuid,
) -> PortResult<T> {
    let pos = rows
        .iter()
        .position(|row| key(row) == (id, user_id))
        .ok_or_else(|| not_found(what, id))?;
    Ok(rows.remove(pos))
}

#[async_trait]
impl PracticeStore for MemoryAdapter {
    async fn list_sessions(&self, user_id: Uuid) -> PortResult<Vec<PracticeSession>> {
        let mut rows: Vec<_> = self
            .tables()
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(rows)
    }

    async fn insert_session(&self, user_id: Uuid, new: NewSession) -> PortResult<PracticeSession> {
        let session = new.into_session(user_id, Utc::now());
        self.tables().sessions.push(session.clone());
        Ok(session)
    }

    async fn update_session(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        patch: &SessionPatch,
    ) -> PortResult<Revision<PracticeSession>> {
        let mut tables = self.tables();
        let row = owned(&mut tables.sessions, "Session", session_id, |s| (s.id, s.user_id), user_id)?;
        let before = row.clone();
        patch.apply(row);
        row.updated_at = Utc::now();
        Ok(Revision {
            before,
            after: row.clone(),
        })
    }

    async fn delete_session(&self, user_id: Uuid, session_id: Uuid) -> PortResult<PracticeSession> {
        take(&mut self.tables().sessions, "Session", session_id, |s| (s.id, s.user_id), user_id)
    }

    async fn list_chapters(&self, user_id: Uuid) -> PortResult<Vec<ChapterProgress>> {
        let mut rows: Vec<_> = self
            .tables()
            .chapters
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.last_practiced.cmp(&a.last_practiced));
        Ok(rows)
    }

    async fn apply_chapter_delta(
        &self,
        user_id: Uuid,
        delta: &ChapterDelta,
    ) -> PortResult<ChapterProgress> {
        let mut tables = self.tables();
        let now = Utc::now();
        let pos = tables.chapters.iter().position(|c| {
            c.user_id == user_id
                && c.subject == delta.subject
                && c.chapter_name == delta.chapter_name
        });
        let chapter = match pos {
            Some(pos) => &mut tables.chapters[pos],
            None => {
                tables.chapters.push(ChapterProgress {
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
                let last = tables.chapters.len() - 1;
                &mut tables.chapters[last]
            }
        };
        delta.apply(chapter);
        chapter.updated_at = now;
        Ok(chapter.clone())
    }

    async fn update_chapter(
        &self,
        user_id: Uuid,
        chapter_id: Uuid,
        patch: &ChapterPatch,
    ) -> PortResult<ChapterProgress> {
        let mut tables = self.tables();
        let row = owned(&mut tables.chapters, "Chapter", chapter_id, |c| (c.id, c.user_id), user_id)?;
        patch.apply(row);
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn list_targets(&self, user_id: Uuid) -> PortResult<Vec<Target>> {
        let mut rows: Vec<_> = self
            .tables()
            .targets
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(rows)
    }

    async fn insert_target(&self, user_id: Uuid, new: NewTarget) -> PortResult<Target> {
        let target = new.into_target(user_id, Utc::now());
        self.tables().targets.push(target.clone());
        Ok(target)
    }

    async fn update_target(
        &self,
        user_id: Uuid,
        target_id: Uuid,
        patch: &TargetPatch,
    ) -> PortResult<Target> {
        let mut tables = self.tables();
        let row = owned(&mut tables.targets, "Target", target_id, |t| (t.id, t.user_id), user_id)?;
        patch.validate_against(row).map_err(PortError::Invalid)?;
        let mut next = row.clone();
        patch.apply(&mut next);
        next.updated_at = Utc::now();
        *row = next.clone();
        Ok(next)
    }

    async fn delete_target(&self, user_id: Uuid, target_id: Uuid) -> PortResult<()> {
        take(&mut self.tables().targets, "Target", target_id, |t| (t.id, t.user_id), user_id)
            .map(|_| ())
    }
}

#[async_trait]
impl TaskStore for MemoryAdapter {
    async fn list_tasks(&self, user_id: Uuid, on: Option<NaiveDate>) -> PortResult<Vec<StudyTask>> {
        let mut rows: Vec<_> = self
            .tables()
            .tasks
            .iter()
            .filter(|t| t.user_id == user_id && on.map_or(true, |d| t.scheduled_date == d))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.scheduled_date.cmp(&b.scheduled_date));
        Ok(rows)
    }

    async fn insert_task(&self, user_id: Uuid, new: NewTask) -> PortResult<StudyTask> {
        let task = new.into_task(user_id, Utc::now());
        self.tables().tasks.push(task.clone());
        Ok(task)
    }

    async fn update_task(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        patch: &TaskPatch,
    ) -> PortResult<StudyTask> {
        let mut tables = self.tables();
        let row = owned(&mut tables.tasks, "Task", task_id, |t| (t.id, t.user_id), user_id)?;
        patch.apply(row);
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_task(&self, user_id: Uuid, task_id: Uuid) -> PortResult<()> {
        take(&mut self.tables().tasks, "Task", task_id, |t| (t.id, t.user_id), user_id).map(|_| ())
    }
}

#[async_trait]
impl AccountStore for MemoryAdapter {
    async fn create_user_with_email(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let mut tables = self.tables();
        if tables
            .users
            .values()
            .any(|(u, _)| u.email.as_deref() == Some(email))
        {
            return Err(PortError::Conflict(format!(
                "An account for {} already exists",
                email
            )));
        }
        let user = User {
            user_id: Uuid::new_v4(),
            email: Some(email.to_string()),
            display_name: None,
            exam_goal: None,
        };
        tables
            .users
            .insert(user.user_id, (user.clone(), Some(hashed_password.to_string())));
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        self.tables()
            .users
            .values()
            .find_map(|(u, hash)| match (&u.email, hash) {
                (Some(e), Some(hash)) if e == email => Some(UserCredentials {
                    user_id: u.user_id,
                    email: e.clone(),
                    hashed_password: hash.clone(),
                }),
                _ => None,
            })
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", email)))
    }

    async fn get_user(&self, user_id: Uuid) -> PortResult<User> {
        self.tables()
            .users
            .get(&user_id)
            .map(|(u, _)| u.clone())
            .ok_or_else(|| not_found("User", user_id))
    }

    async fn update_user_metadata(
        &self,
        user_id: Uuid,
        metadata: &UserMetadata,
    ) -> PortResult<User> {
        let mut tables = self.tables();
        let (user, _) = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| not_found("User", user_id))?;
        if let Some(name) = &metadata.display_name {
            user.display_name = Some(name.clone());
        }
        if let Some(goal) = &metadata.exam_goal {
            user.exam_goal = Some(goal.clone());
        }
        Ok(user.clone())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        self.tables()
            .auth_sessions
            .insert(session_id.to_string(), (user_id, expires_at));
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        match self.tables().auth_sessions.get(session_id) {
            Some((user_id, expires_at)) if *expires_at > Utc::now() => Ok(*user_id),
            _ => Err(PortError::Unauthorized),
        }
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        self.tables().auth_sessions.remove(session_id);
        Ok(())
    }
}
