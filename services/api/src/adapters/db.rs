//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, the concrete implementation of the
//! `PracticeStore`, `TaskStore` and `AccountStore` ports from the core crate. It
//! handles all interactions with the PostgreSQL database using `sqlx`.
//!
//! Every statement is scoped by `user_id`. Chapter rollups are changed with a
//! single `INSERT .. ON CONFLICT DO UPDATE` so concurrent session writes cannot
//! lose an increment.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use study_tracker_core::domain::{
    ChapterDelta, ChapterPatch, ChapterProgress, NewSession, NewTarget, NewTask, PracticeSession,
    Revision, SessionPatch, StudyTask, Target, TargetPatch, TaskPatch, User, UserCredentials,
    UserMetadata,
};
use study_tracker_core::ports::{AccountStore, PortError, PortResult, PracticeStore, TaskStore};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the store ports.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn not_found(what: &str, id: Uuid) -> impl FnOnce() -> PortError + '_ {
    move || PortError::NotFound(format!("{} {} not found", what, id))
}

fn parse<T: std::str::FromStr>(raw: &str) -> PortResult<T>
where
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| PortError::Unexpected(format!("corrupt row: {}", e)))
}

fn parse_opt<T: std::str::FromStr>(raw: Option<String>) -> PortResult<Option<T>>
where
    T::Err: std::fmt::Display,
{
    raw.as_deref().map(parse).transpose()
}

fn to_db(value: u32) -> PortResult<i32> {
    i32::try_from(value)
        .map_err(|_| PortError::Unexpected(format!("{} does not fit an INTEGER column", value)))
}

fn from_db(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

const SESSION_COLUMNS: &str = "id, user_id, date, subject, chapter_name, source, source_details, \
     questions_target, questions_solved, time_spent, difficulty, accuracy_percentage, notes, \
     created_at, updated_at";

#[derive(FromRow)]
struct SessionRecord {
    id: Uuid,
    user_id: Uuid,
    date: NaiveDate,
    subject: String,
    chapter_name: String,
    source: String,
    source_details: Option<String>,
    questions_target: i32,
    questions_solved: i32,
    time_spent: i32,
    difficulty: Option<String>,
    accuracy_percentage: Option<f64>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl SessionRecord {
    fn to_domain(self) -> PortResult<PracticeSession> {
        Ok(PracticeSession {
            id: self.id,
            user_id: self.user_id,
            date: self.date,
            subject: parse(&self.subject)?,
            chapter_name: self.chapter_name,
            source: parse(&self.source)?,
            source_details: self.source_details,
            questions_target: from_db(self.questions_target),
            questions_solved: from_db(self.questions_solved),
            time_spent: from_db(self.time_spent),
            difficulty: parse_opt(self.difficulty)?,
            accuracy_percentage: self.accuracy_percentage,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const CHAPTER_COLUMNS: &str = "id, user_id, subject, chapter_name, total_questions, total_time, \
     last_practiced, revision_priority, mastery_level, created_at, updated_at";

#[derive(FromRow)]
struct ChapterRecord {
    id: Uuid,
    user_id: Uuid,
    subject: String,
    chapter_name: String,
    total_questions: i32,
    total_time: i32,
    last_practiced: Option<NaiveDate>,
    revision_priority: String,
    mastery_level: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl ChapterRecord {
    fn to_domain(self) -> PortResult<ChapterProgress> {
        Ok(ChapterProgress {
            id: self.id,
            user_id: self.user_id,
            subject: parse(&self.subject)?,
            chapter_name: self.chapter_name,
            total_questions: from_db(self.total_questions),
            total_time: from_db(self.total_time),
            last_practiced: self.last_practiced,
            revision_priority: parse(&self.revision_priority)?,
            mastery_level: parse(&self.mastery_level)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const TARGET_COLUMNS: &str = "id, user_id, target_type, subject, questions_goal, time_goal, \
     start_date, end_date, created_at, updated_at";

#[derive(FromRow)]
struct TargetRecord {
    id: Uuid,
    user_id: Uuid,
    target_type: String,
    subject: String,
    questions_goal: i32,
    time_goal: i32,
    start_date: NaiveDate,
    end_date: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl TargetRecord {
    fn to_domain(self) -> PortResult<Target> {
        Ok(Target {
            id: self.id,
            user_id: self.user_id,
            target_type: parse(&self.target_type)?,
            subject: parse(&self.subject)?,
            questions_goal: from_db(self.questions_goal),
            time_goal: from_db(self.time_goal),
            start_date: self.start_date,
            end_date: self.end_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const TASK_COLUMNS: &str = "id, user_id, title, subject, scheduled_date, duration_minutes, \
     completed, notes, created_at, updated_at";

#[derive(FromRow)]
struct TaskRecord {
    id: Uuid,
    user_id: Uuid,
    title: String,
    subject: Option<String>,
    scheduled_date: NaiveDate,
    duration_minutes: i32,
    completed: bool,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl TaskRecord {
    fn to_domain(self) -> PortResult<StudyTask> {
        Ok(StudyTask {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            subject: parse_opt(self.subject)?,
            scheduled_date: self.scheduled_date,
            duration_minutes: from_db(self.duration_minutes),
            completed: self.completed,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct UserRecord {
    user_id: Uuid,
    email: Option<String>,
    display_name: Option<String>,
    exam_goal: Option<String>,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            user_id: self.user_id,
            email: self.email,
            display_name: self.display_name,
            exam_goal: self.exam_goal,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    user_id: Uuid,
    email: String,
    hashed_password: String,
}

fn collect<R, T>(records: Vec<R>, f: impl Fn(R) -> PortResult<T>) -> PortResult<Vec<T>> {
    records.into_iter().map(f).collect()
}

//=========================================================================================
// `PracticeStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl PracticeStore for DbAdapter {
    async fn list_sessions(&self, user_id: Uuid) -> PortResult<Vec<PracticeSession>> {
        let sql = format!(
            "SELECT {SESSION_COLUMNS} FROM practice_sessions WHERE user_id = $1 \
             ORDER BY date DESC, created_at DESC"
        );
        let records = sqlx::query_as::<_, SessionRecord>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        collect(records, SessionRecord::to_domain)
    }

    async fn insert_session(&self, user_id: Uuid, new: NewSession) -> PortResult<PracticeSession> {
        let sql = format!(
            "INSERT INTO practice_sessions (id, user_id, date, subject, chapter_name, source, \
             source_details, questions_target, questions_solved, time_spent, difficulty, \
             accuracy_percentage, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {SESSION_COLUMNS}"
        );
        let record = sqlx::query_as::<_, SessionRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(new.date)
            .bind(new.subject.as_str())
            .bind(new.chapter_name.trim())
            .bind(new.source.as_str())
            .bind(new.source_details.as_deref())
            .bind(to_db(new.questions_target)?)
            .bind(to_db(new.questions_solved)?)
            .bind(to_db(new.time_spent)?)
            .bind(new.difficulty.map(|d| d.as_str()))
            .bind(new.accuracy_percentage)
            .bind(new.notes.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?;
        record.to_domain()
    }

    async fn update_session(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        patch: &SessionPatch,
    ) -> PortResult<Revision<PracticeSession>> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let select = format!(
            "SELECT {SESSION_COLUMNS} FROM practice_sessions WHERE id = $1 AND user_id = $2 FOR UPDATE"
        );
        let before = sqlx::query_as::<_, SessionRecord>(&select)
            .bind(session_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(unexpected)?
            .ok_or_else(not_found("Session", session_id))?
            .to_domain()?;

        let mut after = before.clone();
        patch.apply(&mut after);

        let update = format!(
            "UPDATE practice_sessions SET date = $3, subject = $4, chapter_name = $5, source = $6, \
             source_details = $7, questions_target = $8, questions_solved = $9, time_spent = $10, \
             difficulty = $11, accuracy_percentage = $12, notes = $13, updated_at = now() \
             WHERE id = $1 AND user_id = $2 RETURNING {SESSION_COLUMNS}"
        );
        let after = sqlx::query_as::<_, SessionRecord>(&update)
            .bind(session_id)
            .bind(user_id)
            .bind(after.date)
            .bind(after.subject.as_str())
            .bind(&after.chapter_name)
            .bind(after.source.as_str())
            .bind(after.source_details.as_deref())
            .bind(to_db(after.questions_target)?)
            .bind(to_db(after.questions_solved)?)
            .bind(to_db(after.time_spent)?)
            .bind(after.difficulty.map(|d| d.as_str()))
            .bind(after.accuracy_percentage)
            .bind(after.notes.as_deref())
            .fetch_one(&mut *tx)
            .await
            .map_err(unexpected)?
            .to_domain()?;

        tx.commit().await.map_err(unexpected)?;
        Ok(Revision { before, after })
    }

    async fn delete_session(&self, user_id: Uuid, session_id: Uuid) -> PortResult<PracticeSession> {
        let sql = format!(
            "DELETE FROM practice_sessions WHERE id = $1 AND user_id = $2 RETURNING {SESSION_COLUMNS}"
        );
        sqlx::query_as::<_, SessionRecord>(&sql)
            .bind(session_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .ok_or_else(not_found("Session", session_id))?
            .to_domain()
    }

    async fn list_chapters(&self, user_id: Uuid) -> PortResult<Vec<ChapterProgress>> {
        let sql = format!(
            "SELECT {CHAPTER_COLUMNS} FROM chapter_progress WHERE user_id = $1 \
             ORDER BY last_practiced DESC NULLS LAST, chapter_name ASC"
        );
        let records = sqlx::query_as::<_, ChapterRecord>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        collect(records, ChapterRecord::to_domain)
    }

    async fn apply_chapter_delta(
        &self,
        user_id: Uuid,
        delta: &ChapterDelta,
    ) -> PortResult<ChapterProgress> {
        // GREATEST ignores NULLs, so a missing practice date never moves last_practiced.
        let sql = format!(
            "INSERT INTO chapter_progress (id, user_id, subject, chapter_name, total_questions, \
             total_time, last_practiced) \
             VALUES ($1, $2, $3, $4, GREATEST($5, 0), GREATEST($6, 0), $7) \
             ON CONFLICT (user_id, subject, chapter_name) DO UPDATE SET \
             total_questions = GREATEST(chapter_progress.total_questions + $5, 0), \
             total_time = GREATEST(chapter_progress.total_time + $6, 0), \
             last_practiced = GREATEST(chapter_progress.last_practiced, EXCLUDED.last_practiced), \
             updated_at = now() \
             RETURNING {CHAPTER_COLUMNS}"
        );
        let questions = i32::try_from(delta.questions)
            .map_err(|_| PortError::Unexpected("question delta out of range".to_string()))?;
        let minutes = i32::try_from(delta.minutes)
            .map_err(|_| PortError::Unexpected("time delta out of range".to_string()))?;
        sqlx::query_as::<_, ChapterRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(delta.subject.as_str())
            .bind(&delta.chapter_name)
            .bind(questions)
            .bind(minutes)
            .bind(delta.practiced_on)
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?
            .to_domain()
    }

    async fn update_chapter(
        &self,
        user_id: Uuid,
        chapter_id: Uuid,
        patch: &ChapterPatch,
    ) -> PortResult<ChapterProgress> {
        let sql = format!(
            "UPDATE chapter_progress SET \
             revision_priority = COALESCE($3, revision_priority), \
             mastery_level = COALESCE($4, mastery_level), \
             updated_at = now() \
             WHERE id = $1 AND user_id = $2 RETURNING {CHAPTER_COLUMNS}"
        );
        sqlx::query_as::<_, ChapterRecord>(&sql)
            .bind(chapter_id)
            .bind(user_id)
            .bind(patch.revision_priority.map(|p| p.as_str()))
            .bind(patch.mastery_level.map(|m| m.as_str()))
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .ok_or_else(not_found("Chapter", chapter_id))?
            .to_domain()
    }

    async fn list_targets(&self, user_id: Uuid) -> PortResult<Vec<Target>> {
        let sql = format!(
            "SELECT {TARGET_COLUMNS} FROM targets WHERE user_id = $1 \
             ORDER BY start_date DESC, created_at DESC"
        );
        let records = sqlx::query_as::<_, TargetRecord>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        collect(records, TargetRecord::to_domain)
    }

    async fn insert_target(&self, user_id: Uuid, new: NewTarget) -> PortResult<Target> {
        let sql = format!(
            "INSERT INTO targets (id, user_id, target_type, subject, questions_goal, time_goal, \
             start_date, end_date) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {TARGET_COLUMNS}"
        );
        sqlx::query_as::<_, TargetRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(new.target_type.as_str())
            .bind(String::from(new.subject))
            .bind(to_db(new.questions_goal)?)
            .bind(to_db(new.time_goal)?)
            .bind(new.start_date)
            .bind(new.end_date)
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?
            .to_domain()
    }

    async fn update_target(
        &self,
        user_id: Uuid,
        target_id: Uuid,
        patch: &TargetPatch,
    ) -> PortResult<Target> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let select = format!(
            "SELECT {TARGET_COLUMNS} FROM targets WHERE id = $1 AND user_id = $2 FOR UPDATE"
        );
        let mut target = sqlx::query_as::<_, TargetRecord>(&select)
            .bind(target_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(unexpected)?
            .ok_or_else(not_found("Target", target_id))?
            .to_domain()?;
        patch.validate_against(&target).map_err(PortError::Invalid)?;
        patch.apply(&mut target);

        let update = format!(
            "UPDATE targets SET target_type = $3, subject = $4, questions_goal = $5, \
             time_goal = $6, start_date = $7, end_date = $8, updated_at = now() \
             WHERE id = $1 AND user_id = $2 RETURNING {TARGET_COLUMNS}"
        );
        let target = sqlx::query_as::<_, TargetRecord>(&update)
            .bind(target_id)
            .bind(user_id)
            .bind(target.target_type.as_str())
            .bind(String::from(target.subject))
            .bind(to_db(target.questions_goal)?)
            .bind(to_db(target.time_goal)?)
            .bind(target.start_date)
            .bind(target.end_date)
            .fetch_one(&mut *tx)
            .await
            .map_err(unexpected)?
            .to_domain()?;

        tx.commit().await.map_err(unexpected)?;
        Ok(target)
    }

    async fn delete_target(&self, user_id: Uuid, target_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM targets WHERE id = $1 AND user_id = $2")
            .bind(target_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(not_found("Target", target_id)());
        }
        Ok(())
    }
}

//=========================================================================================
// `TaskStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl TaskStore for DbAdapter {
    async fn list_tasks(&self, user_id: Uuid, on: Option<NaiveDate>) -> PortResult<Vec<StudyTask>> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM study_tasks \
             WHERE user_id = $1 AND ($2::date IS NULL OR scheduled_date = $2) \
             ORDER BY scheduled_date ASC, created_at ASC"
        );
        let records = sqlx::query_as::<_, TaskRecord>(&sql)
            .bind(user_id)
            .bind(on)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        collect(records, TaskRecord::to_domain)
    }

    async fn insert_task(&self, user_id: Uuid, new: NewTask) -> PortResult<StudyTask> {
        let sql = format!(
            "INSERT INTO study_tasks (id, user_id, title, subject, scheduled_date, \
             duration_minutes, notes) VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {TASK_COLUMNS}"
        );
        sqlx::query_as::<_, TaskRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(new.title.trim())
            .bind(new.subject.map(|s| s.as_str()))
            .bind(new.scheduled_date)
            .bind(to_db(new.duration_minutes)?)
            .bind(new.notes.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?
            .to_domain()
    }

    async fn update_task(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        patch: &TaskPatch,
    ) -> PortResult<StudyTask> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let select = format!(
            "SELECT {TASK_COLUMNS} FROM study_tasks WHERE id = $1 AND user_id = $2 FOR UPDATE"
        );
        let mut task = sqlx::query_as::<_, TaskRecord>(&select)
            .bind(task_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(unexpected)?
            .ok_or_else(not_found("Task", task_id))?
            .to_domain()?;
        patch.apply(&mut task);

        let update = format!(
            "UPDATE study_tasks SET title = $3, subject = $4, scheduled_date = $5, \
             duration_minutes = $6, completed = $7, notes = $8, updated_at = now() \
             WHERE id = $1 AND user_id = $2 RETURNING {TASK_COLUMNS}"
        );
        let task = sqlx::query_as::<_, TaskRecord>(&update)
            .bind(task_id)
            .bind(user_id)
            .bind(&task.title)
            .bind(task.subject.map(|s| s.as_str()))
            .bind(task.scheduled_date)
            .bind(to_db(task.duration_minutes)?)
            .bind(task.completed)
            .bind(task.notes.as_deref())
            .fetch_one(&mut *tx)
            .await
            .map_err(unexpected)?
            .to_domain()?;

        tx.commit().await.map_err(unexpected)?;
        Ok(task)
    }

    async fn delete_task(&self, user_id: Uuid, task_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM study_tasks WHERE id = $1 AND user_id = $2")
            .bind(task_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(not_found("Task", task_id)());
        }
        Ok(())
    }
}

//=========================================================================================
// `AccountStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl AccountStore for DbAdapter {
    async fn create_user_with_email(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (user_id, email, hashed_password) VALUES ($1, $2, $3) \
             RETURNING user_id, email, display_name, exam_goal",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map(UserRecord::to_domain)
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                PortError::Conflict(format!("An account for {} already exists", email))
            }
            other => unexpected(other),
        })
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT user_id, email, hashed_password FROM users \
             WHERE email = $1 AND hashed_password IS NOT NULL",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("User {} not found", email)))?;

        Ok(UserCredentials {
            user_id: record.user_id,
            email: record.email,
            hashed_password: record.hashed_password,
        })
    }

    async fn get_user(&self, user_id: Uuid) -> PortResult<User> {
        sqlx::query_as::<_, UserRecord>(
            "SELECT user_id, email, display_name, exam_goal FROM users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .map(UserRecord::to_domain)
        .ok_or_else(not_found("User", user_id))
    }

    async fn update_user_metadata(
        &self,
        user_id: Uuid,
        metadata: &UserMetadata,
    ) -> PortResult<User> {
        sqlx::query_as::<_, UserRecord>(
            "UPDATE users SET display_name = COALESCE($2, display_name), \
             exam_goal = COALESCE($3, exam_goal) WHERE user_id = $1 \
             RETURNING user_id, email, display_name, exam_goal",
        )
        .bind(user_id)
        .bind(metadata.display_name.as_deref())
        .bind(metadata.exam_goal.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .map(UserRecord::to_domain)
        .ok_or_else(not_found("User", user_id))
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let user_id: Option<Uuid> = sqlx::query_scalar(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > now()",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        user_id.ok_or(PortError::Unauthorized)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }
}
