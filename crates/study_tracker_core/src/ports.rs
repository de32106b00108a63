//! crates/study_tracker_core/src/ports.rs
//!
//! Defines the service contracts (traits) the core depends on.
//! These traits form the boundary of the hexagonal architecture: the remote row
//! store, the account/authentication collaborator, and the wall clock.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{
    ChapterDelta, ChapterPatch, ChapterProgress, NewSession, NewTarget, NewTask, PracticeSession,
    Revision, SessionPatch, StudyTask, Target, TargetPatch, TaskPatch, User, UserCredentials,
    UserMetadata, ValidationError,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unauthorized")]
    Unauthorized,
    /// The request only turned out to be invalid against the stored row.
    #[error("Invalid request: {0}")]
    Invalid(ValidationError),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The remote row store for the three cached collections.
///
/// Every call is scoped to `user_id`; implementations must never return or touch
/// rows owned by another user.
#[async_trait]
pub trait PracticeStore: Send + Sync {
    // --- Practice Sessions ---
    /// All sessions for the user, newest `date` first.
    async fn list_sessions(&self, user_id: Uuid) -> PortResult<Vec<PracticeSession>>;

    async fn insert_session(&self, user_id: Uuid, new: NewSession) -> PortResult<PracticeSession>;

    async fn update_session(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        patch: &SessionPatch,
    ) -> PortResult<Revision<PracticeSession>>;

    /// Deletes the session and returns the row as it was.
    async fn delete_session(&self, user_id: Uuid, session_id: Uuid) -> PortResult<PracticeSession>;

    // --- Chapter Rollups ---
    /// All chapter rollups for the user, most recently practised first.
    async fn list_chapters(&self, user_id: Uuid) -> PortResult<Vec<ChapterProgress>>;

    /// Adds the signed delta to the (subject, chapter) rollup, creating it if needed.
    /// Must be a single atomic operation, never a read followed by a write.
    async fn apply_chapter_delta(
        &self,
        user_id: Uuid,
        delta: &ChapterDelta,
    ) -> PortResult<ChapterProgress>;

    async fn update_chapter(
        &self,
        user_id: Uuid,
        chapter_id: Uuid,
        patch: &ChapterPatch,
    ) -> PortResult<ChapterProgress>;

    // --- Targets ---
    /// All targets for the user, latest `start_date` first.
    async fn list_targets(&self, user_id: Uuid) -> PortResult<Vec<Target>>;

    async fn insert_target(&self, user_id: Uuid, new: NewTarget) -> PortResult<Target>;

    async fn update_target(
        &self,
        user_id: Uuid,
        target_id: Uuid,
        patch: &TargetPatch,
    ) -> PortResult<Target>;

    async fn delete_target(&self, user_id: Uuid, target_id: Uuid) -> PortResult<()>;
}

/// The planner's study tasks. Not cached by the tracker.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Tasks for the user, optionally restricted to one scheduled date.
    async fn list_tasks(&self, user_id: Uuid, on: Option<NaiveDate>) -> PortResult<Vec<StudyTask>>;

    async fn insert_task(&self, user_id: Uuid, new: NewTask) -> PortResult<StudyTask>;

    async fn update_task(&self, user_id: Uuid, task_id: Uuid, patch: &TaskPatch)
        -> PortResult<StudyTask>;

    async fn delete_task(&self, user_id: Uuid, task_id: Uuid) -> PortResult<()>;
}

/// Accounts and browser login sessions.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create_user_with_email(&self, email: &str, hashed_password: &str)
        -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn get_user(&self, user_id: Uuid) -> PortResult<User>;

    async fn update_user_metadata(&self, user_id: Uuid, metadata: &UserMetadata)
        -> PortResult<User>;

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Returns the owning user of an unexpired auth session.
    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;
}

/// The wall clock. Injected so freshness and "today" can be driven in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
