//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the practice endpoints (sessions, chapters,
//! targets, refresh, analytics) and the master definition for the OpenAPI
//! specification.
//!
//! Every handler runs against the caller's `PracticeTracker`, which the auth
//! middleware places in the request extensions.

use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use study_tracker_core::analytics::{
    AnalyticsSummary, SubjectAccuracy, SubjectTotals, TargetProgress, Totals,
};
use study_tracker_core::domain::{
    ChapterPatch, ChapterProgress, ChapterUpdate, Difficulty, MasteryLevel, NewSession,
    NewTarget, NewTask, PracticeSession, PracticeSource, RevisionPriority, SessionPatch,
    SessionUpdate, StudyTask, Subject, Target, TargetPatch, TargetType, TargetUpdate, TaskPatch,
    User, UserMetadata,
};
use study_tracker_core::{Collection, FetchOutcome, PracticeTracker, RefreshReport};
use utoipa::{IntoParams, OpenApi, ToSchema};
use uuid::Uuid;

use crate::error::{tracker_error, HandlerError};
use crate::web::{auth, tasks};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        auth::signup_handler,
        auth::login_handler,
        auth::logout_handler,
        auth::me_handler,
        auth::update_me_handler,
        list_sessions_handler,
        create_session_handler,
        update_session_handler,
        delete_session_handler,
        list_chapters_handler,
        update_chapter_handler,
        list_targets_handler,
        create_target_handler,
        update_target_handler,
        delete_target_handler,
        target_progress_handler,
        refresh_handler,
        summary_handler,
        tasks::list_tasks_handler,
        tasks::create_task_handler,
        tasks::update_task_handler,
        tasks::delete_task_handler,
    ),
    components(
        schemas(
            auth::SignupRequest, auth::LoginRequest, auth::AuthResponse, User, UserMetadata,
            Subject, PracticeSource, Difficulty, RevisionPriority, MasteryLevel, TargetType,
            PracticeSession, NewSession, SessionPatch, SessionList,
            ChapterProgress, ChapterPatch, ChapterList,
            Target, NewTarget, TargetPatch, TargetList, TargetProgress,
            StudyTask, NewTask, TaskPatch,
            Collection, FetchOutcome, RefreshReport,
            AnalyticsSummary, Totals, SubjectTotals, SubjectAccuracy,
        )
    ),
    tags(
        (name = "auth", description = "Signup, login and the signed-in user."),
        (name = "practice", description = "Practice sessions, chapter progress and targets, served from the user's tracker."),
        (name = "analytics", description = "Totals, streaks and target progress derived from the held sessions."),
        (name = "tasks", description = "The study planner.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// `?force=true` bypasses the freshness check.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListQuery {
    #[serde(default)]
    pub force: bool,
}

/// A collection as the tracker holds it after the fetch decision.
#[derive(Serialize, ToSchema)]
pub struct SessionList {
    pub items: Vec<PracticeSession>,
    pub outcome: FetchOutcome,
    pub fetched_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, ToSchema)]
pub struct ChapterList {
    pub items: Vec<ChapterProgress>,
    pub outcome: FetchOutcome,
    pub fetched_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, ToSchema)]
pub struct TargetList {
    pub items: Vec<Target>,
    pub outcome: FetchOutcome,
    pub fetched_at: Option<DateTime<Utc>>,
}

type Tracker = Extension<Arc<PracticeTracker>>;

//=========================================================================================
// Health
//=========================================================================================

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health_handler() -> &'static str {
    "ok"
}

//=========================================================================================
// Sessions
//=========================================================================================

#[utoipa::path(
    get,
    path = "/sessions",
    params(ListQuery),
    responses(
        (status = 200, description = "The user's practice sessions, newest first", body = SessionList),
        (status = 401, description = "Not signed in")
    ),
    tag = "practice"
)]
pub async fn list_sessions_handler(
    Extension(tracker): Tracker,
    Query(query): Query<ListQuery>,
) -> Json<SessionList> {
    let outcome = tracker.fetch_sessions(query.force).await;
    Json(SessionList {
        items: tracker.sessions().await,
        outcome,
        fetched_at: tracker.last_fetched(Collection::Sessions).await,
    })
}

#[utoipa::path(
    post,
    path = "/sessions",
    request_body = NewSession,
    responses(
        (status = 201, description = "Session logged", body = PracticeSession),
        (status = 400, description = "Invalid session"),
        (status = 401, description = "Not signed in")
    ),
    tag = "practice"
)]
pub async fn create_session_handler(
    Extension(tracker): Tracker,
    Json(new): Json<NewSession>,
) -> Result<impl IntoResponse, HandlerError> {
    let session = tracker
        .add_session(new)
        .await
        .map_err(|e| tracker_error("save session", e))?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[utoipa::path(
    patch,
    path = "/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session id")),
    request_body = SessionPatch,
    responses(
        (status = 200, description = "Session updated", body = PracticeSession),
        (status = 400, description = "Invalid or empty patch"),
        (status = 404, description = "No such session")
    ),
    tag = "practice"
)]
pub async fn update_session_handler(
    Extension(tracker): Tracker,
    Path(id): Path<Uuid>,
    Json(fields): Json<SessionPatch>,
) -> Result<Json<PracticeSession>, HandlerError> {
    tracker
        .update_session(SessionUpdate { id, fields })
        .await
        .map(Json)
        .map_err(|e| tracker_error("update session", e))
}

#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 404, description = "No such session")
    ),
    tag = "practice"
)]
pub async fn delete_session_handler(
    Extension(tracker): Tracker,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HandlerError> {
    tracker
        .delete_session(id)
        .await
        .map_err(|e| tracker_error("delete session", e))?;
    Ok(StatusCode::NO_CONTENT)
}

//=========================================================================================
// Chapters
//=========================================================================================

#[utoipa::path(
    get,
    path = "/chapters",
    params(ListQuery),
    responses(
        (status = 200, description = "Chapter rollups, most recently practiced first", body = ChapterList)
    ),
    tag = "practice"
)]
pub async fn list_chapters_handler(
    Extension(tracker): Tracker,
    Query(query): Query<ListQuery>,
) -> Json<ChapterList> {
    let outcome = tracker.fetch_chapters(query.force).await;
    Json(ChapterList {
        items: tracker.chapters().await,
        outcome,
        fetched_at: tracker.last_fetched(Collection::Chapters).await,
    })
}

#[utoipa::path(
    patch,
    path = "/chapters/{id}",
    params(("id" = Uuid, Path, description = "Chapter id")),
    request_body = ChapterPatch,
    responses(
        (status = 200, description = "Chapter updated", body = ChapterProgress),
        (status = 400, description = "Empty patch"),
        (status = 404, description = "No such chapter")
    ),
    tag = "practice"
)]
pub async fn update_chapter_handler(
    Extension(tracker): Tracker,
    Path(id): Path<Uuid>,
    Json(fields): Json<ChapterPatch>,
) -> Result<Json<ChapterProgress>, HandlerError> {
    tracker
        .update_chapter(ChapterUpdate { id, fields })
        .await
        .map(Json)
        .map_err(|e| tracker_error("update chapter", e))
}

//=========================================================================================
// Targets
//=========================================================================================

#[utoipa::path(
    get,
    path = "/targets",
    params(ListQuery),
    responses((status = 200, description = "The user's targets, latest start first", body = TargetList)),
    tag = "practice"
)]
pub async fn list_targets_handler(
    Extension(tracker): Tracker,
    Query(query): Query<ListQuery>,
) -> Json<TargetList> {
    let outcome = tracker.fetch_targets(query.force).await;
    Json(TargetList {
        items: tracker.targets().await,
        outcome,
        fetched_at: tracker.last_fetched(Collection::Targets).await,
    })
}

#[utoipa::path(
    post,
    path = "/targets",
    request_body = NewTarget,
    responses(
        (status = 201, description = "Target created", body = Target),
        (status = 400, description = "Invalid date range")
    ),
    tag = "practice"
)]
pub async fn create_target_handler(
    Extension(tracker): Tracker,
    Json(new): Json<NewTarget>,
) -> Result<impl IntoResponse, HandlerError> {
    let target = tracker
        .add_target(new)
        .await
        .map_err(|e| tracker_error("save target", e))?;
    Ok((StatusCode::CREATED, Json(target)))
}

#[utoipa::path(
    patch,
    path = "/targets/{id}",
    params(("id" = Uuid, Path, description = "Target id")),
    request_body = TargetPatch,
    responses(
        (status = 200, description = "Target updated", body = Target),
        (status = 400, description = "Invalid or empty patch"),
        (status = 404, description = "No such target")
    ),
    tag = "practice"
)]
pub async fn update_target_handler(
    Extension(tracker): Tracker,
    Path(id): Path<Uuid>,
    Json(fields): Json<TargetPatch>,
) -> Result<Json<Target>, HandlerError> {
    tracker
        .update_target(TargetUpdate { id, fields })
        .await
        .map(Json)
        .map_err(|e| tracker_error("update target", e))
}

#[utoipa::path(
    delete,
    path = "/targets/{id}",
    params(("id" = Uuid, Path, description = "Target id")),
    responses(
        (status = 204, description = "Target deleted"),
        (status = 404, description = "No such target")
    ),
    tag = "practice"
)]
pub async fn delete_target_handler(
    Extension(tracker): Tracker,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HandlerError> {
    tracker
        .delete_target(id)
        .await
        .map_err(|e| tracker_error("delete target", e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Progress of every held target against the held sessions. Fetches whatever is stale
/// first.
#[utoipa::path(
    get,
    path = "/targets/progress",
    responses((status = 200, description = "Progress per target", body = [TargetProgress])),
    tag = "analytics"
)]
pub async fn target_progress_handler(Extension(tracker): Tracker) -> Json<Vec<TargetProgress>> {
    tracker.fetch_sessions(false).await;
    tracker.fetch_targets(false).await;
    Json(tracker.target_progress().await)
}

//=========================================================================================
// Refresh & Analytics
//=========================================================================================

/// Re-reads every collection whose copy is stale or empty. Clients call this when
/// they regain visibility.
#[utoipa::path(
    post,
    path = "/refresh",
    responses((status = 200, description = "What each collection did", body = RefreshReport)),
    tag = "practice"
)]
pub async fn refresh_handler(Extension(tracker): Tracker) -> Json<RefreshReport> {
    Json(tracker.refresh_stale().await)
}

#[utoipa::path(
    get,
    path = "/analytics/summary",
    responses((status = 200, description = "Totals for today, this week and overall", body = AnalyticsSummary)),
    tag = "analytics"
)]
pub async fn summary_handler(Extension(tracker): Tracker) -> Json<AnalyticsSummary> {
    tracker.fetch_sessions(false).await;
    Json(tracker.summary().await)
}
