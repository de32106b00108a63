//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::web::state::AppState;

/// The cookie carrying the auth session id.
pub const SESSION_COOKIE: &str = "session";

/// Reads the auth session id from the request's `Cookie` header.
pub fn session_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())?
        .split(';')
        .find_map(|c| {
            c.trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .filter(|id| !id.is_empty())
}

/// Middleware that validates the auth session cookie.
///
/// If valid, inserts the user's `Uuid` and their `Arc<PracticeTracker>` into the
/// request extensions for handlers to use. If invalid or missing, returns 401.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_session_id = session_cookie(req.headers()).ok_or(StatusCode::UNAUTHORIZED)?;

    let user_id: Uuid = state
        .accounts
        .validate_auth_session(auth_session_id)
        .await
        .map_err(|e| {
            debug!("Rejected auth session: {}", e);
            StatusCode::UNAUTHORIZED
        })?;

    let tracker = state.trackers.get_or_create(user_id).await;
    req.extensions_mut().insert(user_id);
    req.extensions_mut().insert(tracker);

    Ok(next.run(req).await)
}
