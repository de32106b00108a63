//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for user signup, login, and logout, plus the
//! signed-in user's profile.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use study_tracker_core::domain::{User, UserMetadata};
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{port_error, HandlerError};
use crate::web::middleware::{session_cookie, SESSION_COOKIE};
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub email: String,
}

//=========================================================================================
// Helpers
//=========================================================================================

/// Starts an auth session for the user and returns the `Set-Cookie` value.
async fn start_session(state: &AppState, user_id: Uuid) -> Result<String, HandlerError> {
    let days = state.config.auth_session_days;
    let (lifetime, expires_at) = Duration::try_days(days)
        .and_then(|lifetime| Some((lifetime, Utc::now().checked_add_signed(lifetime)?)))
        .ok_or_else(|| {
            error!("Session lifetime of {} days is out of range", days);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create session".to_string(),
            )
        })?;
    let auth_session_id = Uuid::new_v4().to_string();

    state
        .accounts
        .create_auth_session(&auth_session_id, user_id, expires_at)
        .await
        .map_err(|e| port_error("create session", e))?;

    state.trackers.sign_in(user_id).await;

    Ok(format!(
        "{}={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE,
        auth_session_id,
        lifetime.num_seconds()
    ))
}

fn invalid_credentials() -> HandlerError {
    (StatusCode::UNAUTHORIZED, "Invalid email or password".to_string())
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/signup - Create a new user account
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created successfully", body = AuthResponse),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error")
    ),
    tag = "auth"
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || req.password.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Email and password are required".to_string(),
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to hash password".to_string())
        })?
        .to_string();

    let user = state
        .accounts
        .create_user_with_email(&email, &password_hash)
        .await
        .map_err(|e| port_error("create user", e))?;

    let cookie = start_session(&state, user.user_id).await?;
    info!("User {} signed up", user.user_id);

    let response = AuthResponse {
        user_id: user.user_id,
        email: user.email.unwrap_or(email),
    };
    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(response),
    ))
}

/// POST /auth/login - Login with existing account
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let email = req.email.trim().to_lowercase();
    let user_creds = state
        .accounts
        .get_user_by_email(&email)
        .await
        .map_err(|e| match e {
            study_tracker_core::PortError::NotFound(_) => invalid_credentials(),
            other => port_error("look up user", other),
        })?;

    let parsed_hash = PasswordHash::new(&user_creds.hashed_password).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Authentication error".to_string())
    })?;
    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| invalid_credentials())?;

    let cookie = start_session(&state, user_creds.user_id).await?;
    info!("User {} logged in", user_creds.user_id);

    let response = AuthResponse {
        user_id: user_creds.user_id,
        email: user_creds.email,
    };
    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(response)))
}

/// POST /auth/logout - Logout, invalidate the session and drop the user's tracker
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 401, description = "No active session")
    ),
    tag = "auth"
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, HandlerError> {
    let auth_session_id = session_cookie(&headers)
        .ok_or((StatusCode::UNAUTHORIZED, "No session found".to_string()))?;

    // An expired or unknown cookie still gets cleared below.
    if let Ok(user_id) = state.accounts.validate_auth_session(auth_session_id).await {
        state.trackers.sign_out(user_id).await;
        info!("User {} logged out", user_id);
    }

    state
        .accounts
        .delete_auth_session(auth_session_id)
        .await
        .map_err(|e| port_error("log out", e))?;

    let cookie = format!(
        "{}=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0",
        SESSION_COOKIE
    );
    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)]))
}

/// GET /auth/me - The signed-in user's profile
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not signed in")
    ),
    tag = "auth"
)]
pub async fn me_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<User>, HandlerError> {
    state
        .accounts
        .get_user(user_id)
        .await
        .map(Json)
        .map_err(|e| port_error("load user", e))
}

/// PATCH /auth/me - Update the signed-in user's display name or exam goal
#[utoipa::path(
    patch,
    path = "/auth/me",
    request_body = UserMetadata,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 401, description = "Not signed in")
    ),
    tag = "auth"
)]
pub async fn update_me_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(metadata): Json<UserMetadata>,
) -> Result<Json<User>, HandlerError> {
    state
        .accounts
        .update_user_metadata(user_id, &metadata)
        .await
        .map(Json)
        .map_err(|e| port_error("update user", e))
}
