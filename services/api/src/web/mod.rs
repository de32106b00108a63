pub mod auth;
pub mod middleware;
pub mod registry;
pub mod rest;
pub mod state;
pub mod tasks;

use std::sync::Arc;

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::{Config, ConfigError};

pub use middleware::require_auth;
pub use registry::TrackerRegistry;
pub use state::AppState;

/// Builds the API router: public auth and health routes, and everything else behind
/// `require_auth`.
pub fn router(app_state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/health", get(rest::health_handler))
        .route("/auth/signup", post(auth::signup_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler));

    let protected_routes = Router::new()
        .route(
            "/auth/me",
            get(auth::me_handler).patch(auth::update_me_handler),
        )
        .route(
            "/sessions",
            get(rest::list_sessions_handler).post(rest::create_session_handler),
        )
        .route(
            "/sessions/{id}",
            patch(rest::update_session_handler).delete(rest::delete_session_handler),
        )
        .route("/chapters", get(rest::list_chapters_handler))
        .route("/chapters/{id}", patch(rest::update_chapter_handler))
        .route(
            "/targets",
            get(rest::list_targets_handler).post(rest::create_target_handler),
        )
        .route("/targets/progress", get(rest::target_progress_handler))
        .route(
            "/targets/{id}",
            patch(rest::update_target_handler).delete(rest::delete_target_handler),
        )
        .route("/refresh", post(rest::refresh_handler))
        .route("/analytics/summary", get(rest::summary_handler))
        .route(
            "/tasks",
            get(tasks::list_tasks_handler).post(tasks::create_task_handler),
        )
        .route(
            "/tasks/{id}",
            patch(tasks::update_task_handler).delete(tasks::delete_task_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Allows the configured browser origin to call the API with its cookie.
pub fn cors_layer(config: &Config) -> Result<CorsLayer, ConfigError> {
    let origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ConfigError::InvalidValue("CORS_ORIGIN".to_string(), e.to_string())
    })?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_cors_origin() {
        let config = Config {
            cors_origin: "http://bad\norigin".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            cors_layer(&config),
            Err(ConfigError::InvalidValue(var, _)) if var == "CORS_ORIGIN"
        ));
        assert!(cors_layer(&Config::default()).is_ok());
    }
}
