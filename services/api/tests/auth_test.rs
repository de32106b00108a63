mod common;

use axum::http::{Method, StatusCode};
use api_lib::config::Config;
use common::{cookie_pair, test_app, test_app_with};
use serde_json::json;

#[tokio::test]
async fn protected_routes_reject_requests_without_a_session_cookie() {
    let app = test_app();

    let cases = [
        (Method::GET, "/auth/me"),
        (Method::GET, "/sessions"),
        (Method::POST, "/sessions"),
        (Method::GET, "/chapters"),
        (Method::GET, "/targets"),
        (Method::GET, "/targets/progress"),
        (Method::POST, "/refresh"),
        (Method::GET, "/analytics/summary"),
        (Method::GET, "/tasks"),
    ];

    for (method, uri) in cases {
        let reply = app.send(method, uri, None, None).await;
        assert_eq!(
            reply.status,
            StatusCode::UNAUTHORIZED,
            "expected UNAUTHORIZED for {uri}",
        );
    }

    let reply = app
        .send(Method::GET, "/sessions", Some("session=not-a-session"), None)
        .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_is_public() {
    let app = test_app();
    let reply = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn signup_starts_a_session_and_a_tracker() {
    let app = test_app();
    let cookie = app.sign_up("Asha@Example.com").await;

    assert_eq!(app.state.trackers.len().await, 1);

    let me = app.get("/auth/me", &cookie).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["email"], "asha@example.com");
    assert!(me.body["display_name"].is_null());
}

#[tokio::test]
async fn duplicate_signup_conflicts() {
    let app = test_app();
    app.sign_up("asha@example.com").await;

    let reply = app
        .send(
            Method::POST,
            "/auth/signup",
            None,
            Some(json!({ "email": "asha@example.com", "password": "another" })),
        )
        .await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_checks_the_password() {
    let app = test_app();
    app.sign_up("asha@example.com").await;

    let wrong = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "asha@example.com", "password": "nope" })),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let unknown = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "ravi@example.com", "password": "correct horse" })),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);

    let ok = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "asha@example.com", "password": "correct horse" })),
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    let cookie = cookie_pair(&ok);
    assert_eq!(app.get("/auth/me", &cookie).await.status, StatusCode::OK);
}

#[tokio::test]
async fn logout_discards_the_tracker_and_the_cookie() {
    let app = test_app();
    let cookie = app.sign_up("asha@example.com").await;

    let reply = app.send(Method::POST, "/auth/logout", Some(&cookie), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply
        .set_cookie
        .as_deref()
        .is_some_and(|c| c.contains("Max-Age=0")));
    assert_eq!(app.state.trackers.len().await, 0);

    let after = app.get("/sessions", &cookie).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.state.trackers.len().await, 0);
}

#[tokio::test]
async fn missing_tracker_is_recreated_for_a_valid_cookie() {
    let app = test_app();
    let cookie = app.sign_up("asha@example.com").await;
    let me = app.get("/auth/me", &cookie).await;
    let user_id: uuid::Uuid = me.body["user_id"]
        .as_str()
        .and_then(|id| id.parse().ok())
        .expect("user id");

    app.state.trackers.sign_out(user_id).await;
    assert_eq!(app.state.trackers.len().await, 0);

    let reply = app.get("/sessions", &cookie).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(app.state.trackers.get(user_id).await.is_some());
}

#[tokio::test]
async fn profile_metadata_can_be_updated() {
    let app = test_app();
    let cookie = app.sign_up("asha@example.com").await;

    let reply = app
        .patch(
            "/auth/me",
            &cookie,
            json!({ "display_name": "Asha", "exam_goal": "JEE Advanced" }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["display_name"], "Asha");

    let me = app.get("/auth/me", &cookie).await;
    assert_eq!(me.body["exam_goal"], "JEE Advanced");
}

#[tokio::test]
async fn unrepresentable_session_lifetime_fails_without_panicking() {
    let app = test_app_with(Config {
        auth_session_days: i64::MAX / 2,
        ..Config::default()
    });

    let reply = app
        .send(
            Method::POST,
            "/auth/signup",
            None,
            Some(json!({ "email": "asha@example.com", "password": "correct horse" })),
        )
        .await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(reply.set_cookie.is_none());
}
