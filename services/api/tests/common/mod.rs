#![allow(dead_code)]

use std::sync::Arc;

use api_lib::{
    adapters::MemoryAdapter,
    config::Config,
    web::{router, state::AppState},
};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use study_tracker_core::ManualClock;
use tower::ServiceExt;

/// 06:00 UTC, 11:30 on 2024-03-10 in the default study calendar.
pub fn start_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 6, 0, 0).unwrap()
}

pub const TODAY: &str = "2024-03-10";

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub clock: Arc<ManualClock>,
}

pub fn test_app() -> TestApp {
    test_app_with(Config::default())
}

pub fn test_app_with(config: Config) -> TestApp {
    let clock = Arc::new(ManualClock::new(start_instant()));
    let state = Arc::new(AppState::new(
        Arc::new(MemoryAdapter::new()),
        clock.clone(),
        Arc::new(config),
    ));
    TestApp {
        router: router(state.clone()),
        state,
        clock,
    }
}

pub struct Reply {
    pub status: StatusCode,
    pub set_cookie: Option<String>,
    pub body: Value,
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> Reply {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        let body = match body {
            Some(json) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let resp = self
            .router
            .clone()
            .oneshot(req.body(body).expect("request build should succeed"))
            .await
            .expect("router should respond");

        let status = resp.status();
        let set_cookie = resp
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        Reply {
            status,
            set_cookie,
            body,
        }
    }

    pub async fn get(&self, uri: &str, cookie: &str) -> Reply {
        self.send(Method::GET, uri, Some(cookie), None).await
    }

    pub async fn post(&self, uri: &str, cookie: &str, body: Value) -> Reply {
        self.send(Method::POST, uri, Some(cookie), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, cookie: &str, body: Value) -> Reply {
        self.send(Method::PATCH, uri, Some(cookie), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, cookie: &str) -> Reply {
        self.send(Method::DELETE, uri, Some(cookie), None).await
    }

    /// Signs up a new account and returns the `session=...` pair for the `Cookie` header.
    pub async fn sign_up(&self, email: &str) -> String {
        let reply = self
            .send(
                Method::POST,
                "/auth/signup",
                None,
                Some(json!({ "email": email, "password": "correct horse" })),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "signup failed: {}", reply.body);
        cookie_pair(&reply)
    }
}

impl TestApp {
    /// The signed-in user's id, read back from `/auth/me`.
    pub async fn user_id(&self, cookie: &str) -> uuid::Uuid {
        let me = self.get("/auth/me", cookie).await;
        me.body["user_id"]
            .as_str()
            .and_then(|id| id.parse().ok())
            .expect("user id")
    }
}

pub fn cookie_pair(reply: &Reply) -> String {
    reply
        .set_cookie
        .as_deref()
        .and_then(|c| c.split(';').next())
        .expect("response should set the session cookie")
        .to_string()
}

pub fn session_body(chapter: &str, solved: u32, minutes: u32) -> Value {
    json!({
        "date": TODAY,
        "subject": "Physics",
        "chapter_name": chapter,
        "source": "module",
        "questions_target": 30,
        "questions_solved": solved,
        "time_spent": minutes,
        "accuracy_percentage": 80.0
    })
}
