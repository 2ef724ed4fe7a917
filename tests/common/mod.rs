#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use dsa_tracker::{
    auth::SessionManager,
    configuration::SessionSettings,
    db::{in_memory_pool, run_migrations},
    server::app::{build_router, AppState},
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub sessions: SessionManager,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub text: String,
}

impl TestResponse {
    /// `auth_session=<token>` from the `Set-Cookie` header, ready to send back.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("auth_session="))
            .and_then(|v| v.split(';').next())
            .map(str::to_owned)
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let pool = in_memory_pool().await.expect("in-memory database");
        run_migrations(&pool).await.expect("migrations");
        let sessions = SessionManager::new(pool.clone(), &SessionSettings::default(), false);
        let router = build_router(AppState::new(pool.clone(), sessions.clone()));
        Self {
            router,
            pool,
            sessions,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        let text = String::from_utf8_lossy(&bytes).into_owned();
        TestResponse {
            status,
            headers,
            body,
            text,
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, None, cookie).await
    }

    pub async fn post(&self, uri: &str, body: Value, cookie: Option<&str>) -> TestResponse {
        self.request(Method::POST, uri, Some(body), cookie).await
    }

    pub async fn user_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    /// Signs `username` up and returns the cookie pair for later requests.
    pub async fn signed_up(&self, username: &str, password: &str) -> String {
        let response = self
            .post(
                "/signup",
                serde_json::json!({ "username": username, "password": password }),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.session_cookie().expect("signup sets a cookie")
    }
}
