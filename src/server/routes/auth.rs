use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    auth::{self, AuthError, Credentials, SessionManager},
    server::{app::AppState, context::RequestContext, error::ApiError, extract::ApiJson},
    telemetry::record_auth_event,
};

use super::ApiResponse;

async fn index(context: RequestContext) -> Response {
    match context.user {
        Some(user) => Json(json!({
            "username": user.username,
            "user_id": user.id,
        }))
        .into_response(),
        None => Redirect::to("/login").into_response(),
    }
}

async fn signup_page(context: RequestContext) -> Json<serde_json::Value> {
    if context.is_authenticated() {
        return Json(json!({ "redirect": "/" }));
    }
    Json(json!({ "message": "Please sign up" }))
}

async fn login_page(context: RequestContext) -> Json<serde_json::Value> {
    if context.is_authenticated() {
        return Json(json!({ "redirect": "/" }));
    }
    Json(json!({ "message": "Please log in" }))
}

async fn signup(
    State(pool): State<SqlitePool>,
    State(sessions): State<SessionManager>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> ApiResponse<impl IntoResponse> {
    let session = auth::signup(&pool, &sessions, credentials)
        .await
        .inspect_err(|e| record_failure("signup", e))?;
    record_auth_event("signup", "success");

    Ok((
        sessions.session_cookie(&session),
        Json(json!({ "message": "Signup successful", "redirect": "/" })),
    ))
}

async fn login(
    State(pool): State<SqlitePool>,
    State(sessions): State<SessionManager>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> ApiResponse<impl IntoResponse> {
    let session = auth::login(&pool, &sessions, credentials)
        .await
        .inspect_err(|e| record_failure("login", e))?;
    record_auth_event("login", "success");

    Ok((
        sessions.session_cookie(&session),
        Json(json!({ "message": "Login successful", "redirect": "/" })),
    ))
}

async fn logout(
    State(sessions): State<SessionManager>,
    context: RequestContext,
) -> ApiResponse<impl IntoResponse> {
    let Some(session) = context.session else {
        return Err(ApiError::Unauthorized("Not logged in".to_owned()));
    };
    sessions.invalidate_session(&session.id).await?;
    record_auth_event("logout", "success");
    tracing::info!(user_id = session.user_id, "User logged out");

    Ok((
        StatusCode::OK,
        sessions.blank_cookie(),
        Json(json!({ "message": "Logout successful", "redirect": "/login" })),
    ))
}

fn record_failure(event: &str, error: &AuthError) {
    let outcome = match error {
        AuthError::InvalidUsername | AuthError::InvalidPassword => "invalid",
        AuthError::UsernameTaken => "conflict",
        AuthError::IncorrectCredentials => "rejected",
        AuthError::Hashing(_) | AuthError::Store(_) | AuthError::Task(_) => "error",
    };
    record_auth_event(event, outcome);
}

pub fn auth_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/signup", get(signup_page).post(signup))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout).post(logout))
        .with_state(state)
}
