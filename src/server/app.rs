use axum::http::header;
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};
use axum::{extract::FromRef, extract::State, http::StatusCode, routing::get, Json, Router};
use prometheus::{Encoder, TextEncoder};
use routes::{auth_router, questions_router, topics_router};
use serde_json::json;
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::context::load_session;
use super::error::ApiError;
use super::routes;
use crate::auth::SessionManager;
use crate::configuration::{Environment, Settings};
use crate::db;

#[derive(FromRef, Clone)]
pub struct AppState {
    pool: SqlitePool,
    sessions: SessionManager,
}

impl AppState {
    pub fn new(pool: SqlitePool, sessions: SessionManager) -> Self {
        Self { pool, sessions }
    }

    pub fn from_settings(pool: SqlitePool, settings: &Settings) -> Self {
        let secure = settings.application.environment == Environment::Production;
        let sessions = SessionManager::new(pool.clone(), &settings.session, secure);
        Self::new(pool, sessions)
    }
}

pub fn build_router(state: AppState) -> Router {
    let api = topics_router(state.clone()).merge(questions_router(state.clone()));

    Router::new()
        .route("/db-test", get(db_test))
        .route("/metrics", get(metrics))
        .with_state(state.clone())
        .merge(auth_router(state.clone()))
        .nest("/api", api)
        .fallback(|| async {
            tracing::info!("Fallback");
            (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
        })
        .layer(from_fn_with_state(state, load_session))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

pub async fn run_server(pool: SqlitePool, settings: &Settings) -> anyhow::Result<()> {
    let addr = settings.application.address()?;
    let app = build_router(AppState::from_settings(pool.clone(), settings));
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Serving on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Closing database pool");
    pool.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

async fn db_test(State(pool): State<SqlitePool>) -> Response {
    match db::ping(&pool).await {
        Ok(()) => Json(json!({ "message": "Database connected successfully!" })).into_response(),
        Err(e) => {
            tracing::error!("Error connecting to the database: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Database connection failed" })),
            )
                .into_response()
        }
    }
}

async fn metrics() -> Result<Response, ApiError> {
    let encoder = TextEncoder::new();
    let metrics = prometheus::gather();
    let mut buf = vec![];
    encoder
        .encode(&metrics, &mut buf)
        .map_err(|e| ApiError::Internal(e.into()))?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, encoder.format_type().to_owned())],
        buf,
    )
        .into_response())
}
