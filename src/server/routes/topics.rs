use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::topics::{self, get_all_topics, get_topic_with_questions},
        Topic, TopicWithQuestions,
    },
    server::{app::AppState, error::ApiError, extract::{ApiJson, ApiPath}},
};

use super::{require, ApiResponse};

#[derive(Deserialize)]
struct TopicPayload {
    name: String,
    #[serde(default)]
    description: String,
}

fn topic_not_found() -> ApiError {
    ApiError::NotFound("Topic not found".to_owned())
}

async fn list_topics(State(pool): State<SqlitePool>) -> ApiResponse<Json<Vec<Topic>>> {
    Ok(Json(get_all_topics(&pool).await?))
}

async fn topic(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResponse<Json<TopicWithQuestions>> {
    get_topic_with_questions(&pool, id)
        .await?
        .map(Json)
        .ok_or_else(topic_not_found)
}

async fn create_topic(
    State(pool): State<SqlitePool>,
    ApiJson(payload): ApiJson<TopicPayload>,
) -> ApiResponse<impl IntoResponse> {
    require("name", &payload.name)?;
    let topic = topics::create_topic(&pool, payload.name.trim(), &payload.description).await?;
    tracing::info!(topic_id = topic.id, "Topic created");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Topic created successfully", "topic": topic })),
    ))
}

async fn update_topic(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<TopicPayload>,
) -> ApiResponse<impl IntoResponse> {
    require("name", &payload.name)?;
    let topic = topics::update_topic(&pool, id, payload.name.trim(), &payload.description)
        .await?
        .ok_or_else(topic_not_found)?;

    Ok(Json(
        json!({ "message": "Topic updated successfully", "topic": topic }),
    ))
}

async fn delete_topic(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResponse<impl IntoResponse> {
    if !topics::delete_topic(&pool, id).await? {
        return Err(topic_not_found());
    }
    tracing::info!(topic_id = id, "Topic deleted");
    Ok(Json(json!({ "message": "Topic deleted successfully" })))
}

pub fn topics_router(state: AppState) -> Router {
    Router::new()
        .route("/topics", get(list_topics).post(create_topic))
        .route(
            "/topics/{topic_id}",
            get(topic).put(update_topic).delete(delete_topic),
        )
        .with_state(state)
}
