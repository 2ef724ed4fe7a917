use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            questions::{self, get_questions_for_topic},
            topics::get_topic,
        },
        Question,
    },
    server::{app::AppState, error::ApiError, extract::{ApiJson, ApiPath}},
};

use super::{require, ApiResponse};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionPayload {
    title: String,
    #[serde(default)]
    is_solved: bool,
    #[serde(default)]
    link: String,
    #[serde(default)]
    youtube: String,
}

fn question_not_found() -> ApiError {
    ApiError::NotFound("Question not found".to_owned())
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    ApiPath(topic_id): ApiPath<i64>,
) -> ApiResponse<Json<Vec<Question>>> {
    if get_topic(&pool, topic_id).await?.is_none() {
        return Err(ApiError::NotFound("Topic not found".to_owned()));
    }
    Ok(Json(get_questions_for_topic(&pool, topic_id).await?))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    ApiPath(topic_id): ApiPath<i64>,
    ApiJson(payload): ApiJson<QuestionPayload>,
) -> ApiResponse<impl IntoResponse> {
    require("title", &payload.title)?;
    let question = questions::create_question(
        &pool,
        topic_id,
        payload.title.trim(),
        payload.is_solved,
        &payload.link,
        &payload.youtube,
    )
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            ApiError::NotFound("Topic not found".to_owned())
        }
        other => other.into(),
    })?;
    tracing::info!(topic_id, question_id = question.id, "Question created");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Question created successfully", "question": question })),
    ))
}

async fn update_question(
    State(pool): State<SqlitePool>,
    ApiPath((topic_id, id)): ApiPath<(i64, i64)>,
    ApiJson(payload): ApiJson<QuestionPayload>,
) -> ApiResponse<impl IntoResponse> {
    require("title", &payload.title)?;
    let question = questions::update_question(
        &pool,
        topic_id,
        id,
        payload.title.trim(),
        payload.is_solved,
        &payload.link,
        &payload.youtube,
    )
    .await?
    .ok_or_else(question_not_found)?;

    Ok(Json(
        json!({ "message": "Question updated successfully", "question": question }),
    ))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    ApiPath((topic_id, id)): ApiPath<(i64, i64)>,
) -> ApiResponse<impl IntoResponse> {
    if !questions::delete_question(&pool, topic_id, id).await? {
        return Err(question_not_found());
    }
    Ok(Json(json!({ "message": "Question deleted successfully" })))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/topics/{topic_id}/questions",
            get(list_questions).post(create_question),
        )
        .route(
            "/topics/{topic_id}/questions/{id}",
            put(update_question).delete(delete_question),
        )
        .with_state(state)
}
