use serde::Serialize;
use sqlx::SqlitePool;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub title: String,
    pub is_solved: bool,
    pub link: String,
    pub youtube: String,
    pub topic_id: i64,
}

pub async fn create_question(
    pool: &SqlitePool,
    topic_id: i64,
    title: &str,
    is_solved: bool,
    link: &str,
    youtube: &str,
) -> sqlx::Result<Question> {
    sqlx::query_as::<_, Question>(
        r#"
        INSERT INTO questions (title, is_solved, link, youtube, topic_id) VALUES (?1, ?2, ?3, ?4, ?5)
        RETURNING id, title, is_solved, link, youtube, topic_id
        "#,
    )
    .bind(title)
    .bind(is_solved)
    .bind(link)
    .bind(youtube)
    .bind(topic_id)
    .fetch_one(pool)
    .await
}

pub async fn get_questions_for_topic(pool: &SqlitePool, topic_id: i64) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, title, is_solved, link, youtube, topic_id
        FROM questions WHERE questions.topic_id = ?1 ORDER BY id
        "#,
    )
    .bind(topic_id)
    .fetch_all(pool)
    .await
}

pub async fn update_question(
    pool: &SqlitePool,
    topic_id: i64,
    id: i64,
    title: &str,
    is_solved: bool,
    link: &str,
    youtube: &str,
) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        UPDATE questions SET title = ?1, is_solved = ?2, link = ?3, youtube = ?4
        WHERE questions.id = ?5 AND questions.topic_id = ?6
        RETURNING id, title, is_solved, link, youtube, topic_id
        "#,
    )
    .bind(title)
    .bind(is_solved)
    .bind(link)
    .bind(youtube)
    .bind(id)
    .bind(topic_id)
    .fetch_optional(pool)
    .await
}

pub async fn delete_question(pool: &SqlitePool, topic_id: i64, id: i64) -> sqlx::Result<bool> {
    let result =
        sqlx::query("DELETE FROM questions WHERE questions.id = ?1 AND questions.topic_id = ?2")
            .bind(id)
            .bind(topic_id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected() > 0)
}
