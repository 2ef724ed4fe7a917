use serde::Serialize;
use sqlx::SqlitePool;

use super::questions::{get_questions_for_topic, Question};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Topic {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct TopicWithQuestions {
    #[serde(flatten)]
    pub topic: Topic,
    pub questions: Vec<Question>,
}

pub async fn create_topic(pool: &SqlitePool, name: &str, description: &str) -> sqlx::Result<Topic> {
    sqlx::query_as::<_, Topic>(
        r#"
        INSERT INTO topics (name, description) VALUES (?1, ?2)
        RETURNING id, name, description
        "#,
    )
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await
}

pub async fn get_all_topics(pool: &SqlitePool) -> sqlx::Result<Vec<Topic>> {
    sqlx::query_as::<_, Topic>(
        r#"
        SELECT id, name, description FROM topics ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_topic(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Topic>> {
    sqlx::query_as::<_, Topic>(
        r#"
        SELECT id, name, description FROM topics WHERE topics.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn get_topic_with_questions(
    pool: &SqlitePool,
    id: i64,
) -> sqlx::Result<Option<TopicWithQuestions>> {
    let Some(topic) = get_topic(pool, id).await? else {
        return Ok(None);
    };
    let questions = get_questions_for_topic(pool, id).await?;
    Ok(Some(TopicWithQuestions { topic, questions }))
}

pub async fn update_topic(
    pool: &SqlitePool,
    id: i64,
    name: &str,
    description: &str,
) -> sqlx::Result<Option<Topic>> {
    sqlx::query_as::<_, Topic>(
        r#"
        UPDATE topics SET name = ?1, description = ?2 WHERE topics.id = ?3
        RETURNING id, name, description
        "#,
    )
    .bind(name)
    .bind(description)
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Returns `false` when there was no such topic. Questions go with it.
pub async fn delete_topic(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM topics WHERE topics.id = ?1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::queries::questions::create_question;
    use crate::db::test_pool;

    #[tokio::test]
    async fn topic_lifecycle() {
        let pool = test_pool().await;
        let topic = create_topic(&pool, "Arrays", "Two pointers and friends")
            .await
            .unwrap();

        let updated = update_topic(&pool, topic.id, "Arrays & Hashing", "")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Arrays & Hashing");
        assert_eq!(get_all_topics(&pool).await.unwrap(), vec![updated]);

        assert!(delete_topic(&pool, topic.id).await.unwrap());
        assert!(!delete_topic(&pool, topic.id).await.unwrap());
        assert!(get_topic(&pool, topic.id).await.unwrap().is_none());
        assert!(update_topic(&pool, topic.id, "x", "y").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleting_topic_removes_its_questions() {
        let pool = test_pool().await;
        let topic = create_topic(&pool, "Graphs", "").await.unwrap();
        create_question(&pool, topic.id, "Number of Islands", false, "", "")
            .await
            .unwrap();

        let with_questions = get_topic_with_questions(&pool, topic.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(with_questions.questions.len(), 1);

        delete_topic(&pool, topic.id).await.unwrap();
        assert!(get_questions_for_topic(&pool, topic.id)
            .await
            .unwrap()
            .is_empty());
    }
}
