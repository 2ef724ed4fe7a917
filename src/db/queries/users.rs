use sqlx::SqlitePool;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
) -> sqlx::Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, password_hash) VALUES (?1, ?2)
        RETURNING id, username, password_hash
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .fetch_one(pool)
    .await
}

pub async fn get_user_by_username(pool: &SqlitePool, username: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password_hash FROM users WHERE users.username = ?1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

#[cfg(test)]
pub(crate) async fn count_users(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn username_is_unique() {
        let pool = test_pool().await;
        create_user(&pool, "alice", "hash").await.unwrap();

        let err = create_user(&pool, "alice", "other").await.unwrap_err();
        match err {
            sqlx::Error::Database(e) => assert!(e.is_unique_violation()),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(count_users(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn lookup_by_username() {
        let pool = test_pool().await;
        let created = create_user(&pool, "bob_1", "hash").await.unwrap();

        let by_name = get_user_by_username(&pool, "bob_1").await.unwrap();
        assert_eq!(by_name, Some(created));
        assert!(get_user_by_username(&pool, "nobody").await.unwrap().is_none());
    }
}
