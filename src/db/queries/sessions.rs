use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::users::User;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Session {
    pub id: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
    /// Set when validation pushed the expiry forward and the cookie has to be reissued.
    #[sqlx(skip)]
    pub fresh: bool,
}

#[derive(sqlx::FromRow)]
struct SessionWithUser {
    session_id: String,
    expires_at: DateTime<Utc>,
    user_id: i64,
    username: String,
    password_hash: String,
}

pub async fn insert_session(
    pool: &SqlitePool,
    id: &str,
    user_id: i64,
    expires_at: DateTime<Utc>,
) -> sqlx::Result<Session> {
    sqlx::query_as::<_, Session>(
        r#"
        INSERT INTO sessions (id, user_id, expires_at) VALUES (?1, ?2, ?3)
        RETURNING id, user_id, expires_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(expires_at)
    .fetch_one(pool)
    .await
}

pub async fn get_session_and_user(
    pool: &SqlitePool,
    id: &str,
) -> sqlx::Result<Option<(Session, User)>> {
    let row = sqlx::query_as::<_, SessionWithUser>(
        r#"
        SELECT sessions.id AS session_id, sessions.expires_at,
               users.id AS user_id, users.username, users.password_hash
        FROM sessions JOIN users ON sessions.user_id = users.id
        WHERE sessions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| {
        (
            Session {
                id: row.session_id,
                user_id: row.user_id,
                expires_at: row.expires_at,
                fresh: false,
            },
            User {
                id: row.user_id,
                username: row.username,
                password_hash: row.password_hash,
            },
        )
    }))
}

pub async fn update_session_expiry(
    pool: &SqlitePool,
    id: &str,
    expires_at: DateTime<Utc>,
) -> sqlx::Result<()> {
    sqlx::query("UPDATE sessions SET expires_at = ?1 WHERE sessions.id = ?2")
        .bind(expires_at)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete_session(pool: &SqlitePool, id: &str) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM sessions WHERE sessions.id = ?1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete_sessions_expired_before(
    pool: &SqlitePool,
    now: DateTime<Utc>,
) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE sessions.expires_at <= ?1")
        .bind(now)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
