pub mod queries;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

pub use queries::questions::Question;
pub use queries::sessions::Session;
pub use queries::topics::{Topic, TopicWithQuestions};
pub use queries::users::User;

use sqlx::Error;

use crate::configuration::DatabaseSettings;

pub async fn establish_connection(settings: &DatabaseSettings) -> Result<SqlitePool, Error> {
    let options = SqliteConnectOptions::from_str(format!("sqlite:{}", settings.path).as_str())?
        .create_if_missing(true)
        .foreign_keys(true);
    SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await
}

/// Single-connection pool over a private in-memory database.
///
/// Every connection to `sqlite::memory:` opens a fresh database, so the pool
/// is pinned to one connection that never expires.
pub async fn in_memory_pool() -> Result<SqlitePool, Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn ping(pool: &SqlitePool) -> Result<(), Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = in_memory_pool().await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}
