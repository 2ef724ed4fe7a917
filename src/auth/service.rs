use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;

use super::{
    credentials::{Credentials, ValidCredentials},
    password, AuthError, SessionManager,
};
use crate::db::{queries::users, Session};

pub async fn signup(
    pool: &SqlitePool,
    sessions: &SessionManager,
    credentials: Credentials,
) -> Result<Session, AuthError> {
    let ValidCredentials { username, password } = credentials.validate()?;

    let password_hash = tokio::task::spawn_blocking(move || {
        password::hash_password(password.expose_secret()).map_err(AuthError::Hashing)
    })
    .await??;

    let user = match users::create_user(pool, &username, &password_hash).await {
        Ok(user) => user,
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(AuthError::UsernameTaken)
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(user_id = user.id, username = %user.username, "User signed up");

    Ok(sessions.create_session(user.id).await?)
}

pub async fn login(
    pool: &SqlitePool,
    sessions: &SessionManager,
    credentials: Credentials,
) -> Result<Session, AuthError> {
    let ValidCredentials { username, password } = credentials.validate()?;

    let Some(user) = users::get_user_by_username(pool, &username).await? else {
        verify(password, None).await?;
        return Err(AuthError::IncorrectCredentials);
    };

    if !verify(password, Some(user.password_hash.clone())).await? {
        return Err(AuthError::IncorrectCredentials);
    }
    tracing::info!(user_id = user.id, "User logged in");

    Ok(sessions.create_session(user.id).await?)
}

/// Without a stored hash the dummy one is checked, keeping both failure paths equally slow.
async fn verify(password: SecretString, hash: Option<String>) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || {
        let secret = password.expose_secret();
        match hash {
            Some(hash) => password::verify_password(secret, &hash),
            None => password::verify_dummy(secret),
        }
        .map_err(AuthError::Hashing)
    })
    .await?
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::configuration::SessionSettings;
    use crate::db::test_pool;

    async fn setup() -> (SqlitePool, SessionManager) {
        let pool = test_pool().await;
        let sessions = SessionManager::new(pool.clone(), &SessionSettings::default(), false);
        (pool, sessions)
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_store() {
        let (pool, sessions) = setup().await;
        pool.close().await;

        let bad_username = signup(&pool, &sessions, Credentials::new("ab", "123456")).await;
        assert!(matches!(bad_username, Err(AuthError::InvalidUsername)));

        let bad_password = login(&pool, &sessions, Credentials::new("abc", "123")).await;
        assert!(matches!(bad_password, Err(AuthError::InvalidPassword)));

        let valid = login(&pool, &sessions, Credentials::new("abc", "123456")).await;
        assert!(matches!(valid, Err(AuthError::Store(_))));
    }

    #[tokio::test]
    async fn duplicate_signup_is_a_conflict() {
        let (pool, sessions) = setup().await;
        signup(&pool, &sessions, Credentials::new("abc", "123456"))
            .await
            .unwrap();

        let again = signup(&pool, &sessions, Credentials::new("abc", "654321")).await;
        assert!(matches!(again, Err(AuthError::UsernameTaken)));
        assert_eq!(users::count_users(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn signup_session_belongs_to_new_user() {
        let (pool, sessions) = setup().await;
        let session = signup(&pool, &sessions, Credentials::new("abc", "123456"))
            .await
            .unwrap();

        let (_, user) = sessions.validate_session(&session.id).await.unwrap().unwrap();
        assert_eq!(user.username, "abc");
        assert_ne!(user.password_hash, "123456");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let (pool, sessions) = setup().await;
        signup(&pool, &sessions, Credentials::new("abc", "123456"))
            .await
            .unwrap();

        let wrong_password = login(&pool, &sessions, Credentials::new("abc", "1234567"))
            .await
            .unwrap_err();
        let unknown_user = login(&pool, &sessions, Credentials::new("xyz", "123456"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AuthError::IncorrectCredentials));
        assert!(matches!(unknown_user, AuthError::IncorrectCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn unknown_user_costs_as_much_as_wrong_password() {
        let (pool, sessions) = setup().await;
        signup(&pool, &sessions, Credentials::new("abc", "123456"))
            .await
            .unwrap();
        // warm the dummy hash so its one-off computation is not measured
        login(&pool, &sessions, Credentials::new("nobody", "123456"))
            .await
            .unwrap_err();

        let mut unknown_user = Duration::ZERO;
        let mut wrong_password = Duration::ZERO;
        for _ in 0..3 {
            let started = Instant::now();
            login(&pool, &sessions, Credentials::new("nobody", "123456"))
                .await
                .unwrap_err();
            unknown_user += started.elapsed();

            let started = Instant::now();
            login(&pool, &sessions, Credentials::new("abc", "654321"))
                .await
                .unwrap_err();
            wrong_password += started.elapsed();
        }

        // without the dummy verify the gap is around fifty-fold
        assert!(
            unknown_user * 3 >= wrong_password,
            "unknown user {unknown_user:?} vs wrong password {wrong_password:?}"
        );
    }

    #[tokio::test]
    async fn login_issues_a_new_session() {
        let (pool, sessions) = setup().await;
        let first = signup(&pool, &sessions, Credentials::new("abc", "123456"))
            .await
            .unwrap();

        let second = login(&pool, &sessions, Credentials::new("abc", "123456"))
            .await
            .unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(first.user_id, second.user_id);
    }
}
