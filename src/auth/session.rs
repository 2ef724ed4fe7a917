//! Server-side sessions referenced by an opaque cookie token.
//!
//! A session lives for `expires_in`. Once it enters the second half of that
//! window, validating it pushes the expiry out again and marks it `fresh`, so
//! the caller knows to send the cookie back with the new `Max-Age`. Expired
//! records are dropped the moment someone presents them.

use std::fmt;

use argon2::password_hash::rand_core::{OsRng, RngCore};
use axum::{
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue,
    },
    response::{IntoResponseParts, ResponseParts},
};
use chrono::{TimeDelta, Utc};
use sqlx::SqlitePool;

use crate::{
    configuration::SessionSettings,
    db::{queries::sessions, Session, User},
    server::error::ApiError,
};

/// Bytes of entropy per token before hex encoding.
const TOKEN_BYTES: usize = 25;

#[derive(Clone)]
pub struct SessionManager {
    pool: SqlitePool,
    cookie_name: String,
    expires_in: TimeDelta,
    secure: bool,
}

impl SessionManager {
    /// `settings` must have passed [`SessionSettings::validate`].
    pub fn new(pool: SqlitePool, settings: &SessionSettings, secure: bool) -> Self {
        Self {
            pool,
            cookie_name: settings.cookie_name.clone(),
            expires_in: TimeDelta::days(settings.expires_in_days),
            secure,
        }
    }

    pub async fn create_session(&self, user_id: i64) -> sqlx::Result<Session> {
        let id = generate_session_id();
        let expires_at = Utc::now() + self.expires_in;
        let session = sessions::insert_session(&self.pool, &id, user_id, expires_at).await?;
        tracing::debug!(user_id, "Session created");
        Ok(session)
    }

    /// `None` when the token is unknown or expired.
    pub async fn validate_session(&self, token: &str) -> sqlx::Result<Option<(Session, User)>> {
        let Some((mut session, user)) = sessions::get_session_and_user(&self.pool, token).await?
        else {
            return Ok(None);
        };

        let now = Utc::now();
        if now >= session.expires_at {
            sessions::delete_session(&self.pool, &session.id).await?;
            tracing::debug!(user_id = user.id, "Expired session removed");
            return Ok(None);
        }

        if now >= session.expires_at - self.expires_in / 2 {
            session.expires_at = now + self.expires_in;
            sessions::update_session_expiry(&self.pool, &session.id, session.expires_at).await?;
            session.fresh = true;
        }

        Ok(Some((session, user)))
    }

    /// Deleting an unknown token is not an error.
    pub async fn invalidate_session(&self, token: &str) -> sqlx::Result<()> {
        sessions::delete_session(&self.pool, token).await
    }

    pub async fn delete_expired_sessions(&self) -> sqlx::Result<u64> {
        sessions::delete_sessions_expired_before(&self.pool, Utc::now()).await
    }

    pub fn session_cookie(&self, session: &Session) -> SessionCookie {
        SessionCookie {
            name: self.cookie_name.clone(),
            value: session.id.clone(),
            max_age: self.expires_in.num_seconds(),
            secure: self.secure,
        }
    }

    /// Cookie that makes the client forget whatever token it holds.
    pub fn blank_cookie(&self) -> SessionCookie {
        SessionCookie {
            name: self.cookie_name.clone(),
            value: String::new(),
            max_age: 0,
            secure: self.secure,
        }
    }

    pub fn read_session_id(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, value)| *name == self.cookie_name && !value.is_empty())
            .map(|(_, value)| value.to_owned())
    }
}

fn generate_session_id() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    pub max_age: i64,
    pub secure: bool,
}

impl SessionCookie {
    pub fn header_value(&self) -> Result<HeaderValue, ApiError> {
        HeaderValue::from_str(&self.to_string())
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("Unencodable cookie: {e}")))
    }
}

impl fmt::Display for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
            self.name, self.value, self.max_age
        )?;
        if self.secure {
            f.write_str("; Secure")?;
        }
        Ok(())
    }
}

impl IntoResponseParts for SessionCookie {
    type Error = ApiError;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        res.headers_mut().append(SET_COOKIE, self.header_value()?);
        Ok(res)
    }
}
