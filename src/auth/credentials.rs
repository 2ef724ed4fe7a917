use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::AuthError;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 31;
pub const PASSWORD_MIN_LEN: usize = 6;
pub const PASSWORD_MAX_LEN: usize = 255;

/// Signup/login body. Both fields are optional so a missing one is reported
/// the same way as a malformed one.
#[derive(Deserialize)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

pub struct ValidCredentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(SecretString::from(password.into())),
        }
    }

    pub fn validate(self) -> Result<ValidCredentials, AuthError> {
        let username = self
            .username
            .filter(|u| is_valid_username(u))
            .ok_or(AuthError::InvalidUsername)?;
        let password = self
            .password
            .filter(|p| is_valid_password(p.expose_secret()))
            .ok_or(AuthError::InvalidPassword)?;
        Ok(ValidCredentials { username, password })
    }
}

/// `^[a-z0-9_-]{3,31}$`
pub fn is_valid_username(username: &str) -> bool {
    (USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&username.len())
        && username
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
}

pub fn is_valid_password(password: &str) -> bool {
    (PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&password.chars().count())
}
