//! Credential checks, password hashing and cookie-backed sessions.

pub mod credentials;
pub mod password;
pub mod service;
pub mod session;

use argon2::password_hash;
use thiserror::Error;

pub use credentials::Credentials;
pub use service::{login, signup};
pub use session::{SessionCookie, SessionManager};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username")]
    InvalidUsername,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Username already taken")]
    UsernameTaken,

    /// Shared by "no such user" and "wrong password" so usernames can't be enumerated.
    #[error("Incorrect username or password")]
    IncorrectCredentials,

    #[error("Password hashing failed: {0}")]
    Hashing(password_hash::Error),

    #[error(transparent)]
    Store(#[from] sqlx::Error),

    #[error("Password task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
