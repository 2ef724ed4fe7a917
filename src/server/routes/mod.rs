mod auth;
mod questions;
mod topics;

pub use auth::auth_router;
pub use questions::questions_router;
pub use topics::topics_router;

use super::error::ApiError;

pub type ApiResponse<T> = Result<T, ApiError>;

/// Required text fields may not be blank.
fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} is required")));
    }
    Ok(())
}
