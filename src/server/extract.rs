use axum::extract::{FromRequest, FromRequestParts};

use super::error::ApiError;

/// `Json` whose rejections come back as our 400 payload instead of axum's plain text.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Path` with the same treatment, so `/api/topics/abc` answers in JSON too.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
