//! Per-request authentication context.
//!
//! [`load_session`] runs in front of every route: it resolves the session
//! cookie once, stores a [`RequestContext`] in the request extensions and, on
//! the way out, refreshes or clears the cookie when the session was extended
//! or turned out to be stale. Handlers pull the context with the
//! [`RequestContext`] extractor.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::SET_COOKIE, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::{
    auth::{SessionCookie, SessionManager},
    db::{Session, User},
};

use super::error::ApiError;

#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    pub session: Option<Session>,
    pub user: Option<User>,
}

impl RequestContext {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_default())
    }
}

pub async fn load_session(
    State(sessions): State<SessionManager>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = sessions.read_session_id(request.headers()) else {
        request.extensions_mut().insert(RequestContext::default());
        return Ok(next.run(request).await);
    };

    let (context, cookie) = match sessions.validate_session(&token).await? {
        Some((session, user)) => {
            let cookie = session.fresh.then(|| sessions.session_cookie(&session));
            let context = RequestContext {
                session: Some(session),
                user: Some(user),
            };
            (context, cookie)
        }
        None => (RequestContext::default(), Some(sessions.blank_cookie())),
    };
    request.extensions_mut().insert(context);

    let mut response = next.run(request).await;
    if let Some(cookie) = cookie {
        if !sets_cookie(&response, &cookie) {
            response
                .headers_mut()
                .append(SET_COOKIE, cookie.header_value()?);
        }
    }
    Ok(response)
}

/// Whether the handler already issued its own cookie under the same name.
fn sets_cookie(response: &Response, cookie: &SessionCookie) -> bool {
    let prefix = format!("{}=", cookie.name);
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.starts_with(&prefix))
}
