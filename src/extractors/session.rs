//! Extract the session id from the request's `Cookie` header.

use crate::session::parse_session_cookie;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::header::COOKIE, http::request::Parts};
use uuid::Uuid;

/// Session id from the session cookie, if present and well-formed.
#[derive(Clone, Copy, Debug)]
pub struct SessionId(pub Option<Uuid>);

#[async_trait]
impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(parse_session_cookie);
        Ok(SessionId(value))
    }
}
