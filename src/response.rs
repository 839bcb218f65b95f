//! Framework response value, converted to an axum response at the HTTP boundary.

use crate::error::AppError;
use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::IntoResponse;

#[derive(Clone, Debug)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl Default for Response {
    fn default() -> Self {
        Response::new(StatusCode::OK)
    }
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Response {
            status,
            headers: HeaderMap::new(),
            body: String::new(),
        }
    }

    pub fn html(status: StatusCode, body: impl Into<String>) -> Self {
        let mut r = Response::new(status);
        r.headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"));
        r.body = body.into();
        r
    }

    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        let mut r = Response::new(status);
        r.headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
        r.body = body.into();
        r
    }

    pub fn json(status: StatusCode, data: &serde_json::Value) -> Self {
        let mut r = Response::new(status);
        r.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        r.body = data.to_string();
        r
    }

    /// 302 to `location`, which must be a valid header value.
    pub fn redirect(location: &str) -> Result<Self, AppError> {
        let value = HeaderValue::from_str(location).map_err(|_| {
            AppError::InvalidArgument(format!("invalid redirect location: {}", location))
        })?;
        let mut r = Response::new(StatusCode::FOUND);
        r.headers.insert(LOCATION, value);
        Ok(r)
    }

    pub fn header(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.headers, self.body).into_response()
    }
}
