//! Front handler: every request, whatever its path, is dispatched through the router.

use crate::extractors::session::SessionId;
use crate::request::Request;
use crate::response::Response;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, Method, Uri},
    Form,
};
use std::collections::HashMap;

pub async fn front(
    State(state): State<AppState>,
    SessionId(session): SessionId,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    form: Option<Form<HashMap<String, String>>>,
) -> Response {
    let path = state.config.strip_base_path(uri.path()).to_string();
    let request = Request::new(method, uri)
        .with_headers(headers)
        .with_form(form.map(|Form(f)| f).unwrap_or_default())
        .with_session(session);
    state.router.dispatch(&state, &path, &request).await
}
