//! The front-controller router: a single fallback handler behind a body limit.

use crate::handlers::front::front;
use crate::state::AppState;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;

pub fn front_routes(state: AppState) -> Router {
    let limit = state.config.body_limit;
    Router::new()
        .fallback(front)
        .layer(ServiceBuilder::new().layer(RequestBodyLimitLayer::new(limit)))
        .with_state(state)
}
