//! Front controller: maps a request path to a registered controller action and turns every
//! dispatch failure into an HTTP error page.

mod error_page;
mod registry;
mod route;

pub use error_page::ErrorPage;
pub use registry::{ControllerFactory, ControllerRegistry};
pub use route::{Route, DEFAULT_CONTROLLER_KEY, DEFAULT_METHOD};

use crate::controller::{Context, Controller};
use crate::error::DispatchError;
use crate::request::Request;
use crate::response::Response;
use crate::sql::is_word;
use crate::state::AppState;

pub struct Router {
    registry: ControllerRegistry,
}

/// A controller action resolved for one request, ready to invoke.
pub struct Resolved {
    pub class: String,
    pub route: Route,
    pub controller: Box<dyn Controller>,
}

impl Router {
    pub fn new(registry: ControllerRegistry) -> Self {
        Router { registry }
    }

    /// Parse `path`, check the method name, then find the controller, action and arity.
    pub fn resolve(&self, path: &str) -> Result<Resolved, DispatchError> {
        let route = Route::parse(path);
        if !is_word(&route.method) {
            return Err(DispatchError::InvalidMethodName(route.method));
        }

        let class = route.controller_class();
        let controller = self.registry.resolve(&class)?;

        let action = controller.action(&route.method).ok_or_else(|| {
            DispatchError::RouteNotFound(format!("Missing method: {}::{}", class, route.method))
        })?;
        if !action.arity.accepts(route.params.len()) {
            return Err(DispatchError::RouteNotFound(format!(
                "Wrong parameter count for {}::{}: expected {}..={}, got {}",
                class,
                route.method,
                action.arity.min,
                action.arity.max,
                route.params.len()
            )));
        }

        Ok(Resolved {
            class,
            route,
            controller,
        })
    }

    /// Dispatch `path` (base path already stripped). Never fails: errors become 400/404/500 pages.
    pub async fn dispatch(&self, state: &AppState, path: &str, request: &Request) -> Response {
        match self.try_dispatch(state, path, request).await {
            Ok(response) => response,
            Err(e) => {
                match &e {
                    DispatchError::Handler(inner) => {
                        tracing::error!(path = %path, error = %inner, "controller action failed")
                    }
                    other => tracing::warn!(path = %path, error = %other, "dispatch failed"),
                }
                self.error_response(state, request, &e).await
            }
        }
    }

    async fn try_dispatch(
        &self,
        state: &AppState,
        path: &str,
        request: &Request,
    ) -> Result<Response, DispatchError> {
        let Resolved {
            class,
            route,
            mut controller,
        } = self.resolve(path)?;
        tracing::info!(controller = %class, method = %route.method, params = route.params.len(), "dispatch");

        let mut cx = Context::new(state, request);
        controller
            .invoke(&route.method, route.params, &mut cx)
            .await
            .map_err(DispatchError::Handler)?;
        Ok(cx.into_response())
    }

    async fn error_response(&self, state: &AppState, request: &Request, e: &DispatchError) -> Response {
        let page = ErrorPage {
            status: e.status(),
            title: e.title().to_string(),
            message: e.message().to_string(),
            details: e.detail(),
            home_url: state.config.home_url(),
            request_uri: request.uri.to_string(),
        };
        page.render(&state.views, state.config.debug).await
    }
}
