//! Controller contract and the helpers every action receives through [`Context`].

use crate::error::AppError;
use crate::request::Request;
use crate::response::Response;
use crate::session::session_cookie;
use crate::state::AppState;
use crate::store::Database;
use async_trait::async_trait;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderValue, Method, StatusCode};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Accepted positional parameter counts for an action, inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: usize,
}

impl Arity {
    pub const NONE: Arity = Arity { min: 0, max: 0 };

    pub const fn exact(n: usize) -> Self {
        Arity { min: n, max: n }
    }

    pub const fn between(min: usize, max: usize) -> Self {
        Arity { min, max }
    }

    pub fn accepts(&self, n: usize) -> bool {
        (self.min..=self.max).contains(&n)
    }
}

/// An action a controller answers to.
#[derive(Clone, Copy, Debug)]
pub struct Action {
    pub name: &'static str,
    pub arity: Arity,
}

impl Action {
    pub const fn new(name: &'static str, arity: Arity) -> Self {
        Action { name, arity }
    }
}

/// A routable controller. The router only calls `invoke` for an action listed by `actions`
/// with a parameter count its arity accepts.
#[async_trait]
pub trait Controller: Send {
    fn actions(&self) -> &'static [Action];

    async fn invoke(
        &mut self,
        action: &str,
        params: Vec<String>,
        cx: &mut Context<'_>,
    ) -> Result<(), AppError>;

    fn action(&self, name: &str) -> Option<&'static Action> {
        self.actions().iter().find(|a| a.name == name)
    }
}

/// Data access object bound to the shared database.
pub trait Model<'db> {
    fn with_db(db: &'db Database) -> Self;
}

/// Per-request helpers handed to controller actions. Whatever response the action leaves
/// here is sent to the client.
pub struct Context<'a> {
    state: &'a AppState,
    request: &'a Request,
    session: Option<Uuid>,
    new_session: bool,
    response: Response,
}

impl<'a> Context<'a> {
    pub fn new(state: &'a AppState, request: &'a Request) -> Self {
        Context {
            state,
            request,
            session: request.session,
            new_session: false,
            response: Response::default(),
        }
    }

    pub fn request(&self) -> &'a Request {
        self.request
    }

    pub fn db(&self) -> &'a Database {
        &self.state.db
    }

    pub fn model<M: Model<'a>>(&self) -> M {
        M::with_db(&self.state.db)
    }

    /// Form body value, else query string value.
    pub fn input(&self, key: &str) -> Option<&'a str> {
        self.request.input(key)
    }

    pub fn input_or(&self, key: &str, default: &'a str) -> &'a str {
        self.input(key).unwrap_or(default)
    }

    pub fn is_post(&self) -> bool {
        self.request.method == Method::POST
    }

    pub fn is_get(&self) -> bool {
        self.request.method == Method::GET
    }

    /// Absolute URL under the application base path, e.g. `http://localhost/shop/users`.
    pub fn base_url(&self, path: &str) -> String {
        let scheme = self.request.header("x-forwarded-proto").unwrap_or("http");
        let host = self.request.header("host").unwrap_or("localhost");
        let root = format!("{}://{}{}", scheme, host, self.state.config.base_path);
        format!("{}/{}", root.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    pub fn site_url(&self, path: &str) -> String {
        self.base_url(path)
    }

    /// Redirect to a full URL, or to `path` under the base URL.
    pub fn redirect(&mut self, path: &str) -> Result<(), AppError> {
        let location = if path.starts_with("http") {
            path.to_string()
        } else {
            self.base_url(path)
        };
        self.response = Response::redirect(&location)?;
        Ok(())
    }

    pub fn json<T: Serialize>(&mut self, data: &T, status: StatusCode) -> Result<(), AppError> {
        let value = serde_json::to_value(data)?;
        self.response = Response::json(status, &value);
        Ok(())
    }

    /// Render view `name`. A missing view becomes a 500 response naming the file.
    pub async fn view(&mut self, name: &str, data: &Map<String, Value>) -> Result<(), AppError> {
        match self.state.views.render(name, data).await {
            Ok(body) => {
                self.response = Response::html(StatusCode::OK, body);
                Ok(())
            }
            Err(AppError::ViewNotFound(path)) => {
                tracing::warn!(view = %name, path = %path.display(), "view not found");
                self.response = Response::text(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("View not found: {}", path.display()),
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    pub fn escape(&self, s: &str) -> String {
        crate::view::escape(s)
    }

    /// Store a message for the next request in this session.
    pub fn flash(&mut self, key: &str, value: &str) {
        let session = match self.session {
            Some(s) => s,
            None => {
                let s = Uuid::new_v4();
                self.session = Some(s);
                self.new_session = true;
                s
            }
        };
        self.state.sessions.put_flash(session, key, value);
    }

    /// Read and clear a flash message.
    pub fn take_flash(&mut self, key: &str) -> Option<String> {
        self.state.sessions.take_flash(self.session?, key)
    }

    pub fn response_mut(&mut self) -> &mut Response {
        &mut self.response
    }

    pub fn into_response(self) -> Response {
        let mut response = self.response;
        if let (true, Some(session)) = (self.new_session, self.session) {
            if let Ok(cookie) = HeaderValue::from_str(&session_cookie(session)) {
                response.headers.append(SET_COOKIE, cookie);
            }
        }
        response
    }
}
