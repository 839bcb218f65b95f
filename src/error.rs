//! Typed errors and their HTTP mapping.

use axum::http::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(".env file not found at {}", .0.display())]
    MissingFile(PathBuf),
    #[error("{0} is not set in .env")]
    MissingKey(&'static str),
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
    #[error("config load: {0}")]
    Load(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
    #[error("Invalid operator: {0}")]
    InvalidOperator(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    UnsafeOperation(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database: {0}")]
    QueryExecution(#[from] sqlx::Error),
    #[error("View not found: {}", .0.display())]
    ViewNotFound(PathBuf),
    #[error("template: {0}")]
    Template(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of one dispatch stage. The router turns each into an error page.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("invalid method name: {0}")]
    InvalidMethodName(String),
    #[error("{0}")]
    RouteNotFound(String),
    #[error("{0}")]
    ServerConfiguration(String),
    #[error(transparent)]
    Handler(#[from] AppError),
}

impl DispatchError {
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::InvalidMethodName(_) => StatusCode::BAD_REQUEST,
            DispatchError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            DispatchError::ServerConfiguration(_) | DispatchError::Handler(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short title shown on the error page.
    pub fn title(&self) -> &'static str {
        match self {
            DispatchError::InvalidMethodName(_) => "Bad Request",
            DispatchError::RouteNotFound(_) => "Not Found",
            DispatchError::ServerConfiguration(_) | DispatchError::Handler(_) => "Server Error",
        }
    }

    /// User-facing message. Never contains internal detail.
    pub fn message(&self) -> &'static str {
        match self {
            DispatchError::InvalidMethodName(_) => "Invalid method name.",
            DispatchError::RouteNotFound(_) => "The page you requested could not be found.",
            DispatchError::ServerConfiguration(_) => "A server configuration error occurred.",
            DispatchError::Handler(_) => "Something went wrong while processing your request.",
        }
    }

    /// Internal detail, rendered to the client only in debug mode.
    pub fn detail(&self) -> Option<String> {
        match self {
            DispatchError::InvalidMethodName(_) => None,
            other => Some(other.to_string()),
        }
    }
}
