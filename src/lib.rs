//! Front-controller web framework: path-based dispatch to registered controllers, views,
//! flash sessions and a fluent SQL query builder over a lazily connected MySQL database.

pub mod case;
pub mod config;
pub mod controller;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod request;
pub mod response;
pub mod router;
pub mod routes;
pub mod session;
pub mod sql;
pub mod state;
pub mod store;
pub mod view;

pub use config::{AppConfig, DbSettings, Env, EnvFile};
pub use controller::{Action, Arity, Context, Controller, Model};
pub use error::{AppError, ConfigError, DispatchError};
pub use request::Request;
pub use response::Response;
pub use router::{ControllerRegistry, ErrorPage, Route, Router};
pub use routes::front_routes;
pub use sql::{Direction, Operator, QueryBuilder, Row};
pub use state::AppState;
pub use store::Database;
pub use view::Views;
