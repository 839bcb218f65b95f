//! Shared application state for the front controller.

use crate::config::{AppConfig, EnvFile};
use crate::error::AppError;
use crate::router::{ControllerRegistry, Router};
use crate::session::SessionStore;
use crate::store::Database;
use crate::view::Views;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Connects on first use; `.env` is read at that point, not at startup.
    pub db: Arc<Database>,
    pub views: Arc<Views>,
    pub sessions: Arc<SessionStore>,
    pub router: Arc<Router>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        env: Arc<EnvFile>,
        registry: ControllerRegistry,
    ) -> Result<Self, AppError> {
        let views = Views::new(config.views_dir.clone())?;
        Ok(AppState {
            config: Arc::new(config),
            db: Arc::new(Database::new(env)),
            views: Arc::new(views),
            sessions: Arc::new(SessionStore::default()),
            router: Arc::new(Router::new(registry)),
        })
    }
}
