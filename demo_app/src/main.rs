//! Demo application on the front-controller framework.
//!
//! Run from repo root: `cargo run -p demo-app`
//! Settings come from the file named by `APP_ENV_FILE` (default `.env`); it is read into the
//! app config only. `APP_ENV_FILE` and `RUST_LOG` come from the process environment.

mod controllers;
mod models;

use controllers::{HomeController, UsersController};
use front_controller::{front_routes, AppConfig, AppState, ControllerRegistry, EnvFile};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("front_controller=info,demo_app=info")),
        )
        .init();

    let env_path = std::env::var("APP_ENV_FILE").unwrap_or_else(|_| ".env".into());
    let env = Arc::new(EnvFile::new(env_path));
    let config = match env.get() {
        Ok(vars) => AppConfig::from_env(vars)?,
        Err(e) => {
            tracing::warn!(error = %e, "using default app settings");
            AppConfig::default()
        }
    };

    let registry = ControllerRegistry::new()
        .register("HomeController", || HomeController)
        .register("UsersController", || UsersController);
    let addr = config.addr;
    let state = AppState::new(config, env, registry)?;

    let app = front_routes(state);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Demo app listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
