//! Typed settings read from the environment file.

use crate::config::Env;
use crate::error::ConfigError;
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Connection settings for the MySQL server and target database.
#[derive(Clone, Debug, Serialize)]
pub struct DbSettings {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub charset: String,
}

impl DbSettings {
    pub fn from_env(env: &Env) -> Result<Self, ConfigError> {
        let name = env
            .get("DB_NAME")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingKey("DB_NAME"))?;
        let port_raw = env.get_or("DB_PORT", "3306");
        let port = port_raw.parse().map_err(|_| ConfigError::Invalid {
            key: "DB_PORT",
            value: port_raw.to_string(),
        })?;
        Ok(DbSettings {
            host: env.get_or("DB_HOST", "127.0.0.1").to_string(),
            port,
            name: name.to_string(),
            user: env.get_or("DB_USER", "root").to_string(),
            password: env.get_or("DB_PASS", "").to_string(),
            charset: env.get_or("DB_CHARSET", "utf8mb4").to_string(),
        })
    }
}

/// Application-level settings: debug mode, base path, views and listener.
#[derive(Clone, Debug, Serialize)]
pub struct AppConfig {
    /// When true, error pages include internal detail.
    pub debug: bool,
    /// Prefix stripped from request paths, without trailing slash ("" when mounted at root).
    pub base_path: String,
    pub views_dir: PathBuf,
    pub addr: SocketAddr,
    pub body_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            debug: false,
            base_path: String::new(),
            views_dir: PathBuf::from("views"),
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl AppConfig {
    pub fn from_env(env: &Env) -> Result<Self, ConfigError> {
        let defaults = AppConfig::default();
        let addr = match env.get("APP_ADDR") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "APP_ADDR",
                value: raw.to_string(),
            })?,
            None => defaults.addr,
        };
        let body_limit = match env.get("APP_BODY_LIMIT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "APP_BODY_LIMIT",
                value: raw.to_string(),
            })?,
            None => defaults.body_limit,
        };
        Ok(AppConfig {
            debug: env.get("APP_DEBUG") == Some("true"),
            base_path: normalize_base_path(env.get_or("APP_BASE_PATH", "")),
            views_dir: env.get("APP_VIEWS").map(PathBuf::from).unwrap_or(defaults.views_dir),
            addr,
            body_limit,
        })
    }

    /// URL of the application root, e.g. "/" or "/shop/".
    pub fn home_url(&self) -> String {
        if self.base_path.is_empty() {
            "/".to_string()
        } else {
            format!("{}/", self.base_path)
        }
    }

    /// Remove the base path prefix from a request path, if present.
    pub fn strip_base_path<'a>(&self, path: &'a str) -> &'a str {
        if self.base_path.is_empty() {
            return path;
        }
        match path.strip_prefix(self.base_path.as_str()) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
            _ => path,
        }
    }
}

fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
