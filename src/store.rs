//! Database connector: one lazily opened MySQL connection per `Database`, created after
//! making sure the target database exists.

use crate::config::{DbSettings, EnvFile};
use crate::error::AppError;
use crate::sql::{is_word, QueryBuilder};
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::ConnectOptions;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

pub struct Database {
    env: Arc<EnvFile>,
    conn: OnceCell<Mutex<MySqlConnection>>,
}

impl Database {
    /// Nothing is read or opened until the first `connection()` call.
    pub fn new(env: Arc<EnvFile>) -> Self {
        Database {
            env,
            conn: OnceCell::new(),
        }
    }

    /// Start a fluent query against `table`.
    pub fn table(&self, table: &str) -> Result<QueryBuilder<'_>, AppError> {
        QueryBuilder::new(self, table)
    }

    pub fn is_connected(&self) -> bool {
        self.conn.initialized()
    }

    /// The shared connection, opened on first call. Every later call returns the same handle.
    pub async fn connection(&self) -> Result<&Mutex<MySqlConnection>, AppError> {
        self.conn
            .get_or_try_init(|| async {
                let settings = DbSettings::from_env(self.env.get()?)?;
                let conn = connect(&settings).await?;
                Ok::<_, AppError>(Mutex::new(conn))
            })
            .await
    }
}

/// Create the database if missing, then open a connection scoped to it.
pub async fn connect(settings: &DbSettings) -> Result<MySqlConnection, AppError> {
    let server = server_options(settings);
    let mut admin = server.connect().await?;
    ensure_database_exists(&mut admin, settings).await?;
    drop(admin);

    let conn = server.database(&settings.name).connect().await?;
    tracing::info!(host = %settings.host, database = %settings.name, "database connection established");
    Ok(conn)
}

/// Server-level options: no database selected, prepared statements only.
fn server_options(settings: &DbSettings) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.user)
        .password(&settings.password)
        .charset(&settings.charset)
}

/// Idempotent `CREATE DATABASE IF NOT EXISTS` with the configured character set.
pub async fn ensure_database_exists(
    conn: &mut MySqlConnection,
    settings: &DbSettings,
) -> Result<(), AppError> {
    let sql = create_database_sql(settings)?;
    tracing::debug!(sql = %sql, "ensure database");
    sqlx::query(&sql).execute(&mut *conn).await?;
    Ok(())
}

fn create_database_sql(settings: &DbSettings) -> Result<String, AppError> {
    if !is_word(&settings.charset) {
        return Err(AppError::InvalidIdentifier(settings.charset.clone()));
    }
    Ok(format!(
        "CREATE DATABASE IF NOT EXISTS {} CHARACTER SET {} COLLATE {}_general_ci",
        quote_ident(&settings.name),
        settings.charset,
        settings.charset
    ))
}

fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Env;

    fn settings(name: &str, charset: &str) -> DbSettings {
        let env = Env::from_pairs([("DB_NAME", name), ("DB_CHARSET", charset)]);
        DbSettings::from_env(&env).unwrap()
    }

    #[test]
    fn test_create_database_sql() {
        let sql = create_database_sql(&settings("shop", "utf8mb4")).unwrap();
        assert_eq!(
            sql,
            "CREATE DATABASE IF NOT EXISTS `shop` CHARACTER SET utf8mb4 COLLATE utf8mb4_general_ci"
        );
    }

    #[test]
    fn test_database_name_is_quoted() {
        let sql = create_database_sql(&settings("my-app`db", "utf8")).unwrap();
        assert!(sql.contains("`my-app``db`"));
    }

    #[test]
    fn test_charset_must_be_identifier() {
        assert!(matches!(
            create_database_sql(&settings("shop", "utf8; DROP")),
            Err(AppError::InvalidIdentifier(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_env_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(Arc::new(EnvFile::new(dir.path().join(".env"))));
        assert!(matches!(
            db.connection().await,
            Err(AppError::Config(crate::error::ConfigError::MissingFile(_)))
        ));
        assert!(!db.is_connected());
    }
}
