use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

use crate::config::DatabaseConfig;

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("User name already exists: {0}")]
    UsernameTaken(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Map a unique-constraint violation on `users.user_name` to `UsernameTaken`.
    pub(crate) fn from_insert_user(err: sqlx::Error, user_name: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DatabaseError::UsernameTaken(user_name.to_string())
            }
            _ => DatabaseError::Sqlx(err),
        }
    }
}

const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        user_name VARCHAR(45) NOT NULL,
        email VARCHAR(45),
        password_hash VARCHAR(255) NOT NULL
    )"#,
    "CREATE UNIQUE INDEX IF NOT EXISTS users_user_name_key ON users (user_name)",
    r#"CREATE TABLE IF NOT EXISTS items (
        id SERIAL PRIMARY KEY,
        name VARCHAR(40) NOT NULL,
        is_complete BOOLEAN NOT NULL DEFAULT FALSE,
        user_id INTEGER REFERENCES users (id) ON DELETE CASCADE
    )"#,
    "CREATE INDEX IF NOT EXISTS items_user_id_idx ON items (user_id)",
];

/// Owns the PostgreSQL connection pool for the process
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open the pool and verify connectivity. Failures are logged and returned
    /// so startup aborts instead of serving without a database.
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(url)
            .await
            .map_err(|e| {
                error!("Database connection to {} failed: {}", Self::redact_url(url), e);
                DatabaseError::Sqlx(e)
            })?;

        info!("Connected to database at {}", Self::redact_url(url));
        Ok(pool)
    }

    /// Create the `users` and `items` tables when they do not exist yet
    pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(pool).await?;
        }
        info!("Database schema is ready");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Render a connection string with its password masked, for logs.
    fn redact_url(raw: &str) -> String {
        match url::Url::parse(raw) {
            Ok(mut url) => {
                if url.password().is_some() {
                    let _ = url.set_password(Some("****"));
                }
                url.to_string()
            }
            Err(_) => "<unparseable database url>".to_string(),
        }
    }
}
