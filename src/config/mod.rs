use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Signing keys shorter than this are refused for HS256.
pub const MIN_JWT_KEY_BYTES: usize = 32;

const DEVELOPMENT_JWT_KEY: &str = "todo-api-development-signing-key-do-not-deploy";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },

    #[error("JWT_KEY must be at least 32 bytes")]
    WeakKey,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    pub url: Option<String>,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_key: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
}

// Keep the signing key out of debug output and logs
impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_key", &"<redacted>")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("jwt_audience", &self.jwt_audience)
            .finish()
    }
}

impl AppConfig {
    /// Build the process configuration from environment variables.
    ///
    /// Called once at startup; the result is shared immutably with every
    /// component that needs it.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Server overrides
        if let Ok(v) = env::var("PORT") {
            self.server.port = parse_var("PORT", &v)?;
        }

        // Database overrides
        if let Ok(v) = env::var("TODO_STORE") {
            self.database.backend = match v.to_ascii_lowercase().as_str() {
                "postgres" | "postgresql" => StoreBackend::Postgres,
                "memory" => StoreBackend::Memory,
                _ => return Err(ConfigError::Invalid { var: "TODO_STORE", value: v }),
            };
        }
        if let Some(url) = env::var("DATABASE_URL").ok().or_else(|| env::var("ToDoDB").ok()) {
            self.database.url = Some(url);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_var("DATABASE_MAX_CONNECTIONS", &v)?;
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connect_timeout_secs = parse_var("DATABASE_CONNECTION_TIMEOUT", &v)?;
        }
        if self.database.backend == StoreBackend::Postgres && self.database.url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        // Security overrides
        match env::var("JWT_KEY") {
            Ok(key) => self.security.jwt_key = key,
            Err(_) if self.environment == Environment::Development => {
                tracing::warn!("JWT_KEY not set, using the built-in development signing key");
            }
            Err(_) => return Err(ConfigError::Missing("JWT_KEY")),
        }
        if let Ok(v) = env::var("JWT_ISSUER") {
            self.security.jwt_issuer = v;
        }
        if let Ok(v) = env::var("JWT_AUDIENCE") {
            self.security.jwt_audience = v;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_key.len() < MIN_JWT_KEY_BYTES {
            return Err(ConfigError::WeakKey);
        }
        if self.security.jwt_issuer.is_empty() {
            return Err(ConfigError::Missing("JWT_ISSUER"));
        }
        if self.security.jwt_audience.is_empty() {
            return Err(ConfigError::Missing("JWT_AUDIENCE"));
        }
        Ok(())
    }

    /// Development preset. Signing key is a fixed, well-known value.
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                max_connections: 5,
                connect_timeout_secs: 30,
            },
            security: SecurityConfig {
                jwt_key: DEVELOPMENT_JWT_KEY.to_string(),
                jwt_issuer: "todo-api".to_string(),
                jwt_audience: "todo-api-clients".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                max_connections: 10,
                connect_timeout_secs: 10,
            },
            security: SecurityConfig {
                jwt_key: String::new(),
                jwt_issuer: "todo-api".to_string(),
                jwt_audience: "todo-api-clients".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 8080 },
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                max_connections: 20,
                connect_timeout_secs: 5,
            },
            security: SecurityConfig {
                jwt_key: String::new(),
                jwt_issuer: "todo-api".to_string(),
                jwt_audience: "todo-api-clients".to_string(),
            },
        }
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        var,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.database.backend, StoreBackend::Postgres);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_preset_requires_key() {
        let config = AppConfig::production();
        assert!(matches!(config.validate(), Err(ConfigError::WeakKey)));
    }

    #[test]
    fn test_short_key_rejected() {
        let mut config = AppConfig::development();
        config.security.jwt_key = "short".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::WeakKey)));
    }

    #[test]
    fn test_parse_var_reports_variable() {
        let err = parse_var::<u16>("PORT", "eighty").unwrap_err();
        assert!(err.to_string().contains("PORT"));
        assert_eq!(parse_var::<u16>("PORT", " 8080 ").unwrap(), 8080);
    }

    #[test]
    fn test_debug_output_redacts_key() {
        let config = AppConfig::development();
        let rendered = format!("{:?}", config.security);
        assert!(!rendered.contains(DEVELOPMENT_JWT_KEY));
        assert!(rendered.contains("<redacted>"));
    }
}
