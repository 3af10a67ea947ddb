use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HMAC signing key. Empty outside development so deployments must set CATALOG_JWT_KEY.
    pub key: String,
    pub issuer: String,
    pub audience: String,
    pub expiry_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
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

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECT_TIMEOUT") {
            self.database.connect_timeout_secs = v.parse().unwrap_or(self.database.connect_timeout_secs);
        }

        // JWT overrides
        if let Ok(v) = env::var("CATALOG_JWT_KEY") {
            self.jwt.key = v;
        }
        if let Ok(v) = env::var("CATALOG_JWT_ISSUER") {
            self.jwt.issuer = v;
        }
        if let Ok(v) = env::var("CATALOG_JWT_AUDIENCE") {
            self.jwt.audience = v;
        }
        if let Ok(v) = env::var("CATALOG_JWT_EXPIRY_MINUTES") {
            self.jwt.expiry_minutes = v.parse().unwrap_or(self.jwt.expiry_minutes);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                connect_timeout_secs: 30,
            },
            jwt: JwtConfig {
                key: "catalog-dev-signing-key-do-not-use-in-production".to_string(),
                issuer: "CatalogApi".to_string(),
                audience: "CatalogApiClients".to_string(),
                expiry_minutes: 5,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                connect_timeout_secs: 10,
            },
            jwt: JwtConfig {
                key: String::new(),
                issuer: "CatalogApi".to_string(),
                audience: "CatalogApiClients".to_string(),
                expiry_minutes: 5,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                connect_timeout_secs: 5,
            },
            jwt: JwtConfig {
                key: String::new(),
                issuer: "CatalogApi".to_string(),
                audience: "CatalogApiClients".to_string(),
                expiry_minutes: 5,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(!config.jwt.key.is_empty());
        assert_eq!(config.jwt.expiry_minutes, 5);
        assert_eq!(config.database.max_connections, 10);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.jwt.key.is_empty());
        assert_eq!(config.jwt.issuer, "CatalogApi");
    }
}
