//! API configuration
//!
//! Every field can be overridden through a `GYM_`-prefixed environment
//! variable (`GYM_PORT`, `GYM_JWT_SECRET`, `GYM_STORAGE`, ...). Missing
//! variables keep their defaults.

use core_kernel::CoreError;
use domain_account::{DEFAULT_PASSWORD_CHARACTERS, DEFAULT_PASSWORD_LENGTH};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use infra_db::DatabaseConfig;

/// Longest accepted session lifetime (30 days)
pub const MAX_JWT_EXPIRATION_SECS: u64 = 30 * 24 * 60 * 60;
/// Longest accepted login block (1 day)
pub const MAX_LOGIN_BLOCK_SECS: i64 = 24 * 60 * 60;

/// Where trainees, trainers and sessions are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Process memory; contents are lost on restart
    Memory,
    Postgres,
}

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// HMAC secret for signing session tokens
    pub jwt_secret: String,
    pub jwt_expiration_secs: u64,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_connect_timeout_secs: u64,
    pub db_max_lifetime_secs: u64,
    pub db_idle_timeout_secs: u64,
    /// Default filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Base URL of the trainer workload API; notifications are skipped when unset
    pub workload_service_url: Option<String>,
    pub workload_timeout_secs: u64,
    pub password_length: usize,
    pub password_characters: String,
    pub bcrypt_cost: u32,
    pub max_login_attempts: u32,
    pub login_block_secs: i64,
    pub storage: StorageKind,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 600,
            database_url: "postgres://localhost/gym".to_string(),
            db_max_connections: 10,
            db_min_connections: 1,
            db_connect_timeout_secs: 30,
            db_max_lifetime_secs: 30 * 60,
            db_idle_timeout_secs: 10 * 60,
            log_level: "info".to_string(),
            log_json: false,
            workload_service_url: None,
            workload_timeout_secs: 5,
            password_length: DEFAULT_PASSWORD_LENGTH,
            password_characters: DEFAULT_PASSWORD_CHARACTERS.to_string(),
            bcrypt_cost: 12,
            max_login_attempts: 3,
            login_block_secs: 300,
            storage: StorageKind::Postgres,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `GYM_*` environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("GYM").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Pool settings for PostgreSQL storage
    pub fn database(&self) -> DatabaseConfig {
        DatabaseConfig::new(&self.database_url)
            .max_connections(self.db_max_connections)
            .min_connections(self.db_min_connections)
            .connect_timeout(Duration::from_secs(self.db_connect_timeout_secs))
            .max_lifetime(Duration::from_secs(self.db_max_lifetime_secs))
            .idle_timeout(Duration::from_secs(self.db_idle_timeout_secs))
    }

    /// Workload URL with blank values treated as unset
    pub fn workload_url(&self) -> Option<&str> {
        self.workload_service_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Rejects settings the services cannot run with
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(CoreError::configuration("jwt_secret must not be empty"));
        }
        if self.jwt_expiration_secs == 0 || self.jwt_expiration_secs > MAX_JWT_EXPIRATION_SECS {
            return Err(CoreError::configuration(format!(
                "jwt_expiration_secs must be between 1 and {}",
                MAX_JWT_EXPIRATION_SECS
            )));
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(CoreError::configuration("bcrypt_cost must be between 4 and 31"));
        }
        if self.max_login_attempts == 0 {
            return Err(CoreError::configuration("max_login_attempts must be positive"));
        }
        if !(1..=MAX_LOGIN_BLOCK_SECS).contains(&self.login_block_secs) {
            return Err(CoreError::configuration(format!(
                "login_block_secs must be between 1 and {}",
                MAX_LOGIN_BLOCK_SECS
            )));
        }
        if self.db_max_connections == 0 || self.db_min_connections > self.db_max_connections {
            return Err(CoreError::configuration(
                "db_min_connections must not exceed a positive db_max_connections",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ApiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.workload_url(), None);
    }

    #[test]
    fn test_blank_workload_url_is_unset() {
        let config = ApiConfig {
            workload_service_url: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.workload_url(), None);
    }

    #[test]
    fn test_out_of_range_cost_rejected() {
        let config = ApiConfig {
            bcrypt_cost: 2,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_durations_rejected() {
        let long_session = ApiConfig {
            jwt_expiration_secs: u64::MAX,
            ..Default::default()
        };
        assert!(long_session.validate().is_err());

        let long_block = ApiConfig {
            login_block_secs: i64::MAX,
            ..Default::default()
        };
        assert!(long_block.validate().is_err());

        let at_limit = ApiConfig {
            jwt_expiration_secs: MAX_JWT_EXPIRATION_SECS,
            login_block_secs: MAX_LOGIN_BLOCK_SECS,
            ..Default::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_database_settings_carry_pool_tuning() {
        let config = ApiConfig {
            db_max_connections: 20,
            db_min_connections: 4,
            db_idle_timeout_secs: 90,
            ..Default::default()
        };
        let database = config.database();
        assert_eq!(database.url, "postgres://localhost/gym");
        assert_eq!(database.max_connections, 20);
        assert_eq!(database.min_connections, 4);
        assert_eq!(database.idle_timeout, Duration::from_secs(90));
        assert_eq!(database.max_lifetime, Duration::from_secs(30 * 60));
    }

    #[test]
    fn test_min_connections_above_max_rejected() {
        let config = ApiConfig {
            db_max_connections: 2,
            db_min_connections: 5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_storage_kind_parses_lowercase() {
        let kind: StorageKind = serde_json::from_str("\"memory\"").unwrap();
        assert_eq!(kind, StorageKind::Memory);
    }
}
