//! API configuration

use serde::Deserialize;
use std::time::Duration;

use core_kernel::{TemporalError, Timezone};
use infra_db::DatabaseConfig;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL; the in-memory store is used when unset
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u32,
    /// Log level
    pub log_level: String,
    /// IANA timezone that decides which day "today" is
    pub timezone: String,
    /// Load the demo contacts and policies at startup
    pub seed_demo_data: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: None,
            db_max_connections: 10,
            db_min_connections: 2,
            db_acquire_timeout_secs: 30,
            log_level: "info".to_string(),
            timezone: "UTC".to_string(),
            seed_demo_data: false,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_*` environment variables over the defaults
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("db_max_connections", i64::from(defaults.db_max_connections))?
            .set_default("db_min_connections", i64::from(defaults.db_min_connections))?
            .set_default("db_acquire_timeout_secs", i64::from(defaults.db_acquire_timeout_secs))?
            .set_default("log_level", defaults.log_level)?
            .set_default("timezone", defaults.timezone)?
            .set_default("seed_demo_data", defaults.seed_demo_data)?
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Pool settings for PostgreSQL, or `None` for the in-memory store
    pub fn database(&self) -> Option<DatabaseConfig> {
        self.database_url.as_ref().map(|url| {
            DatabaseConfig::new(url.as_str())
                .with_bounds(self.db_min_connections, self.db_max_connections)
                .with_acquire_timeout(Duration::from_secs(u64::from(self.db_acquire_timeout_secs)))
        })
    }

    /// Parses the configured timezone
    pub fn timezone(&self) -> Result<Timezone, TemporalError> {
        Timezone::from_name(&self.timezone)
    }
}
