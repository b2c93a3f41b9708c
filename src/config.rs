//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/user-directory/config.toml`).
//! Every field has a default, so a missing file or a partial file is fine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use validator::Validate;

use crate::application::directory::DEFAULT_PUBLIC_FIELDS;
use crate::application::PublicProjection;
use crate::shared::{PaginationPolicy, DEFAULT_LIMIT, DEFAULT_MAX_LIMIT, DEFAULT_WINDOW_SIZE};

/// Environment variable holding an explicit config path.
pub const CONFIG_ENV_VAR: &str = "USER_DIRECTORY_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid configuration: {0}")]
    Inconsistent(String),
}

/// Default location of the config file.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("user-directory")
        .join("config.toml")
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub storage: StorageSettings,
    pub logging: LoggingConfig,
    #[validate(nested)]
    pub pagination: PaginationConfig,
    #[validate(nested)]
    pub directory: DirectoryConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    /// `0` binds an ephemeral port.
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown.
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
    /// Number of demo users inserted at startup when the table is empty.
    pub seed_demo_users: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://./users.db?mode=rwc".to_string(),
            seed_demo_users: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Database,
    Memory,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `trace`, `debug`, `info`, `warn`, `error` or a full filter directive.
    pub level: String,
    /// `plain` or `json`.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "plain".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct PaginationConfig {
    #[validate(range(min = 1))]
    pub default_limit: u64,
    #[validate(range(min = 1))]
    pub max_limit: u64,
    #[validate(range(min = 1))]
    pub window_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: DEFAULT_MAX_LIMIT,
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

impl From<&PaginationConfig> for PaginationPolicy {
    fn from(cfg: &PaginationConfig) -> Self {
        PaginationPolicy {
            default_limit: cfg.default_limit,
            max_limit: cfg.max_limit,
            window_size: cfg.window_size,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct DirectoryConfig {
    #[validate(range(min = 1))]
    pub store_timeout_ms: u64,
    #[validate(length(min = 1))]
    pub public_fields: Vec<String>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            store_timeout_ms: 5_000,
            public_fields: DEFAULT_PUBLIC_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl DirectoryConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn projection(&self) -> PublicProjection {
        PublicProjection::new(self.public_fields.iter().cloned())
    }
}

impl AppConfig {
    /// Load and validate the config at `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let cfg: AppConfig = toml::from_str(raw)?;
        cfg.check()?;
        Ok(cfg)
    }

    /// Validate field ranges and cross-field constraints.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if self.pagination.default_limit > self.pagination.max_limit {
            return Err(ConfigError::Inconsistent(format!(
                "pagination.default_limit ({}) exceeds pagination.max_limit ({})",
                self.pagination.default_limit, self.pagination.max_limit
            )));
        }
        Ok(())
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.storage.backend, StorageBackend::Database);
        assert_eq!(cfg.pagination.default_limit, 10);
        assert_eq!(cfg.pagination.max_limit, 100);
        assert_eq!(cfg.pagination.window_size, 10);
        assert_eq!(cfg.directory.public_fields.len(), 6);
    }

    #[test]
    fn partial_sections_are_merged_with_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            [server]
            port = 8080

            [storage]
            backend = "memory"

            [pagination]
            max_limit = 50

            [directory]
            public_fields = ["id", "email"]
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.storage.backend, StorageBackend::Memory);
        assert_eq!(PaginationPolicy::from(&cfg.pagination).max_limit, 50);
        assert_eq!(cfg.directory.projection().fields(), ["id", "email"]);
    }

    #[test]
    fn zero_window_is_rejected() {
        let err = AppConfig::from_toml("[pagination]\nwindow_size = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn default_above_max_is_rejected() {
        let err = AppConfig::from_toml("[pagination]\ndefault_limit = 200").unwrap_err();
        assert!(matches!(err, ConfigError::Inconsistent(_)));
    }

    #[test]
    fn empty_projection_is_rejected() {
        let err = AppConfig::from_toml("[directory]\npublic_fields = []").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = AppConfig::load(Path::new("/definitely/not/here.toml")).unwrap();
        assert_eq!(cfg.listen_address(), "0.0.0.0:3000");
    }
}
