//! Configuration module
//!
//! Settings live in a TOML file (`~/.config/vesuvio/config.toml` by default).
//! Every section is optional; missing keys take their defaults. A handful of
//! environment variables override the file after it is loaded.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::SeedUser;
use crate::infrastructure::crypto::password::DEFAULT_COST;
use crate::infrastructure::database::{redact_url, DatabaseConfig};

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "VESUVIO_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        let defaults = DatabaseConfig::default();
        Self {
            url: defaults.url,
            max_connections: defaults.max_connections,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `vesuvio=debug,tower_http=info`
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// bcrypt work factor (4..=31)
    pub bcrypt_cost: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: DEFAULT_COST,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub users: Vec<SeedUser>,
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub seed: SeedConfig,
}

/// `<config dir>/vesuvio/config.toml`, or `./config.toml` when the platform
/// has no config directory.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("vesuvio").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&raw)?)
    }

    /// Load `path` and apply overrides from `lookup`. Only a missing file
    /// falls back to the defaults; unreadable or malformed files are errors.
    pub fn load_with_overrides<F>(path: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::load(path)?;
        cfg.apply_overrides_from(lookup)?;
        Ok(cfg)
    }

    /// Write as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(path, raw).map_err(write_err)
    }

    /// Apply `PORT`, `DATABASE_URL` and `ADMIN_*` from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup. Empty values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = get("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("PORT '{}' is not a port number", port)))?;
        }
        if let Some(url) = get("DATABASE_URL") {
            self.database.url = url;
        }
        if let (Some(email), Some(password)) = (get("ADMIN_EMAIL"), get("ADMIN_PASSWORD")) {
            let admin = SeedUser {
                name: get("ADMIN_NAME").unwrap_or_else(|| "Admin".to_string()),
                email,
                password,
                is_admin: true,
            };
            let existing = self
                .seed
                .users
                .iter_mut()
                .find(|u| u.email.eq_ignore_ascii_case(&admin.email));
            match existing {
                Some(slot) => *slot = admin,
                None => self.seed.users.push(admin),
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Invalid("database.url must not be empty".into()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be at least 1".into(),
            ));
        }
        if !(4..=31).contains(&self.security.bcrypt_cost) {
            return Err(ConfigError::Invalid(format!(
                "security.bcrypt_cost must be within 4..=31, got {}",
                self.security.bcrypt_cost
            )));
        }
        if tracing_subscriber::EnvFilter::try_new(&self.logging.level).is_err() {
            return Err(ConfigError::Invalid(format!(
                "logging.level '{}' is not a valid filter",
                self.logging.level
            )));
        }
        for user in &self.seed.users {
            if user.email.trim().is_empty() || user.password.is_empty() {
                return Err(ConfigError::Invalid(
                    "seed users need an email and a password".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
        }
    }

    /// Human readable summary with secrets masked.
    pub fn summary(&self) -> String {
        let seeds: Vec<&str> = self.seed.users.iter().map(|u| u.email.as_str()).collect();
        format!(
            "   Address     : {}\n   Database    : {} (max {} connections)\n   Log level   : {} ({})\n   bcrypt cost : {}\n   Seed users  : {}",
            self.server.address(),
            redact_url(&self.database.url),
            self.database.max_connections,
            self.logging.level,
            self.logging.format,
            self.security.bcrypt_cost,
            if seeds.is_empty() {
                "none".to_string()
            } else {
                seeds.join(", ")
            },
        )
    }
}
