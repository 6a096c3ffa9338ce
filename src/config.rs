//! Configuration module
//!
//! Loaded from a TOML file (default `~/.config/roster-gate/config.toml`).
//! Every section and field has a default, so a partial or missing file works.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{CreateUserDto, UserRole};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Default config location: `<config dir>/roster-gate/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("roster-gate")
        .join("config.toml")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub session: SessionConfig,
    /// Accounts loaded into the directory at startup, in order.
    pub users: Vec<SeedUser>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            session: SessionConfig::default(),
            users: vec![
                SeedUser {
                    email: "admin@example.com".into(),
                    username: "admin".into(),
                    secret: "123456".into(),
                    role: UserRole::Admin,
                },
                SeedUser {
                    email: "user@example.com".into(),
                    username: "user".into(),
                    secret: "abcdef".into(),
                    role: UserRole::Standard,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
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
            host: "0.0.0.0".into(),
            port: 3000,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `trace`, `debug`, `info`, `warn` or `error`; `RUST_LOG` wins when set
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub cookie_name: String,
    /// Adds `Secure` to the session cookie; enable behind HTTPS
    pub secure_cookie: bool,
    /// Sessions unused for this many seconds are evicted
    pub idle_timeout_secs: u64,
    /// How often the idle sweep runs
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "roster_sid".into(),
            secure_cookie: false,
            idle_timeout_secs: 1800,
            sweep_interval_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedUser {
    pub email: String,
    pub username: String,
    pub secret: String,
    pub role: UserRole,
}

impl From<&SeedUser> for CreateUserDto {
    fn from(seed: &SeedUser) -> Self {
        CreateUserDto::new(&seed.email, &seed.username, &seed.secret, seed.role)
    }
}

impl AppConfig {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".into()));
        }
        if self.session.cookie_name.trim().is_empty() {
            return Err(ConfigError::Invalid("session.cookie_name is empty".into()));
        }
        if self.session.idle_timeout_secs == 0 || self.session.sweep_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "session.idle_timeout_secs and session.sweep_interval_secs must be non-zero".into(),
            ));
        }
        if let Some(seed) = self.users.iter().find(|u| {
            u.email.trim().is_empty() || u.username.trim().is_empty() || u.secret.is_empty()
        }) {
            return Err(ConfigError::Invalid(format!(
                "seed user '{}' has an empty field",
                seed.email
            )));
        }
        Ok(())
    }

    pub fn seed_users(&self) -> Vec<CreateUserDto> {
        self.users.iter().map(CreateUserDto::from).collect()
    }
}
