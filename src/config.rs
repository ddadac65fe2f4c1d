//! Configuration module
//!
//! Settings are read from a TOML file (path via the `ACCOUNT_CONFIG`
//! env variable, defaulting to the user config dir) and handed to the
//! rest of the service as one immutable bundle. `JWT_SECRET` and
//! `DATABASE_URL` env variables override their file counterparts.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::auth::JwtConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub tls: TlsSettings,
    pub database: DatabaseSettings,
    pub security: SecuritySettings,
    pub admin: AdminBootstrap,
    pub notifier: NotifierSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind address
    pub host: String,
    pub port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
    /// Per-request deadline applied to store and outbound calls, seconds
    pub request_deadline_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
            request_deadline_secs: 15,
        }
    }
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// TLS material supplied at startup. With both paths present the server
/// terminates TLS itself; otherwise it binds plain TCP (development).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TlsSettings {
    pub cert_path: Option<PathBuf>,
    pub key_path: Option<PathBuf>,
}

impl TlsSettings {
    pub fn enabled(&self) -> bool {
        self.cert_path.is_some() && self.key_path.is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Database URL (e.g., "sqlite://./accounts.db?mode=rwc")
    pub url: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://./accounts.db?mode=rwc".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecuritySettings {
    /// Signing secret for bearer tokens
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub issuer: String,
    /// Request paths exempt from the authentication interceptor. Part
    /// of the RPC contract, kept in configuration rather than code.
    pub public_paths: Vec<String>,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            jwt_secret: "super-secret-key-change-in-production".to_string(),
            jwt_expiration_hours: 24,
            issuer: "account-service".to_string(),
            public_paths: vec![
                "/api/v1/accounts/login".to_string(),
                "/api/v1/admins/login".to_string(),
                "/api/v1/token".to_string(),
            ],
        }
    }
}

impl SecuritySettings {
    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.jwt_secret.clone(),
            expiration_hours: self.jwt_expiration_hours,
            issuer: self.issuer.clone(),
        }
    }
}

/// Super admin created at startup when the admins table is empty
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl Default for AdminBootstrap {
    fn default() -> Self {
        Self {
            username: "root".to_string(),
            email: "root@localhost".to_string(),
            password: "change-me-immediately".to_string(),
            first_name: "Default".to_string(),
            last_name: "Admin".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NotifierSettings {
    pub enabled: bool,
    /// Webhook endpoint of the notification service
    pub endpoint: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file and apply env overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&raw)?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            self.security.jwt_secret = secret;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database.url = url;
        }
    }
}

/// Default config file location (~/.config/account-service/config.toml)
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("account-service")
        .join("config.toml")
}
