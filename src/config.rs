//! # Configuration
//!
//! A JSON file with one section per subsystem. Every field has a default, so
//! a partial file (or none at all) is valid. A few settings can be overridden
//! from the environment.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::TokenConfig;
use crate::http_server::HttpServerConfig;
use crate::observability::LogConfig;
use crate::orchestrator::FanOutMode;
use crate::store::Latency;

pub const ENV_HOST: &str = "TRAVEL_HOST";
pub const ENV_PORT: &str = "TRAVEL_PORT";
pub const ENV_JWT_SECRET: &str = "TRAVEL_JWT_SECRET";
pub const ENV_SEED: &str = "TRAVEL_SEED";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("invalid setting: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON seed file loaded into the in-memory store at start-up
    #[serde(default)]
    pub seed_path: Option<PathBuf>,

    /// Simulated completion latency
    #[serde(default)]
    pub latency_ms: u64,

    #[serde(default)]
    pub jitter_ms: u64,
}

impl StoreConfig {
    pub fn latency(&self) -> Latency {
        Latency::jittered(
            Duration::from_millis(self.latency_ms),
            Duration::from_millis(self.jitter_ms),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestrationConfig {
    #[serde(default)]
    pub fan_out: FanOutMode,

    /// Per-operation drain deadline; 0 disables it
    #[serde(default = "default_op_timeout_ms")]
    pub op_timeout_ms: u64,
}

fn default_op_timeout_ms() -> u64 {
    10_000
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            fan_out: FanOutMode::default(),
            op_timeout_ms: default_op_timeout_ms(),
        }
    }
}

impl OrchestrationConfig {
    pub fn op_timeout(&self) -> Option<Duration> {
        (self.op_timeout_ms > 0).then(|| Duration::from_millis(self.op_timeout_ms))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,
}

fn default_jwt_secret() -> String {
    "cbtravelsample".to_string()
}

fn default_token_ttl_secs() -> i64 {
    24 * 60 * 60
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_secs: default_token_ttl_secs(),
        }
    }
}

impl AuthConfig {
    pub fn token_config(&self) -> TokenConfig {
        TokenConfig {
            secret: self.jwt_secret.clone(),
            ttl: chrono::Duration::seconds(self.token_ttl_secs),
        }
    }
}

/// Complete gateway configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub http: HttpServerConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub orchestration: OrchestrationConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub logging: LogConfig,
}

impl AppConfig {
    /// Load from `path` (defaults when `None`), then apply the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply overrides from `lookup` (normally the process environment)
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            self.http.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.http.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_PORT,
                value: port.clone(),
            })?;
        }
        if let Some(secret) = lookup(ENV_JWT_SECRET) {
            self.auth.jwt_secret = secret;
        }
        if let Some(seed) = lookup(ENV_SEED) {
            self.store.seed_path = Some(PathBuf::from(seed));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ConfigError::Invalid("auth.jwt_secret must not be empty".to_string()));
        }
        if self.auth.token_ttl_secs <= 0 {
            return Err(ConfigError::Invalid("auth.token_ttl_secs must be > 0".to_string()));
        }
        if self.http.workers == Some(0) {
            return Err(ConfigError::Invalid("http.workers must be > 0".to_string()));
        }
        Ok(())
    }
}
