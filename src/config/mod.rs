use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    Missing(PathBuf),

    #[error("Unable to read config file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Malformed config file {path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
}

/// Server configuration. Every field may be omitted from the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Postgres URL; absent or empty runs on the in-memory backend
    pub database: Option<String>,
    pub listen: String,
    pub cors: bool,
    pub max_connections: u32,
    pub bcrypt_cost: u32,
    /// Sessions never expire when unset
    pub session_ttl_secs: Option<u64>,
    pub request_timeout_secs: u64,
    pub max_body_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: None,
            listen: "0.0.0.0:3000".to_string(),
            cors: true,
            max_connections: 10,
            bcrypt_cost: 12,
            session_ttl_secs: None,
            request_timeout_secs: 30,
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    /// Read `path`, then apply environment overrides.
    ///
    /// A missing file falls back to defaults unless `require` is set.
    /// A file that exists but does not parse is always an error.
    pub fn load(path: &Path, require: bool) -> Result<Self, ConfigError> {
        let config = match fs::read_to_string(path) {
            Ok(text) => Self::from_json(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if require {
                    return Err(ConfigError::Missing(path.to_path_buf()));
                }
                info!("No config file at {}, using defaults", path.display());
                Self::default()
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        Ok(config.with_env_overrides())
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    fn with_env_overrides(self) -> Self {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Values that fail to parse keep the current setting.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("DATABASE_URL") {
            self.database = Some(v);
        }
        if let Some(v) = lookup("VINCA_LISTEN") {
            self.listen = v;
        }
        override_parsed(&lookup, "VINCA_CORS", &mut self.cors);
        override_parsed(&lookup, "VINCA_MAX_CONNECTIONS", &mut self.max_connections);
        override_parsed(&lookup, "VINCA_BCRYPT_COST", &mut self.bcrypt_cost);
        if let Some(v) = lookup("VINCA_SESSION_TTL_SECS") {
            self.session_ttl_secs = v.parse().ok().or(self.session_ttl_secs);
        }
        override_parsed(&lookup, "VINCA_REQUEST_TIMEOUT_SECS", &mut self.request_timeout_secs);
        override_parsed(&lookup, "VINCA_MAX_BODY_BYTES", &mut self.max_body_bytes);
        self
    }

    /// Database URL, treating an empty string as unset
    pub fn database_url(&self) -> Option<&str> {
        self.database.as_deref().map(str::trim).filter(|url| !url.is_empty())
    }

    pub fn session_ttl(&self) -> Option<Duration> {
        self.session_ttl_secs.map(Duration::from_secs)
    }

    /// Per-request deadline; `0` disables it.
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

fn override_parsed<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(value) = lookup(key).and_then(|v| v.trim().parse().ok()) {
        *target = value;
    }
}
