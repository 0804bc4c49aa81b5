//! Tracker configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`). Parsing is done against a lookup function so the same code
//! path can be exercised in tests without touching the process
//! environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Default GCE metadata endpoint for the default service account token.
pub const DEFAULT_METADATA_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Configuration error raised at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `LISTEN_ADDR` or `PORT` could not be parsed.
    #[error("invalid listen address {0:?}")]
    InvalidListenAddr(String),

    /// `STORAGE_BACKEND` names an unknown backend.
    #[error("unknown storage backend {0:?} (expected local, gcs or memory)")]
    UnknownBackend(String),
}

/// Google Cloud Storage settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcsConfig {
    /// Bucket holding the document.
    pub bucket: String,
    /// Object name of the document.
    pub object: String,
    /// JSON API base URL.
    pub endpoint: String,
    /// Static bearer token. When absent, tokens come from `metadata_url`.
    pub access_token: Option<String>,
    /// Metadata server token endpoint.
    pub metadata_url: String,
}

/// Which storage backend holds the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// JSON file on the local filesystem.
    Local {
        /// Document path.
        path: PathBuf,
    },
    /// Single object in Google Cloud Storage.
    Gcs(GcsConfig),
    /// Process memory only.
    Memory,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per line.
    Json,
}

/// Top-level tracker configuration.
///
/// Loaded once at startup via [`TrackerConfig::from_env`].
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,

    /// Storage backend selection.
    pub storage: StorageConfig,

    /// Directory holding the frontend assets.
    pub static_dir: PathBuf,

    /// Per-request timeout.
    pub request_timeout: Duration,

    /// Log output format.
    pub log_format: LogFormat,
}

impl TrackerConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the listen address cannot be parsed or
    /// the storage backend is unknown.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Missing or unparsable optional values fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the listen address cannot be parsed or
    /// the storage backend is unknown.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr = match lookup("LISTEN_ADDR") {
            Some(addr) => addr,
            None => format!("0.0.0.0:{}", lookup("PORT").unwrap_or_else(|| "8080".to_string())),
        };
        let listen_addr: SocketAddr = listen_addr
            .parse()
            .map_err(|_| ConfigError::InvalidListenAddr(listen_addr.clone()))?;

        let backend = match lookup("STORAGE_BACKEND") {
            Some(name) => name.to_ascii_lowercase(),
            None if parse_bool(lookup("USE_LOCAL_STORAGE"), true) => "local".to_string(),
            None => "gcs".to_string(),
        };
        let storage = match backend.as_str() {
            "local" => StorageConfig::Local {
                path: lookup("LOCAL_DATA_FILE")
                    .unwrap_or_else(|| "local-data.json".to_string())
                    .into(),
            },
            "gcs" => StorageConfig::Gcs(GcsConfig {
                bucket: lookup("GCS_BUCKET").unwrap_or_else(|| "puzzle-tracker-data".to_string()),
                object: lookup("GCS_OBJECT")
                    .unwrap_or_else(|| "puzzle-tracker-data.json".to_string()),
                endpoint: lookup("GCS_ENDPOINT")
                    .unwrap_or_else(|| "https://storage.googleapis.com".to_string()),
                access_token: lookup("GCS_ACCESS_TOKEN").filter(|t| !t.is_empty()),
                metadata_url: lookup("GCS_METADATA_URL")
                    .unwrap_or_else(|| DEFAULT_METADATA_URL.to_string()),
            }),
            "memory" => StorageConfig::Memory,
            _ => return Err(ConfigError::UnknownBackend(backend)),
        };

        let static_dir = lookup("STATIC_DIR").unwrap_or_else(|| "static".to_string()).into();
        let request_timeout = Duration::from_secs(parse_or(lookup("REQUEST_TIMEOUT_SECS"), 30));
        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            listen_addr,
            storage,
            static_dir,
            request_timeout,
            log_format,
        })
    }
}

/// Parses an optional value as `T`, returning `default` on missing or
/// invalid values.
fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Parses an optional boolean. Accepts `"true"`, `"1"`, `"false"`, `"0"`
/// (case-insensitive). Returns `default` otherwise.
fn parse_bool(value: Option<String>, default: bool) -> bool {
    match value.map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        _ => default,
    }
}
