//! Application configuration.
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults
//! 2. Optional TOML file (`--config`, `ECOSORT_CONFIG`, `config/default.toml`)
//! 3. `ECOSORT_<SECTION>__<KEY>` environment variables (e.g. `ECOSORT_SERVER__PORT`)
//! 4. The remote store variables shared with the device tooling:
//!    `FIREBASE_DB_URL`, `DATABASE_URL`, `API_KEY`, `FIREBASE_CREDENTIALS_PATH`

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File, FileFormat, Map};
use ecosort_api::ApiConfig;
use ecosort_store::{StoreSettings, Timeouts};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

/// Default config file location.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Remote store variables read verbatim from the environment.
const STORE_ENV_KEYS: &[(&str, &str)] = &[
    ("FIREBASE_DB_URL", "firebase_db_url"),
    ("DATABASE_URL", "database_url"),
    ("API_KEY", "api_key"),
    ("FIREBASE_CREDENTIALS_PATH", "firebase_credentials_path"),
];

/// Remote store call timeouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreTimingConfig {
    /// Status poll reads. Default: 2000.
    #[serde(default = "default_live_timeout_ms")]
    pub live_timeout_ms: u64,
    /// Statistics reads and all writes. Default: 3000.
    #[serde(default = "default_admin_timeout_ms")]
    pub admin_timeout_ms: u64,
    /// Startup connectivity probe. Default: 5000.
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

fn default_live_timeout_ms() -> u64 {
    2_000
}

fn default_admin_timeout_ms() -> u64 {
    3_000
}

fn default_probe_timeout_ms() -> u64 {
    5_000
}

impl Default for StoreTimingConfig {
    fn default() -> Self {
        Self {
            live_timeout_ms: default_live_timeout_ms(),
            admin_timeout_ms: default_admin_timeout_ms(),
            probe_timeout_ms: default_probe_timeout_ms(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ApiConfig,
    /// Remote store timeouts.
    #[serde(default)]
    pub store: StoreTimingConfig,
    /// Realtime database URL.
    #[serde(default)]
    pub firebase_db_url: Option<String>,
    /// Generic database URL, used when `firebase_db_url` is unset.
    #[serde(default)]
    pub database_url: Option<String>,
    /// Web API key. Carried for the frontend tooling; unused here.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Credential artifact enabling the authenticated transport.
    #[serde(default = "default_credentials_path")]
    pub firebase_credentials_path: String,
}

fn default_credentials_path() -> String {
    "firebase-credentials.json".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ApiConfig::default(),
            store: StoreTimingConfig::default(),
            firebase_db_url: None,
            database_url: None,
            api_key: None,
            firebase_credentials_path: default_credentials_path(),
        }
    }
}

impl AppConfig {
    /// Load from `path` (if it exists) and the process environment.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let env: Map<String, String> = std::env::vars().collect();
        Self::from_sources(path, &env)
    }

    /// Load from `path` (if it exists) and an explicit environment map.
    pub fn from_sources(path: Option<&Path>, env: &Map<String, String>) -> AppResult<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            if path.exists() {
                builder = builder.add_source(File::from(path).format(FileFormat::Toml));
            } else {
                tracing::warn!(path = %path.display(), "Config file not found, using defaults");
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("ECOSORT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(Some(env.clone())),
        );

        for (var, key) in STORE_ENV_KEYS {
            let value = env.get(*var).filter(|v| !v.trim().is_empty()).cloned();
            builder = builder.set_override_option(*key, value)?;
        }

        let config: AppConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Effective database URL: `firebase_db_url`, else `database_url`.
    pub fn effective_database_url(&self) -> Option<&str> {
        [self.firebase_db_url.as_deref(), self.database_url.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|url| !url.is_empty())
    }

    /// Settings for the one-shot store connection.
    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            database_url: self.effective_database_url().map(str::to_string),
            credentials_path: PathBuf::from(&self.firebase_credentials_path),
            timeouts: Timeouts {
                live: Duration::from_millis(self.store.live_timeout_ms),
                admin: Duration::from_millis(self.store.admin_timeout_ms),
            },
            probe_timeout: Duration::from_millis(self.store.probe_timeout_ms),
        }
    }
}
