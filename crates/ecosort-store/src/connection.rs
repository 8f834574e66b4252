//! One-shot transport selection at startup.
//!
//! [`connect`] runs exactly once before the HTTP server starts. It never
//! fails: every problem is logged and results in an offline
//! ([`ConnectionMode::Uninitialized`]) connection. The returned
//! [`Connection`] has no mutating methods and is shared read-only for the
//! rest of the process lifetime.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use ecosort_telemetry::Metrics;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::anonymous::AnonymousStore;
use crate::authenticated::AuthenticatedStore;
use crate::credential::ServiceCredential;
use crate::store::{DynRemoteStore, Timeouts, TransportMode};

/// Inputs to [`connect`].
#[derive(Debug, Clone)]
pub struct StoreSettings {
    /// Database base URL. `None` keeps the process offline.
    pub database_url: Option<String>,
    /// Location of the credential artifact for the authenticated transport.
    pub credentials_path: PathBuf,
    /// Per-call timeouts for the anonymous transport.
    pub timeouts: Timeouts,
    /// Timeout for the anonymous connectivity probe.
    pub probe_timeout: Duration,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database_url: None,
            credentials_path: PathBuf::from("firebase-credentials.json"),
            timeouts: Timeouts::default(),
            probe_timeout: Duration::from_secs(5),
        }
    }
}

/// Connection mode fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    Uninitialized,
    AuthenticatedClient,
    AnonymousHttp,
}

impl From<TransportMode> for ConnectionMode {
    fn from(mode: TransportMode) -> Self {
        match mode {
            TransportMode::Authenticated => ConnectionMode::AuthenticatedClient,
            TransportMode::Anonymous => ConnectionMode::AnonymousHttp,
        }
    }
}

/// Connection summary reported by the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionStatus {
    /// `"Connected"` or `"Disconnected"`.
    pub status: String,
    /// Transport label, or `"None"` when offline.
    pub method: String,
    /// Configured database URL, or `"Not configured"`.
    pub database_url: String,
}

/// The process-wide remote store handle.
#[derive(Clone)]
pub struct Connection {
    database_url: Option<String>,
    store: Option<DynRemoteStore>,
}

impl Connection {
    /// An offline connection. Reads degrade to defaults, writes fail.
    pub fn offline(database_url: Option<String>) -> Self {
        Self {
            database_url,
            store: None,
        }
    }

    /// A connection backed by an already-selected store.
    pub fn with_store(database_url: Option<String>, store: DynRemoteStore) -> Self {
        Self {
            database_url,
            store: Some(store),
        }
    }

    pub fn mode(&self) -> ConnectionMode {
        self.store
            .as_ref()
            .map(|s| ConnectionMode::from(s.mode()))
            .unwrap_or(ConnectionMode::Uninitialized)
    }

    /// Active store, if any.
    pub fn store(&self) -> Option<&DynRemoteStore> {
        self.store.as_ref()
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    /// Summarize the connection without touching the network.
    pub fn status(&self) -> ConnectionStatus {
        let database_url = self
            .database_url
            .clone()
            .unwrap_or_else(|| "Not configured".to_string());

        match &self.store {
            Some(store) => ConnectionStatus {
                status: "Connected".to_string(),
                method: store.mode().method_label().to_string(),
                database_url,
            },
            None => ConnectionStatus {
                status: "Disconnected".to_string(),
                method: "None".to_string(),
                database_url,
            },
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("database_url", &self.database_url)
            .field("mode", &self.mode())
            .finish()
    }
}

/// Select a transport for the process lifetime.
///
/// 1. No database URL: offline.
/// 2. Credential artifact exists: authenticated client. An unreadable
///    artifact leaves the connection offline.
/// 3. Otherwise probe `GET {base}/.json`; HTTP 200 selects anonymous REST.
pub async fn connect(settings: &StoreSettings) -> Connection {
    let connection = select_transport(settings).await;
    Metrics::connection_mode(mode_label(connection.mode()));
    connection
}

async fn select_transport(settings: &StoreSettings) -> Connection {
    let Some(raw_url) = settings.database_url.as_deref() else {
        warn!("Database URL not set, running in offline mode");
        return Connection::offline(None);
    };
    let base_url = raw_url.trim_end_matches('/').to_string();
    let database_url = Some(base_url.clone());

    if settings.credentials_path.exists() {
        let store = ServiceCredential::from_file(&settings.credentials_path)
            .and_then(|credential| AuthenticatedStore::new(base_url.clone(), credential));
        return match store {
            Ok(store) => {
                info!(url = %base_url, "Remote store connected (authenticated)");
                Connection::with_store(database_url, Arc::new(store))
            }
            Err(e) => {
                error!(
                    path = %settings.credentials_path.display(),
                    error = %e,
                    "Authenticated store initialization failed"
                );
                Connection::offline(database_url)
            }
        };
    }

    let store = match AnonymousStore::new(base_url.clone(), settings.timeouts) {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "Anonymous store initialization failed");
            return Connection::offline(database_url);
        }
    };

    match store.probe(settings.probe_timeout).await {
        Ok(()) => {
            info!(url = %base_url, "Remote store connected (anonymous REST)");
            Connection::with_store(database_url, Arc::new(store))
        }
        Err(e) => {
            error!(url = %base_url, error = %e, "Remote store probe failed, running offline");
            Connection::offline(database_url)
        }
    }
}

fn mode_label(mode: ConnectionMode) -> &'static str {
    match mode {
        ConnectionMode::Uninitialized => "uninitialized",
        ConnectionMode::AuthenticatedClient => "authenticated",
        ConnectionMode::AnonymousHttp => "anonymous",
    }
}
