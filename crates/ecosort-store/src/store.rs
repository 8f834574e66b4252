//! Remote store abstraction.
//!
//! The facade only ever needs two capabilities from the shared realtime
//! database: read a subtree and merge named fields into a subtree. Both
//! transports implement [`RemoteStore`], so the rest of the system never
//! knows which one is active.

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::StoreResult;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Field set for a partial update (`{"state": "IDLE"}`).
pub type Fields = Map<String, Value>;

/// Locations in the shared document this system touches.
///
/// The layout is shared with the device firmware and must not change
/// without updating both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorePath {
    /// Whole document.
    Root,
    /// Bin namespace (`lastWaste`, `wetFull`, counters, ...).
    Bin,
    /// Device/system namespace (`state`, `wifi`, `ssid`).
    System,
}

impl StorePath {
    /// Path segment relative to the database root (empty for root).
    pub fn segment(&self) -> &'static str {
        match self {
            StorePath::Root => "",
            StorePath::Bin => "bin",
            StorePath::System => "system",
        }
    }

    /// REST resource for this path: `{base}/{segment}.json`.
    pub fn resource_url(&self, base_url: &str) -> String {
        format!("{}/{}.json", base_url, self.segment())
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segment())
    }
}

/// Timeout class for a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadProfile {
    /// Status poll path. Short timeout, fail fast; the next poll retries.
    Live,
    /// Statistics and administrative reads.
    Admin,
}

/// Per-request timeouts for the anonymous transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Timeout for [`ReadProfile::Live`] reads.
    pub live: Duration,
    /// Timeout for [`ReadProfile::Admin`] reads and all merges.
    pub admin: Duration,
}

impl Timeouts {
    pub fn for_profile(&self, profile: ReadProfile) -> Duration {
        match profile {
            ReadProfile::Live => self.live,
            ReadProfile::Admin => self.admin,
        }
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            live: Duration::from_secs(2),
            admin: Duration::from_secs(3),
        }
    }
}

/// Which transport an active connection uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    /// Credentialed access through a persistent client.
    Authenticated,
    /// Anonymous per-call REST requests (public database rules).
    Anonymous,
}

impl TransportMode {
    /// Human-readable method label reported by the health endpoint.
    pub fn method_label(&self) -> &'static str {
        match self {
            TransportMode::Authenticated => "Authenticated (Secure)",
            TransportMode::Anonymous => "REST API (Public)",
        }
    }

    /// Short label used for metrics and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Authenticated => "authenticated",
            TransportMode::Anonymous => "anonymous",
        }
    }
}

/// One path-scoped partial update.
#[derive(Debug, Clone, PartialEq)]
pub struct PathUpdate {
    pub path: StorePath,
    pub fields: Fields,
}

impl PathUpdate {
    pub fn new(path: StorePath, fields: Fields) -> Self {
        Self { path, fields }
    }

    /// Update setting a single string field.
    pub fn single(path: StorePath, key: &str, value: impl Into<String>) -> Self {
        let mut fields = Fields::new();
        fields.insert(key.to_string(), Value::String(value.into()));
        Self { path, fields }
    }
}

/// Access to the shared realtime document.
///
/// Implementations never retry. Failures are returned as typed errors and
/// it is up to the caller to degrade them.
pub trait RemoteStore: Send + Sync {
    /// Transport this store uses.
    fn mode(&self) -> TransportMode;

    /// Read the raw JSON subtree at `path`. A missing subtree is `Value::Null`.
    fn read(&self, path: StorePath, profile: ReadProfile) -> BoxFuture<'_, StoreResult<Value>>;

    /// Patch `fields` into `path`, leaving sibling fields untouched.
    fn merge(&self, path: StorePath, fields: Fields) -> BoxFuture<'_, StoreResult<()>>;

    /// Apply several path merges as one logical write.
    ///
    /// Every update is attempted even if an earlier one fails; the first
    /// error is returned.
    fn merge_many(&self, updates: Vec<PathUpdate>) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            let mut first_error = None;
            for update in updates {
                let path = update.path;
                if let Err(e) = self.merge(path, update.fields).await {
                    warn!(path = %path, error = %e, "Merge failed");
                    first_error.get_or_insert(e);
                }
            }
            match first_error {
                Some(e) => Err(e),
                None => Ok(()),
            }
        })
    }
}

/// Arc wrapper for RemoteStore trait objects.
pub type DynRemoteStore = Arc<dyn RemoteStore>;
