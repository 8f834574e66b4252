//! Authenticated transport.
//!
//! Holds one pooled HTTP client for the life of the process and signs every
//! request with the loaded [`ServiceCredential`]. Multi-path writes go out
//! as a single root-level PATCH.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{info, warn};

use crate::credential::ServiceCredential;
use crate::error::{StoreError, StoreResult};
use crate::rest::RestEndpoint;
use crate::store::{
    BoxFuture, Fields, PathUpdate, ReadProfile, RemoteStore, StorePath, TransportMode,
};

/// Default client-level timeout for authenticated requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Credentialed access to the realtime database.
#[derive(Debug)]
pub struct AuthenticatedStore {
    endpoint: RestEndpoint,
    credential: ServiceCredential,
}

impl AuthenticatedStore {
    /// Create a store for `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>, credential: ServiceCredential) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .pool_idle_timeout(None)
            .build()
            .map_err(|e| StoreError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        let base_url = base_url.into();
        info!(url = %base_url, "Authenticated store ready");

        Ok(Self {
            endpoint: RestEndpoint::new(client, base_url),
            credential,
        })
    }

    pub fn base_url(&self) -> &str {
        self.endpoint.base_url()
    }
}

/// Flatten path updates into one multi-location body:
/// `{"bin/lastWaste": "NONE", "system/state": "IDLE"}`.
///
/// A root PATCH with nested objects would replace `bin` and `system`
/// wholesale; slash-joined keys only touch the named leaves.
pub(crate) fn multi_location_body(updates: &[PathUpdate]) -> Fields {
    let mut body = Fields::new();
    for update in updates {
        let prefix = update.path.segment();
        for (key, value) in &update.fields {
            let location = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}/{key}")
            };
            body.insert(location, value.clone());
        }
    }
    body
}

impl RemoteStore for AuthenticatedStore {
    fn mode(&self) -> TransportMode {
        TransportMode::Authenticated
    }

    // The client-level timeout applies regardless of profile.
    fn read(&self, path: StorePath, _profile: ReadProfile) -> BoxFuture<'_, StoreResult<Value>> {
        Box::pin(async move {
            let result = self
                .endpoint
                .get(path, None, Some(self.credential.query_param()))
                .await;
            if let Err(e) = &result {
                warn!(path = %path, error = %e, "Authenticated read failed");
            }
            result
        })
    }

    fn merge(&self, path: StorePath, fields: Fields) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            let result = self
                .endpoint
                .patch(path, &fields, None, Some(self.credential.query_param()))
                .await;
            if let Err(e) = &result {
                warn!(path = %path, error = %e, "Authenticated merge failed");
            }
            result
        })
    }

    fn merge_many(&self, updates: Vec<PathUpdate>) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            let body = multi_location_body(&updates);
            self.merge(StorePath::Root, body).await
        })
    }
}
