//! Anonymous REST transport.
//!
//! Used when no credential artifact is available and the database rules
//! allow public access. Every call carries its own short timeout so a slow
//! or unreachable database cannot stall the status poll.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::rest::RestEndpoint;
use crate::store::{BoxFuture, Fields, ReadProfile, RemoteStore, StorePath, Timeouts, TransportMode};

/// Anonymous per-call HTTP access to the realtime database.
#[derive(Debug, Clone)]
pub struct AnonymousStore {
    endpoint: RestEndpoint,
    timeouts: Timeouts,
}

impl AnonymousStore {
    /// Create a store for `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>, timeouts: Timeouts) -> StoreResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| StoreError::HttpClient(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self::with_client(client, base_url, timeouts))
    }

    /// Create a store around an existing client.
    pub fn with_client(client: Client, base_url: impl Into<String>, timeouts: Timeouts) -> Self {
        Self {
            endpoint: RestEndpoint::new(client, base_url),
            timeouts,
        }
    }

    /// Connectivity probe: `GET {base}/.json` must answer HTTP 200.
    pub async fn probe(&self, timeout: Duration) -> StoreResult<()> {
        info!(url = %self.endpoint.base_url(), "Probing anonymous REST access");
        self.endpoint
            .get(StorePath::Root, Some(timeout), None)
            .await
            .map(|_| ())
    }

    pub fn base_url(&self) -> &str {
        self.endpoint.base_url()
    }
}

impl RemoteStore for AnonymousStore {
    fn mode(&self) -> TransportMode {
        TransportMode::Anonymous
    }

    fn read(&self, path: StorePath, profile: ReadProfile) -> BoxFuture<'_, StoreResult<Value>> {
        Box::pin(async move {
            let timeout = self.timeouts.for_profile(profile);
            let result = self.endpoint.get(path, Some(timeout), None).await;
            if let Err(e) = &result {
                // Live polls fail quietly; the next poll cycle re-attempts.
                match profile {
                    ReadProfile::Live => debug!(path = %path, error = %e, "Live read failed"),
                    ReadProfile::Admin => warn!(path = %path, error = %e, "Read failed"),
                }
            }
            result
        })
    }

    fn merge(&self, path: StorePath, fields: Fields) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            let result = self
                .endpoint
                .patch(path, &fields, Some(self.timeouts.admin), None)
                .await;
            if let Err(e) = &result {
                warn!(path = %path, error = %e, "Merge failed");
            }
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (MockServer, AnonymousStore) {
        let server = MockServer::start().await;
        let store = AnonymousStore::new(server.uri(), Timeouts::default()).unwrap();
        (server, store)
    }

    #[tokio::test]
    async fn test_read_root() {
        let (server, store) = setup().await;
        Mock::given(method("GET"))
            .and(path("/.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "system": {"state": "IDLE"}
            })))
            .mount(&server)
            .await;

        let value = store.read(StorePath::Root, ReadProfile::Live).await.unwrap();
        assert_eq!(value["system"]["state"], "IDLE");
    }

    #[tokio::test]
    async fn test_read_missing_subtree_is_null() {
        let (server, store) = setup().await;
        Mock::given(method("GET"))
            .and(path("/bin.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let value = store.read(StorePath::Bin, ReadProfile::Admin).await.unwrap();
        assert!(value.is_null());
    }

    #[tokio::test]
    async fn test_read_non_success_status() {
        let (server, store) = setup().await;
        Mock::given(method("GET"))
            .and(path("/.json"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = store
            .read(StorePath::Root, ReadProfile::Live)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Status { status: 401, .. }));
        assert!(err.is_unreachable());
    }

    #[tokio::test]
    async fn test_live_read_times_out_fast() {
        let server = MockServer::start().await;
        let store = AnonymousStore::new(
            server.uri(),
            Timeouts {
                live: Duration::from_millis(50),
                admin: Duration::from_secs(3),
            },
        )
        .unwrap();
        Mock::given(method("GET"))
            .and(path("/.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let err = store
            .read(StorePath::Root, ReadProfile::Live)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let (server, store) = setup().await;
        Mock::given(method("GET"))
            .and(path("/.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = store
            .read(StorePath::Root, ReadProfile::Live)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
        assert!(!err.is_unreachable());
    }

    #[tokio::test]
    async fn test_merge_patches_only_named_fields() {
        let (server, store) = setup().await;
        Mock::given(method("PATCH"))
            .and(path("/system.json"))
            .and(body_json(json!({"state": "SORTING"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": "SORTING"})))
            .expect(1)
            .mount(&server)
            .await;

        let mut fields = Fields::new();
        fields.insert("state".to_string(), json!("SORTING"));
        store.merge(StorePath::System, fields).await.unwrap();
    }

    #[tokio::test]
    async fn test_merge_many_attempts_every_update() {
        let (server, store) = setup().await;
        Mock::given(method("PATCH"))
            .and(path("/bin.json"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/system.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let result = store
            .merge_many(vec![
                crate::PathUpdate::single(StorePath::Bin, "lastWaste", "NONE"),
                crate::PathUpdate::single(StorePath::System, "state", "IDLE"),
            ])
            .await;
        assert!(matches!(result, Err(StoreError::Status { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_probe() {
        let (server, store) = setup().await;
        Mock::given(method("GET"))
            .and(path("/.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        assert!(store.probe(Duration::from_secs(5)).await.is_ok());
    }
}
