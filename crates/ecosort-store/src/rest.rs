//! REST plumbing shared by both transports.
//!
//! Firebase-style realtime databases expose every path as
//! `{base}/{path}.json`: `GET` reads the subtree, `PATCH` merges the body
//! into it without touching unnamed children.

use std::time::{Duration, Instant};

use ecosort_telemetry::Metrics;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::StorePath;

/// Query parameter carrying a credential (`auth=...` or `access_token=...`).
pub(crate) type AuthParam<'a> = (&'static str, &'a str);

/// A database base URL plus the HTTP client used to reach it.
#[derive(Debug, Clone)]
pub(crate) struct RestEndpoint {
    client: Client,
    base_url: String,
}

impl RestEndpoint {
    pub(crate) fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}/{path}.json`.
    pub(crate) async fn get(
        &self,
        path: StorePath,
        timeout: Option<Duration>,
        auth: Option<AuthParam<'_>>,
    ) -> StoreResult<Value> {
        let request = self.client.get(path.resource_url(&self.base_url));
        let request = decorate(request, timeout, auth);

        let started = Instant::now();
        let result = fetch_json(request, path).await;
        record("read", started, &result);
        result
    }

    /// `PATCH {base}/{path}.json` with `body`.
    pub(crate) async fn patch<B: Serialize + ?Sized>(
        &self,
        path: StorePath,
        body: &B,
        timeout: Option<Duration>,
        auth: Option<AuthParam<'_>>,
    ) -> StoreResult<()> {
        let request = self
            .client
            .patch(path.resource_url(&self.base_url))
            .json(body);
        let request = decorate(request, timeout, auth);

        let started = Instant::now();
        let result = send_patch(request, path).await;
        record("merge", started, &result);
        result
    }
}

fn decorate(
    mut request: RequestBuilder,
    timeout: Option<Duration>,
    auth: Option<AuthParam<'_>>,
) -> RequestBuilder {
    if let Some(timeout) = timeout {
        request = request.timeout(timeout);
    }
    if let Some((name, value)) = auth {
        request = request.query(&[(name, value)]);
    }
    request
}

async fn fetch_json(request: RequestBuilder, path: StorePath) -> StoreResult<Value> {
    let label = path.to_string();
    let response = request
        .send()
        .await
        .map_err(|e| StoreError::from_reqwest(&label, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(StoreError::Status {
            path: label,
            status: status.as_u16(),
        });
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| StoreError::from_reqwest(&label, e))?;

    debug!(path = %label, "Read subtree");
    Ok(body)
}

async fn send_patch(request: RequestBuilder, path: StorePath) -> StoreResult<()> {
    let label = path.to_string();
    let response = request
        .send()
        .await
        .map_err(|e| StoreError::from_reqwest(&label, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(StoreError::Status {
            path: label,
            status: status.as_u16(),
        });
    }

    debug!(path = %label, "Merged fields");
    Ok(())
}

fn record<T>(op: &str, started: Instant, result: &StoreResult<T>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    Metrics::store_request(op, outcome);
    Metrics::store_latency(op, started.elapsed().as_secs_f64() * 1000.0);
}
