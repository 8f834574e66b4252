//! Credential artifact for the authenticated transport.

use std::fmt;
use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::{StoreError, StoreResult};

/// On-disk shape of the credential artifact.
#[derive(Deserialize)]
struct CredentialFile {
    #[serde(default)]
    database_secret: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
}

/// Secret used to authenticate requests against the database.
pub enum ServiceCredential {
    /// Database secret, sent as `auth=<secret>`.
    DatabaseSecret(SecretString),
    /// Pre-minted OAuth access token, sent as `access_token=<token>`.
    AccessToken(SecretString),
}

impl ServiceCredential {
    /// Load a credential artifact from `path`.
    ///
    /// A `database_secret` wins over an `access_token` if both are present.
    pub fn from_file(path: &Path) -> StoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StoreError::Credential(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> StoreResult<Self> {
        let file: CredentialFile = serde_json::from_str(content)
            .map_err(|e| StoreError::Credential(format!("Failed to parse credential: {e}")))?;

        match (file.database_secret, file.access_token) {
            (Some(secret), _) if !secret.is_empty() => {
                Ok(ServiceCredential::DatabaseSecret(SecretString::from(secret)))
            }
            (_, Some(token)) if !token.is_empty() => {
                Ok(ServiceCredential::AccessToken(SecretString::from(token)))
            }
            _ => Err(StoreError::Credential(
                "credential has neither database_secret nor access_token".to_string(),
            )),
        }
    }

    /// Query parameter name and value to attach to each request.
    pub(crate) fn query_param(&self) -> (&'static str, &str) {
        match self {
            ServiceCredential::DatabaseSecret(secret) => ("auth", secret.expose_secret()),
            ServiceCredential::AccessToken(token) => ("access_token", token.expose_secret()),
        }
    }
}

impl fmt::Debug for ServiceCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceCredential::DatabaseSecret(_) => f.write_str("DatabaseSecret([REDACTED])"),
            ServiceCredential::AccessToken(_) => f.write_str("AccessToken([REDACTED])"),
        }
    }
}
