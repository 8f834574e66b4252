//! Main application orchestration.
//!
//! Startup is one-shot: the remote store connection is chosen once and then
//! shared by every request handler for the process lifetime.

use axum::Router;
use ecosort_api::{create_router, run_server, AppState};
use ecosort_facade::Facade;
use ecosort_store::{connect, Connection};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

/// Main application.
#[derive(Debug)]
pub struct Application {
    config: AppConfig,
    facade: Facade,
}

impl Application {
    /// Establish the remote store connection and build the facade.
    ///
    /// Never fails: an unreachable or unconfigured store yields an offline
    /// connection and the server still starts.
    pub async fn connect(config: AppConfig) -> Self {
        let connection = connect(&config.store_settings()).await;
        Self::with_connection(config, connection)
    }

    /// Build around an existing connection.
    pub fn with_connection(config: AppConfig, connection: Connection) -> Self {
        let status = connection.status();
        if connection.store().is_some() {
            info!(
                method = %status.method,
                database_url = %status.database_url,
                "Remote store connected"
            );
        } else {
            warn!(
                database_url = %status.database_url,
                "Remote store unavailable, serving offline defaults"
            );
        }

        Self {
            config,
            facade: Facade::new(connection),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn facade(&self) -> &Facade {
        &self.facade
    }

    /// HTTP router for this application.
    pub fn router(&self) -> Router {
        create_router(AppState::new(self.facade.clone()))
    }

    /// Serve HTTP until shutdown.
    pub async fn run(self) -> AppResult<()> {
        run_server(self.facade, self.config.server)
            .await
            .map_err(|e| AppError::Server(e.to_string()))
    }
}
