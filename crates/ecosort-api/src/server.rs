//! HTTP server implementation using axum.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use ecosort_facade::{Facade, NormalizedState, SimulationOutcome, Statistics};
use ecosort_telemetry::Metrics;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ApiConfig;
use crate::types::{
    HealthResponse, ResetResponse, SimulationRequest, SystemStateRequest, SystemStateResponse,
};

/// Shared application state for axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    facade: Facade,
}

impl AppState {
    pub fn new(facade: Facade) -> Self {
        Self { facade }
    }
}

/// Create the axum router.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/status", get(get_status))
        .route("/reset_detection", post(reset_detection))
        .route("/statistics", get(get_statistics))
        .route("/health", get(health_check))
        .route("/simulate", post(simulate))
        .route("/system_state", post(update_system_state));

    Router::new()
        .nest("/api", api)
        .route("/metrics", get(metrics))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Live device state, polled by the dashboard.
async fn get_status(State(state): State<AppState>) -> Json<NormalizedState> {
    Metrics::http_request("/api/status");
    Json(state.facade.get_live_state().await)
}

/// Reset detection after the frontend animation completes.
async fn reset_detection(State(state): State<AppState>) -> Json<ResetResponse> {
    Metrics::http_request("/api/reset_detection");
    let success = state.facade.reset_waste_status().await;
    Json(ResetResponse::from_success(success))
}

async fn get_statistics(State(state): State<AppState>) -> Json<Statistics> {
    Metrics::http_request("/api/statistics");
    Json(state.facade.get_statistics().await)
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Metrics::http_request("/api/health");
    Json(HealthResponse {
        status: "healthy".to_string(),
        firebase: state.facade.get_connection_status(),
    })
}

/// Simulate waste detection for testing without the device.
async fn simulate(
    State(state): State<AppState>,
    Json(request): Json<SimulationRequest>,
) -> Json<SimulationOutcome> {
    Metrics::http_request("/api/simulate");
    Json(state.facade.simulate(&request.action).await)
}

async fn update_system_state(
    State(state): State<AppState>,
    Json(request): Json<SystemStateRequest>,
) -> Json<SystemStateResponse> {
    Metrics::http_request("/api/system_state");
    let success = state.facade.update_system_state(&request.state).await;
    Json(SystemStateResponse {
        success,
        state: request.state,
    })
}

/// Prometheus text exposition.
async fn metrics() -> Response {
    Metrics::http_request("/metrics");
    match Metrics::encode() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Run the HTTP server until Ctrl-C.
pub async fn run_server(
    facade: Facade,
    config: ApiConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = create_router(AppState::new(facade));

    let addr = config.bind_address();
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
