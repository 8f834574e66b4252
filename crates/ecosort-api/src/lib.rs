//! ecosort-api - HTTP JSON surface for the device-state facade.
//!
//! A thin translation layer: every handler calls one facade operation and
//! serializes the result. Facade failures are already degraded payloads, so
//! handlers never return 5xx for them.
//!
//! # Routes
//!
//! ```text
//! GET  /api/status           → live normalized state (polled by the UI)
//! POST /api/reset_detection  → clear detection, device back to IDLE
//! GET  /api/statistics       → wet/dry counts and percentages
//! GET  /api/health           → service + remote store connection summary
//! POST /api/simulate         → inject WET/DRY or RESET
//! POST /api/system_state     → write system.state
//! GET  /metrics              → Prometheus exposition
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use ecosort_api::{ApiConfig, run_server};
//!
//! let facade = ecosort_facade::Facade::new(connection);
//! run_server(facade, ApiConfig::default()).await?;
//! ```

mod config;
mod server;
mod types;

pub use config::ApiConfig;
pub use server::{create_router, run_server, AppState};
pub use types::{
    HealthResponse, ResetResponse, SimulationRequest, SystemStateRequest, SystemStateResponse,
};
