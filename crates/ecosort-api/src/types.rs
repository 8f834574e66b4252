//! Request and response bodies that are specific to the HTTP surface.

use ecosort_store::ConnectionStatus;
use serde::{Deserialize, Serialize};

/// `POST /api/reset_detection` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetResponse {
    pub success: bool,
    pub message: String,
}

impl ResetResponse {
    pub fn from_success(success: bool) -> Self {
        let message = if success {
            "System reset to IDLE"
        } else {
            "Reset failed"
        };
        Self {
            success,
            message: message.to_string(),
        }
    }
}

/// `GET /api/health` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Remote store connection summary.
    pub firebase: ConnectionStatus,
}

/// `POST /api/simulate` body.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationRequest {
    /// `WET`, `DRY` or `RESET` (not enforced).
    pub action: String,
}

/// `POST /api/system_state` body.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemStateRequest {
    pub state: String,
}

/// `POST /api/system_state` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemStateResponse {
    pub success: bool,
    pub state: String,
}
