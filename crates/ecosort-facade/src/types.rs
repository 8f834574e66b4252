//! Response types served to the frontend.
//!
//! Field names match what the dashboard polls for and must stay stable.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Last waste value meaning "nothing detected".
pub const WASTE_NONE: &str = "NONE";
/// Device resting state.
pub const STATE_IDLE: &str = "IDLE";
/// Device actively sorting an item.
pub const STATE_SORTING: &str = "SORTING";
/// Reported when the store cannot be reached.
pub const STATE_OFFLINE: &str = "OFFLINE";
/// Simulation action that clears the detection instead of injecting one.
pub const ACTION_RESET: &str = "RESET";

/// States the device firmware is known to publish.
///
/// Writes are not validated against this list; it is informational.
pub const KNOWN_SYSTEM_STATES: &[&str] = &[
    "BOOTED",
    "IDLE",
    "OBJECT_DETECTED",
    "ANALYZING",
    "SORTING",
    "CHECKING_BINS",
    "COOLDOWN",
];

/// Reachability of the remote store as seen by one read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkStatus {
    Online,
    Offline,
    Error,
}

/// Fixed-shape live state with every field populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedState {
    /// Device state machine state.
    pub system_state: String,
    /// Last detected waste type (`WET`, `DRY`, `NONE`).
    pub last_waste: String,
    pub wet_full: bool,
    pub dry_full: bool,
    pub wet_count: u64,
    pub dry_count: u64,
    /// Device-supplied timestamp, string or number, passed through as-is.
    pub last_updated: Option<Value>,
    #[serde(rename = "connection_status")]
    pub connection_status: LinkStatus,
    #[serde(rename = "wifi_status")]
    pub wifi_status: String,
    /// Network name, omitted when the device does not report one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssid: Option<String>,
}

impl NormalizedState {
    /// State served when the store is unreachable.
    pub fn offline() -> Self {
        Self {
            system_state: STATE_OFFLINE.to_string(),
            last_waste: WASTE_NONE.to_string(),
            wet_full: false,
            dry_full: false,
            wet_count: 0,
            dry_count: 0,
            last_updated: None,
            connection_status: LinkStatus::Offline,
            wifi_status: "Unknown".to_string(),
            ssid: None,
        }
    }

    /// Offline defaults flagged as an error.
    pub fn error() -> Self {
        Self {
            connection_status: LinkStatus::Error,
            ..Self::offline()
        }
    }
}

/// Result of a simulated detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SimulationOutcome {
    Success { action: String, state: String },
    Error { message: String },
}

impl SimulationOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, SimulationOutcome::Success { .. })
    }
}
