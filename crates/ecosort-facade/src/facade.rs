//! Device-state operations.
//!
//! Every operation degrades instead of failing: reads fall back to default
//! payloads, writes report `false` or an error payload. Nothing is retried;
//! the frontend polls again shortly anyway.

use ecosort_store::{
    Connection, ConnectionStatus, DynRemoteStore, PathUpdate, ReadProfile, StoreError, StorePath,
};
use tracing::{error, info, warn};

use crate::normalizer::normalize;
use crate::statistics::Statistics;
use crate::types::{
    NormalizedState, SimulationOutcome, ACTION_RESET, KNOWN_SYSTEM_STATES, STATE_IDLE,
    STATE_SORTING, WASTE_NONE,
};

/// Device-state facade over the connection selected at startup.
#[derive(Debug, Clone)]
pub struct Facade {
    connection: Connection,
}

impl Facade {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    fn store(&self) -> Option<&DynRemoteStore> {
        self.connection.store()
    }

    /// Read and normalize the whole document on the live-poll path.
    ///
    /// Unreachable store: offline defaults. Unusable payload: `Error`.
    pub async fn get_live_state(&self) -> NormalizedState {
        let Some(store) = self.store() else {
            return normalize(None);
        };

        match store.read(StorePath::Root, ReadProfile::Live).await {
            Ok(doc) => normalize(Some(&doc)),
            Err(e) if e.is_unreachable() => normalize(None),
            Err(e) => {
                error!(error = %e, "Error reading live state");
                NormalizedState::error()
            }
        }
    }

    /// Clear the last detection and return the device to `IDLE`.
    ///
    /// Both fields are always written together.
    pub async fn reset_waste_status(&self) -> bool {
        let Some(store) = self.store() else {
            warn!("Reset requested while offline");
            return false;
        };

        let updates = vec![
            PathUpdate::single(StorePath::Bin, "lastWaste", WASTE_NONE),
            PathUpdate::single(StorePath::System, "state", STATE_IDLE),
        ];
        match store.merge_many(updates).await {
            Ok(()) => {
                info!(mode = store.mode().as_str(), "Reset system to IDLE state");
                true
            }
            Err(e) => {
                error!(error = %e, "Error resetting waste status");
                false
            }
        }
    }

    /// Write `system.state`. The value is caller-trusted.
    pub async fn update_system_state(&self, new_state: &str) -> bool {
        let Some(store) = self.store() else {
            warn!(state = %new_state, "State update requested while offline");
            return false;
        };

        if !KNOWN_SYSTEM_STATES.contains(&new_state) {
            warn!(state = %new_state, "Writing unrecognized system state");
        }

        let update = PathUpdate::single(StorePath::System, "state", new_state);
        match store.merge(update.path, update.fields).await {
            Ok(()) => {
                info!(state = %new_state, "System state updated");
                true
            }
            Err(e) => {
                error!(state = %new_state, error = %e, "Error updating system state");
                false
            }
        }
    }

    /// Wet/dry statistics from the bin counters.
    pub async fn get_statistics(&self) -> Statistics {
        let Some(store) = self.store() else {
            return Statistics::empty();
        };

        match store.read(StorePath::Bin, ReadProfile::Admin).await {
            Ok(bin) => Statistics::from_bin(&bin),
            Err(e) => {
                error!(error = %e, "Error getting statistics");
                Statistics::empty()
            }
        }
    }

    /// Inject a detection (`WET`, `DRY`, ...) or clear it (`RESET`).
    ///
    /// Any action string is accepted. A detection moves the device to
    /// `SORTING`; a reset moves it to `IDLE`.
    pub async fn simulate(&self, action: &str) -> SimulationOutcome {
        let Some(store) = self.store() else {
            return SimulationOutcome::Error {
                message: StoreError::NotConnected.to_string(),
            };
        };

        let (last_waste, state) = if action == ACTION_RESET {
            (WASTE_NONE, STATE_IDLE)
        } else {
            (action, STATE_SORTING)
        };

        let updates = vec![
            PathUpdate::single(StorePath::Bin, "lastWaste", last_waste),
            PathUpdate::single(StorePath::System, "state", state),
        ];
        match store.merge_many(updates).await {
            Ok(()) => {
                info!(action = %action, state = %state, "Simulated detection");
                SimulationOutcome::Success {
                    action: action.to_string(),
                    state: state.to_string(),
                }
            }
            Err(e) => {
                error!(action = %action, error = %e, "Simulation failed");
                SimulationOutcome::Error {
                    message: e.to_string(),
                }
            }
        }
    }

    /// Connection summary. Never touches the network.
    pub fn get_connection_status(&self) -> ConnectionStatus {
        self.connection.status()
    }
}
