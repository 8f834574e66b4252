//! Device-state facade for ecosort.
//!
//! Reads the shared document, shapes it into a fixed response schema and
//! issues partial updates on behalf of the frontend:
//!
//! - [`normalize`]: raw document to [`NormalizedState`], defaulting every field
//! - [`Statistics`]: wet/dry totals and percentages
//! - [`Facade`]: live state, reset, state update, simulate, statistics, health

pub mod facade;
pub mod normalizer;
pub mod statistics;
pub mod types;

pub use facade::Facade;
pub use normalizer::normalize;
pub use statistics::Statistics;
pub use types::{LinkStatus, NormalizedState, SimulationOutcome, KNOWN_SYSTEM_STATES};
