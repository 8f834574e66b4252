//! ecosort - live waste-sorter status backend.
//!
//! Wires the pieces together:
//! - Configuration from file and environment
//! - One-shot remote store connection
//! - Device-state facade
//! - HTTP API

pub mod app;
pub mod config;
pub mod error;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
