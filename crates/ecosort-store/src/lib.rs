//! Remote realtime-database access for ecosort.
//!
//! The sorting device and this backend share one JSON document in a
//! Firebase-style realtime database. This crate provides:
//!
//! - [`RemoteStore`]: read a subtree, merge named fields into a subtree
//! - [`AuthenticatedStore`]: credentialed transport with a pooled client
//! - [`AnonymousStore`]: per-call REST transport with short timeouts
//! - [`connect`]: one-shot transport selection at startup
//! - [`MockStore`]: in-memory implementation for tests

pub mod anonymous;
pub mod authenticated;
pub mod connection;
pub mod credential;
pub mod error;
pub mod mock;
mod rest;
pub mod store;

pub use anonymous::AnonymousStore;
pub use authenticated::AuthenticatedStore;
pub use connection::{connect, Connection, ConnectionMode, ConnectionStatus, StoreSettings};
pub use credential::ServiceCredential;
pub use error::{StoreError, StoreResult};
pub use mock::{MockFailure, MockStore};
pub use store::{
    BoxFuture, DynRemoteStore, Fields, PathUpdate, ReadProfile, RemoteStore, StorePath, Timeouts,
    TransportMode,
};
