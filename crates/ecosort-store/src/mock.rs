//! In-memory store for tests.
//!
//! Applies merges to a local JSON document with the same partial-update
//! semantics as the real database and records every call for verification.

use parking_lot::Mutex;
use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};
use crate::store::{BoxFuture, Fields, PathUpdate, ReadProfile, RemoteStore, StorePath, TransportMode};

/// Canned failure for the next calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// Behave as a healthy store.
    None,
    /// Every call times out.
    Timeout,
    /// Every call returns a non-JSON body.
    Malformed,
}

/// Mock remote store.
#[derive(Debug)]
pub struct MockStore {
    mode: TransportMode,
    document: Mutex<Value>,
    merges: Mutex<Vec<PathUpdate>>,
    merge_batches: Mutex<usize>,
    reads: Mutex<Vec<(StorePath, ReadProfile)>>,
    failure: Mutex<MockFailure>,
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new(TransportMode::Anonymous)
    }
}

impl MockStore {
    pub fn new(mode: TransportMode) -> Self {
        Self {
            mode,
            document: Mutex::new(Value::Null),
            merges: Mutex::new(Vec::new()),
            merge_batches: Mutex::new(0),
            reads: Mutex::new(Vec::new()),
            failure: Mutex::new(MockFailure::None),
        }
    }

    /// Start from an existing document.
    pub fn with_document(mode: TransportMode, document: Value) -> Self {
        let store = Self::new(mode);
        *store.document.lock() = document;
        store
    }

    pub fn set_failure(&self, failure: MockFailure) {
        *self.failure.lock() = failure;
    }

    /// Current document.
    pub fn document(&self) -> Value {
        self.document.lock().clone()
    }

    /// Recorded merges, flattened in call order.
    pub fn merges(&self) -> Vec<PathUpdate> {
        self.merges.lock().clone()
    }

    /// Number of `merge_many` calls.
    pub fn merge_batches(&self) -> usize {
        *self.merge_batches.lock()
    }

    pub fn reads(&self) -> Vec<(StorePath, ReadProfile)> {
        self.reads.lock().clone()
    }

    fn check_failure(&self, path: StorePath) -> StoreResult<()> {
        match *self.failure.lock() {
            MockFailure::None => Ok(()),
            MockFailure::Timeout => Err(StoreError::Timeout {
                path: path.to_string(),
            }),
            MockFailure::Malformed => Err(StoreError::Malformed {
                path: path.to_string(),
                message: "expected value at line 1 column 1".to_string(),
            }),
        }
    }

    fn apply(&self, path: StorePath, fields: &Fields) {
        let mut document = self.document.lock();
        if !document.is_object() {
            *document = Value::Object(Map::new());
        }
        let Some(root) = document.as_object_mut() else {
            return;
        };
        let target = match path {
            StorePath::Root => root,
            other => {
                let child = root
                    .entry(other.segment().to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                if !child.is_object() {
                    *child = Value::Object(Map::new());
                }
                match child.as_object_mut() {
                    Some(child) => child,
                    None => return,
                }
            }
        };
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
}

impl RemoteStore for MockStore {
    fn mode(&self) -> TransportMode {
        self.mode
    }

    fn read(&self, path: StorePath, profile: ReadProfile) -> BoxFuture<'_, StoreResult<Value>> {
        Box::pin(async move {
            self.reads.lock().push((path, profile));
            self.check_failure(path)?;
            let document = self.document.lock();
            let value = match path {
                StorePath::Root => document.clone(),
                other => document
                    .get(other.segment())
                    .cloned()
                    .unwrap_or(Value::Null),
            };
            Ok(value)
        })
    }

    fn merge(&self, path: StorePath, fields: Fields) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            self.merges.lock().push(PathUpdate::new(path, fields.clone()));
            self.check_failure(path)?;
            self.apply(path, &fields);
            Ok(())
        })
    }

    fn merge_many(&self, updates: Vec<PathUpdate>) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            *self.merge_batches.lock() += 1;
            let mut first_error = None;
            for update in updates {
                if let Err(e) = self.merge(update.path, update.fields).await {
                    first_error.get_or_insert(e);
                }
            }
            match first_error {
                Some(e) => Err(e),
                None => Ok(()),
            }
        })
    }
}
