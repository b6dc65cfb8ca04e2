//! Key-value storage seam.
//!
//! The review collection and the streak record are independent text
//! blobs under fixed keys in one medium. Anything that can read and
//! write a UTF-8 string by key can back the core: LMDB in production
//! ([`AppDbState`](crate::local_db_state::AppDbState)), a map in tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::app_response::AppResponse;

pub trait KeyValueStore {
    /// Returns `Ok(None)` when the key has never been written.
    fn read(&self, key: &str) -> Result<Option<String>, AppResponse>;

    fn write(&self, key: &str, value: &str) -> Result<(), AppResponse>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn read(&self, key: &str) -> Result<Option<String>, AppResponse> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), AppResponse> {
        (**self).write(key, value)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn read(&self, key: &str) -> Result<Option<String>, AppResponse> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), AppResponse> {
        (**self).write(key, value)
    }
}

/// Process-local store, the equivalent of browser local storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, AppResponse> {
        self.entries
            .lock()
            .map_err(|_| AppResponse::DatabaseError("Memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, AppResponse> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), AppResponse> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
