//! LMDB-backed key-value storage.
//!
//! One unnamed database inside an environment directory `<db_path>.lmdb`.
//! Each logical record (review words, streak data) is a single UTF-8
//! JSON value under its own key, written in its own transaction.

use std::fs;
use std::path::Path;

use lmdb::{Database, DatabaseFlags, Environment, Error as LmdbError, Transaction, WriteFlags};
use log::{debug, info, warn};

use crate::app_response::AppResponse;
use crate::config::CoreConfig;
use crate::kv_store::KeyValueStore;

pub struct AppDbState {
    env: Environment,
    db: Database,
    path: String,
}

impl AppDbState {
    /// Opens (or creates) the environment described by `config`.
    pub fn init(config: &CoreConfig) -> Result<Self, AppResponse> {
        let dir = config.lmdb_dir();

        if let Err(e) = fs::create_dir_all(&dir) {
            warn!("Could not create LMDB directory {dir}: {e}");
            return Err(AppResponse::DatabaseError(format!(
                "Cannot create directory '{dir}': {e}"
            )));
        }

        let env = Environment::new()
            .set_max_dbs(1)
            .set_map_size(config.map_size)
            .open(Path::new(&dir))?;
        let db = env.create_db(None, DatabaseFlags::empty())?;

        info!("LMDB environment opened at {dir}");
        Ok(Self { env, db, path: dir })
    }
}

impl KeyValueStore for AppDbState {
    fn read(&self, key: &str) -> Result<Option<String>, AppResponse> {
        let txn = self.env.begin_ro_txn()?;
        let value = match txn.get(self.db, &key) {
            Ok(bytes) => Some(String::from_utf8(bytes.to_vec()).map_err(|e| {
                AppResponse::SerializationError(format!("Value for '{key}' is not UTF-8: {e}"))
            })?),
            Err(LmdbError::NotFound) => None,
            Err(e) => return Err(e.into()),
        };
        txn.abort();
        debug!("read {key}: {}", if value.is_some() { "hit" } else { "miss" });
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), AppResponse> {
        let mut txn = self.env.begin_rw_txn()?;
        txn.put(self.db, &key, &value, WriteFlags::empty())?;
        txn.commit()?;
        debug!("wrote {key} ({} bytes)", value.len());
        Ok(())
    }
}

impl Drop for AppDbState {
    fn drop(&mut self) {
        if let Err(e) = self.env.sync(true) {
            warn!("Failed to sync LMDB environment {} on close: {e}", self.path);
        } else {
            info!("LMDB environment {} closed", self.path);
        }
    }
}
