//! Persistence layers behind a [`PreferenceStore`](crate::PreferenceStore).
//!
//! A backend owns one namespace. Every method is a single atomic operation;
//! callers cannot group several calls into one transaction.

pub mod json;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

use std::collections::{BTreeMap, BTreeSet};

use crate::config::{BackendKind, StoreConfig};
use crate::error::Result;
use crate::value::PrefValue;

pub use json::JsonFileBackend;
pub use memory::MemoryBackend;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteBackend;

pub trait Backend: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    fn get(&self, key: &str) -> Result<Option<PrefValue>>;

    /// Insert or overwrite. Durable (or the error says why not) on return.
    fn put(&self, key: &str, value: PrefValue) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Every stored entry, sorted by key
    fn entries(&self) -> Result<BTreeMap<String, PrefValue>>;

    /// Drop every key not in `keep`, then write `overrides`. One operation:
    /// either all of it lands or none of it does.
    fn retain(&self, keep: &BTreeSet<String>, overrides: &[(&str, PrefValue)]) -> Result<()>;

    /// Re-read durable state. Backends without a separate view are a no-op.
    fn reload(&self) -> Result<()> {
        Ok(())
    }
}

/// Open the backend selected by `config`
pub fn open(config: &StoreConfig) -> Result<Box<dyn Backend>> {
    config.validate()?;
    match config.backend {
        BackendKind::Json => Ok(Box::new(JsonFileBackend::open(config.namespace_path())?)),
        BackendKind::Memory => Ok(Box::new(MemoryBackend::new())),
        #[cfg(feature = "sqlite")]
        BackendKind::Sqlite => Ok(Box::new(SqliteBackend::open(
            &config.namespace_path(),
            &config.namespace,
        )?)),
        #[cfg(not(feature = "sqlite"))]
        BackendKind::Sqlite => Err(crate::error::PrefsError::Unsupported("sqlite")),
    }
}
