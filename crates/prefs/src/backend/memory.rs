use std::collections::{BTreeMap, BTreeSet};

use parking_lot::RwLock;

use super::Backend;
use crate::error::Result;
use crate::value::PrefValue;

/// Process-local namespace. Used by tests and `backend = "memory"`.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<BTreeMap<String, PrefValue>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, key: &str) -> Result<Option<PrefValue>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn put(&self, key: &str, value: PrefValue) -> Result<()> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn entries(&self) -> Result<BTreeMap<String, PrefValue>> {
        Ok(self.entries.read().clone())
    }

    fn retain(&self, keep: &BTreeSet<String>, overrides: &[(&str, PrefValue)]) -> Result<()> {
        let mut entries = self.entries.write();
        entries.retain(|k, _| keep.contains(k));
        for (key, value) in overrides {
            entries.insert(key.to_string(), value.clone());
        }
        Ok(())
    }
}
