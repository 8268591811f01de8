//! The preference store: typed accessors over one durable namespace.
//!
//! Construct one store at startup and hand it (by reference or `Arc`) to
//! whatever needs it. Reads never fail: an absent key, an unreadable
//! backend, or a value of the wrong type all yield the caller's default.
//! Writes return a [`PrefsError`] the caller may inspect or drop.

use std::collections::{BTreeMap, BTreeSet};

use crate::backend::{self, Backend, MemoryBackend};
use crate::config::StoreConfig;
use crate::error::{PrefsError, Result};
use crate::keys::KEY_FIRST_LAUNCH;
use crate::value::{PrefKind, PrefValue};

pub struct PreferenceStore {
    backend: Box<dyn Backend>,
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl PreferenceStore {
    /// Open the namespace described by `config`
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let backend = backend::open(config)?;
        log::info!(
            "Preference store '{}' opened ({} backend, {})",
            config.namespace,
            backend.name(),
            config.dir.display()
        );
        Ok(Self { backend })
    }

    pub fn with_backend(backend: impl Backend + 'static) -> Self {
        Self { backend: Box::new(backend) }
    }

    /// Non-durable store, mainly for tests
    pub fn in_memory() -> Self {
        Self::with_backend(MemoryBackend::new())
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    fn read(&self, key: &str) -> Option<PrefValue> {
        match self.backend.get(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Reading '{}' from {} failed: {}", key, self.backend.name(), e);
                None
            }
        }
    }

    fn read_typed<T>(&self, key: &str, kind: PrefKind, f: impl FnOnce(&PrefValue) -> Option<T>) -> Option<T> {
        let value = self.read(key)?;
        let typed = f(&value);
        if typed.is_none() {
            log::warn!(
                "Preference '{}' holds a {}, not a {}; using default",
                key,
                value.kind().name(),
                kind.name()
            );
        }
        typed
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.read_typed(key, PrefKind::Bool, PrefValue::as_bool).unwrap_or(default)
    }

    /// Stored string, or `default` (which may itself be None)
    pub fn get_string(&self, key: &str, default: Option<&str>) -> Option<String> {
        self.read_typed(key, PrefKind::String, |v| v.as_str().map(str::to_string))
            .or_else(|| default.map(str::to_string))
    }

    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.read_typed(key, PrefKind::Int, PrefValue::as_int).unwrap_or(default)
    }

    pub fn get_float(&self, key: &str, default: f64) -> f64 {
        self.read_typed(key, PrefKind::Float, PrefValue::as_float).unwrap_or(default)
    }

    /// Raw stored value, any type
    pub fn get(&self, key: &str) -> Option<PrefValue> {
        self.read(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.read(key).is_some()
    }

    /// Every stored entry. Empty if the backend can't be read.
    pub fn snapshot(&self) -> BTreeMap<String, PrefValue> {
        self.backend.entries().unwrap_or_else(|e| {
            log::warn!("Listing {} preferences failed: {}", self.backend.name(), e);
            BTreeMap::new()
        })
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    pub fn set(&self, key: &str, value: impl Into<PrefValue>) -> Result<()> {
        let value = value.into();
        log::debug!("set {} = {:?}", key, value);
        self.backend.put(key, value).map_err(|e| self.write_failed(key, e))
    }

    pub fn set_bool(&self, key: &str, value: bool) -> Result<()> {
        self.set(key, value)
    }

    pub fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.set(key, value)
    }

    pub fn set_int(&self, key: &str, value: i64) -> Result<()> {
        self.set(key, value)
    }

    pub fn set_float(&self, key: &str, value: f64) -> Result<()> {
        self.set(key, value)
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.backend.remove(key).map_err(|e| self.write_failed(key, e))
    }

    /// Remove every key except those in `preserve`.
    ///
    /// If the first-launch flag is preserved it is forced to `false`:
    /// clearing data never re-runs onboarding.
    pub fn clear_all(&self, preserve: &[&str]) -> Result<()> {
        let keep: BTreeSet<String> = preserve.iter().map(|k| k.to_string()).collect();
        log::info!("Clearing preferences (keeping {:?})", keep);

        let mut overrides = Vec::new();
        if keep.contains(KEY_FIRST_LAUNCH) {
            overrides.push((KEY_FIRST_LAUNCH, PrefValue::Bool(false)));
        }

        self.backend
            .retain(&keep, &overrides)
            .map_err(|e| self.write_failed("*", e))
    }

    /// Re-read durable state, dropping anything only held in memory
    pub fn reload(&self) -> Result<()> {
        self.backend.reload()
    }

    fn write_failed(&self, key: &str, e: PrefsError) -> PrefsError {
        log::warn!("Writing '{}' to {} failed: {}", key, self.backend.name(), e);
        e
    }

    // -------------------------------------------------------------------------
    // First launch
    // -------------------------------------------------------------------------

    pub fn is_first_launch(&self) -> bool {
        self.get_bool(KEY_FIRST_LAUNCH, true)
    }

    pub fn mark_launched(&self) -> Result<()> {
        self.set_bool(KEY_FIRST_LAUNCH, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Backend whose every operation fails
    struct BrokenBackend;

    impl Backend for BrokenBackend {
        fn name(&self) -> &'static str {
            "broken"
        }
        fn get(&self, _key: &str) -> Result<Option<PrefValue>> {
            Err(PrefsError::Io("disk gone".into()))
        }
        fn put(&self, _key: &str, _value: PrefValue) -> Result<()> {
            Err(PrefsError::Io("disk gone".into()))
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Err(PrefsError::Io("disk gone".into()))
        }
        fn entries(&self) -> Result<BTreeMap<String, PrefValue>> {
            Err(PrefsError::Io("disk gone".into()))
        }
        fn retain(&self, _keep: &BTreeSet<String>, _overrides: &[(&str, PrefValue)]) -> Result<()> {
            Err(PrefsError::Io("disk gone".into()))
        }
    }

    /// Accepts bulk clears but refuses single-key writes
    #[derive(Default)]
    struct PutRefusingBackend {
        inner: MemoryBackend,
    }

    impl Backend for PutRefusingBackend {
        fn name(&self) -> &'static str {
            "put-refusing"
        }
        fn get(&self, key: &str) -> Result<Option<PrefValue>> {
            self.inner.get(key)
        }
        fn put(&self, _key: &str, _value: PrefValue) -> Result<()> {
            Err(PrefsError::Io("read-only key".into()))
        }
        fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }
        fn entries(&self) -> Result<BTreeMap<String, PrefValue>> {
            self.inner.entries()
        }
        fn retain(&self, keep: &BTreeSet<String>, overrides: &[(&str, PrefValue)]) -> Result<()> {
            self.inner.retain(keep, overrides)
        }
    }

    #[test]
    fn test_unwritten_keys_return_default() {
        let store = PreferenceStore::in_memory();
        assert!(store.get_bool("anything", true));
        assert!(!store.get_bool("anything", false));
        assert_eq!(store.get_string("user_name", Some("John Doe")).as_deref(), Some("John Doe"));
        assert_eq!(store.get_string("user_name", None), None);
        assert_eq!(store.get_int("count", 7), 7);
        assert_eq!(store.get_float("ratio", 0.5), 0.5);
        assert!(!store.contains("anything"));
    }

    #[test]
    fn test_user_name_scenario() {
        let store = PreferenceStore::in_memory();
        assert_eq!(store.get_string("user_name", Some("John Doe")).as_deref(), Some("John Doe"));
        store.set_string("user_name", "Alice").unwrap();
        assert_eq!(store.get_string("user_name", Some("John Doe")).as_deref(), Some("Alice"));
    }

    #[test]
    fn test_first_launch_scenario() {
        let store = PreferenceStore::in_memory();
        assert!(store.is_first_launch());
        store.mark_launched().unwrap();
        assert!(!store.is_first_launch());
    }

    #[test]
    fn test_clear_all_preserving_first_launch() {
        let store = PreferenceStore::in_memory();
        store.set_bool("notifications_enabled", false).unwrap();
        store.set_string("user_email", "a@example.com").unwrap();

        store.clear_all(&["first_launch"]).unwrap();

        assert!(!store.is_first_launch());
        assert!(store.get_bool("notifications_enabled", true));
        assert_eq!(store.get_string("user_email", None), None);
        assert_eq!(store.snapshot().len(), 1);
    }

    #[test]
    fn test_clear_all_keeps_other_preserved_keys_untouched() {
        let store = PreferenceStore::in_memory();
        store.set_string("user_name", "Alice").unwrap();
        store.set_bool("dark_mode_enabled", true).unwrap();

        store.clear_all(&["user_name"]).unwrap();

        assert_eq!(store.get_string("user_name", None).as_deref(), Some("Alice"));
        assert!(!store.get_bool("dark_mode_enabled", false));
        // first_launch was not preserved, so it's back to its default
        assert!(store.is_first_launch());
    }

    #[test]
    fn test_clear_all_forces_first_launch_in_one_backend_call() {
        let store = PreferenceStore::with_backend(PutRefusingBackend::default());
        assert!(store.set_bool("dark_mode_enabled", true).is_err());

        store.clear_all(&["first_launch"]).unwrap();
        assert!(!store.is_first_launch());
        assert_eq!(store.snapshot().len(), 1);
    }

    #[test]
    fn test_type_mismatch_returns_default() {
        let store = PreferenceStore::in_memory();
        store.set_string("dark_mode_enabled", "yes").unwrap();
        assert!(!store.get_bool("dark_mode_enabled", false));
        assert!(store.get_bool("dark_mode_enabled", true));

        store.set_bool("user_name", true).unwrap();
        assert_eq!(store.get_string("user_name", Some("John Doe")).as_deref(), Some("John Doe"));
    }

    #[test]
    fn test_int_reads_as_float() {
        let store = PreferenceStore::in_memory();
        store.set_int("volume", 3).unwrap();
        assert_eq!(store.get_float("volume", 0.0), 3.0);
        assert_eq!(store.get_int("volume", 0), 3);
    }

    #[test]
    fn test_remove() {
        let store = PreferenceStore::in_memory();
        store.set_bool("k", true).unwrap();
        assert!(store.contains("k"));
        store.remove("k").unwrap();
        assert!(!store.contains("k"));
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_broken_backend_reads_defaults_and_writes_err() {
        let store = PreferenceStore::with_backend(BrokenBackend);
        assert!(store.get_bool("notifications_enabled", true));
        assert!(store.is_first_launch());
        assert!(store.snapshot().is_empty());

        assert!(matches!(store.set_bool("k", true), Err(PrefsError::Io(_))));
        assert!(store.mark_launched().is_err());
        assert!(store.clear_all(&["first_launch"]).is_err());
    }

    #[test]
    fn test_shared_across_threads() {
        use std::sync::Arc;

        let store = Arc::new(PreferenceStore::in_memory());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store.set_int(&format!("worker_{i}"), i).unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        for i in 0..4 {
            assert_eq!(store.get_int(&format!("worker_{i}"), -1), i);
        }
    }
}
