// JSON namespace file
// One flat object per namespace: { "key": true, "user_name": "Alice", ... }

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tempfile::NamedTempFile;

use super::Backend;
use crate::error::{PrefsError, Result};
use crate::value::PrefValue;

/// File-backed namespace.
///
/// The whole namespace is held in memory and rewritten on every change
/// (uniquely named temp file + rename, so a crash never leaves a
/// half-written file and two stores on one directory don't collide).
/// The in-memory map is updated before the flush, which keeps reads on the
/// last-known state even when the disk refuses the write.
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, PrefValue>>,
}

impl JsonFileBackend {
    /// Open the namespace at `path`. A missing file is an empty namespace;
    /// the file is only created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = read_namespace(&path);
        log::debug!("Opened JSON namespace {} ({} keys)", path.display(), entries.len());
        Ok(Self { path, entries: RwLock::new(entries) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, PrefValue>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let json = serde_json::to_string_pretty(entries)?;

        // Same directory as the target so the rename stays on one filesystem
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;

        // Private to the user, like the platform store it replaces
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o600))?;
        }

        tmp.persist(&self.path).map_err(|e| PrefsError::from(e.error))?;
        Ok(())
    }
}

/// JSON has no encoding for NaN or infinities (serde_json writes `null`),
/// so refuse them before they reach the map.
fn check_encodable(key: &str, value: &PrefValue) -> Result<()> {
    match value {
        PrefValue::Float(n) if !n.is_finite() => Err(PrefsError::Serialize(format!(
            "'{}' is {}; non-finite floats can't be stored as JSON",
            key, n
        ))),
        _ => Ok(()),
    }
}

/// Read and parse the namespace file, falling back to empty
fn read_namespace(path: &Path) -> BTreeMap<String, PrefValue> {
    if !path.exists() {
        return BTreeMap::new();
    }

    match fs::read_to_string(path) {
        Ok(contents) => {
            // Strip comments (lines starting with //) left by hand edits
            let cleaned: String = contents
                .lines()
                .filter(|line| !line.trim().starts_with("//"))
                .collect::<Vec<_>>()
                .join("\n");

            if cleaned.trim().is_empty() {
                return BTreeMap::new();
            }

            // Decode per entry so one bad value only drops itself
            match serde_json::from_str::<BTreeMap<String, serde_json::Value>>(&cleaned) {
                Ok(raw) => raw
                    .into_iter()
                    .filter_map(|(key, value)| match serde_json::from_value::<PrefValue>(value) {
                        Ok(value) => Some((key, value)),
                        Err(_) => {
                            log::warn!("Skipping unreadable preference '{}' in {}", key, path.display());
                            None
                        }
                    })
                    .collect(),
                Err(e) => {
                    log::warn!("Error parsing {}: {}; using defaults", path.display(), e);
                    BTreeMap::new()
                }
            }
        }
        Err(e) => {
            log::warn!("Error reading {}: {}; using defaults", path.display(), e);
            BTreeMap::new()
        }
    }
}

impl Backend for JsonFileBackend {
    fn name(&self) -> &'static str {
        "json"
    }

    fn get(&self, key: &str) -> Result<Option<PrefValue>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn put(&self, key: &str, value: PrefValue) -> Result<()> {
        check_encodable(key, &value)?;

        // Hold the write lock through the flush so file order matches map order
        let mut entries = self.entries.write();
        entries.insert(key.to_string(), value);
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write();
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.flush(&entries)
    }

    fn entries(&self) -> Result<BTreeMap<String, PrefValue>> {
        Ok(self.entries.read().clone())
    }

    fn retain(&self, keep: &BTreeSet<String>, overrides: &[(&str, PrefValue)]) -> Result<()> {
        for (key, value) in overrides {
            check_encodable(key, value)?;
        }

        let mut entries = self.entries.write();
        entries.retain(|k, _| keep.contains(k));
        for (key, value) in overrides {
            entries.insert(key.to_string(), value.clone());
        }
        self.flush(&entries)
    }

    fn reload(&self) -> Result<()> {
        let fresh = read_namespace(&self.path);
        *self.entries.write() = fresh;
        Ok(())
    }
}
