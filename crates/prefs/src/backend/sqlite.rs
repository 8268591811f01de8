// SQLite namespace table

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};

use super::Backend;
use crate::error::Result;
use crate::value::{PrefKind, PrefValue};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS prefs (
    namespace TEXT NOT NULL,
    key TEXT NOT NULL,
    kind INTEGER NOT NULL,   -- 0=bool, 1=string, 2=int, 3=float
    value TEXT NOT NULL,
    PRIMARY KEY (namespace, key)
);
"#;

/// One namespace partition of a `prefs` table.
///
/// Several namespaces may share a database file; each backend only sees
/// rows tagged with its own namespace.
pub struct SqliteBackend {
    conn: Mutex<Connection>,
    namespace: String,
}

impl SqliteBackend {
    pub fn open(path: &Path, namespace: &str) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::with_connection(conn, namespace)
    }

    /// In-memory database, gone when the backend is dropped
    pub fn open_in_memory(namespace: &str) -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?, namespace)
    }

    fn with_connection(conn: Connection, namespace: &str) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        log::debug!("Opened SQLite namespace '{}'", namespace);
        Ok(Self { conn: Mutex::new(conn), namespace: namespace.to_string() })
    }
}

/// Decode a row; rows with an unknown kind or unparseable text are skipped
fn decode(key: &str, kind: i64, text: &str) -> Option<PrefValue> {
    let value = PrefKind::from_code(kind).and_then(|k| PrefValue::parse(k, text));
    if value.is_none() {
        log::warn!("Skipping unreadable preference '{}' (kind {})", key, kind);
    }
    value
}

impl Backend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn get(&self, key: &str) -> Result<Option<PrefValue>> {
        let conn = self.conn.lock();
        let row: Option<(i64, String)> = conn
            .query_row(
                "SELECT kind, value FROM prefs WHERE namespace = ?1 AND key = ?2",
                params![self.namespace, key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        Ok(row.and_then(|(kind, text)| decode(key, kind, &text)))
    }

    fn put(&self, key: &str, value: PrefValue) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO prefs (namespace, key, kind, value) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(namespace, key) DO UPDATE SET kind = excluded.kind, value = excluded.value",
            params![self.namespace, key, value.kind().code(), value.to_text()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "DELETE FROM prefs WHERE namespace = ?1 AND key = ?2",
            params![self.namespace, key],
        )?;
        Ok(())
    }

    fn entries(&self) -> Result<BTreeMap<String, PrefValue>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT key, kind, value FROM prefs WHERE namespace = ?1")?;
        let rows = stmt.query_map(params![self.namespace], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?, row.get::<_, String>(2)?))
        })?;

        let mut entries = BTreeMap::new();
        for row in rows {
            let (key, kind, text) = row?;
            if let Some(value) = decode(&key, kind, &text) {
                entries.insert(key, value);
            }
        }
        Ok(entries)
    }

    fn retain(&self, keep: &BTreeSet<String>, overrides: &[(&str, PrefValue)]) -> Result<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        let stored: Vec<String> = {
            let mut stmt = tx.prepare("SELECT key FROM prefs WHERE namespace = ?1")?;
            let keys = stmt.query_map(params![self.namespace], |row| row.get::<_, String>(0))?;
            let keys = keys.collect::<std::result::Result<Vec<_>, _>>()?;
            keys
        };

        for key in stored.iter().filter(|k| !keep.contains(*k)) {
            tx.execute(
                "DELETE FROM prefs WHERE namespace = ?1 AND key = ?2",
                params![self.namespace, key],
            )?;
        }

        for (key, value) in overrides {
            tx.execute(
                "INSERT INTO prefs (namespace, key, kind, value) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(namespace, key) DO UPDATE SET kind = excluded.kind, value = excluded.value",
                params![self.namespace, key, value.kind().code(), value.to_text()],
            )?;
        }

        tx.commit()?;
        Ok(())
    }
}
