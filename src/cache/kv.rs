//! Key-value persistence behind the cache store.
//!
//! The cache treats its backing store as fallible: any of these calls may
//! error (quota, I/O, corruption) and the store above degrades to miss/no-op
//! instead of propagating.

use anyhow::Context;
use rusqlite::{Connection, params};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

pub trait KvStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove(&self, key: &str) -> anyhow::Result<()>;
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        (**self).put(key, value)
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        (**self).remove(key)
    }
}

/// In-memory store for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| anyhow::anyhow!("kv lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut entries = self.entries.lock().map_err(|_| anyhow::anyhow!("kv lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        let mut entries = self.entries.lock().map_err(|_| anyhow::anyhow!("kv lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

/// SQLite-backed store, one `kv` table with upsert-on-conflict.
pub struct SqliteKv {
    conn: Connection,
}

impl SqliteKv {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }

        let conn = Connection::open(path).with_context(|| format!("open {}", path.display()))?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> anyhow::Result<()> {
        self.conn
            .execute_batch(
                r#"
CREATE TABLE IF NOT EXISTS kv (
  key TEXT PRIMARY KEY,
  value TEXT NOT NULL,
  updated_at INTEGER NOT NULL
);
"#,
            )
            .context("init schema")?;
        Ok(())
    }

    fn now_unix() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}

impl KvStore for SqliteKv {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM kv WHERE key=?1")
            .context("prepare kv get")?;
        let mut rows = stmt.query(params![key]).context("query kv")?;
        if let Some(row) = rows.next().context("read kv row")? {
            Ok(Some(row.get(0)?))
        } else {
            Ok(None)
        }
    }

    fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.conn
            .execute(
                r#"
INSERT INTO kv(key, value, updated_at)
VALUES(?1, ?2, ?3)
ON CONFLICT(key) DO UPDATE SET
  value=excluded.value,
  updated_at=excluded.updated_at
"#,
                params![key, value, Self::now_unix()],
            )
            .context("kv put")?;
        Ok(())
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key=?1", params![key])
            .context("kv remove")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_kv_roundtrip() {
        let kv = MemoryKv::new();
        assert_eq!(kv.get("missing").unwrap(), None);
        kv.put("k", "v").unwrap();
        assert_eq!(kv.get("k").unwrap().as_deref(), Some("v"));
        kv.put("k", "v2").unwrap();
        assert_eq!(kv.get("k").unwrap().as_deref(), Some("v2"));
        kv.remove("k").unwrap();
        assert_eq!(kv.get("k").unwrap(), None);
    }

    #[test]
    fn sqlite_kv_roundtrip_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.sqlite3");

        {
            let kv = SqliteKv::open(&path).unwrap();
            kv.put("k", "v").unwrap();
            kv.put("k", "v2").unwrap();
            assert_eq!(kv.get("k").unwrap().as_deref(), Some("v2"));
        }

        // Values survive a reopen.
        let kv = SqliteKv::open(&path).unwrap();
        assert_eq!(kv.get("k").unwrap().as_deref(), Some("v2"));
        kv.remove("k").unwrap();
        assert_eq!(kv.get("k").unwrap(), None);
    }

    #[test]
    fn sqlite_kv_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("cache.sqlite3");
        let kv = SqliteKv::open(&path).unwrap();
        kv.put("k", "v").unwrap();
        assert!(path.exists());
    }
}
