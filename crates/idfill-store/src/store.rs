use rusqlite::{params, Connection};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, StoreError};
use crate::record::{is_valid_suffix, PersonRecord};

/// Current on-disk schema version (`PRAGMA user_version`).
pub const SCHEMA_VERSION: i64 = 1;

const DEFAULT_BUSY_MS: u64 = 5000;

#[derive(Debug, Clone, Copy)]
pub struct StoreOptions {
    pub busy_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_MS),
        }
    }
}

/// Readiness summary reported to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StoreStatus {
    Ready { count: u64 },
    NoData,
}

impl StoreStatus {
    /// Status of an optional store handle. Missing or failing stores report `NoData`.
    pub fn of(store: Option<&RecordStore>) -> Self {
        let Some(store) = store else {
            return StoreStatus::NoData;
        };
        match store.count() {
            Ok(0) => StoreStatus::NoData,
            Ok(count) => StoreStatus::Ready { count },
            Err(err) => {
                tracing::warn!(error = %err, "record store count failed");
                StoreStatus::NoData
            }
        }
    }
}

/// Handle to the persistent person-record store.
///
/// The handle is cheap to clone; every operation opens its own connection so the
/// async wrappers can hand work to the blocking pool.
#[derive(Debug, Clone)]
pub struct RecordStore {
    db_path: PathBuf,
    busy_timeout: Duration,
}

impl RecordStore {
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with(path, StoreOptions::default())
    }

    pub fn open_with(path: &Path, opts: StoreOptions) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let store = Self {
            db_path: path.to_path_buf(),
            busy_timeout: opts.busy_timeout,
        };
        let conn = store.conn()?;
        init_connection(&conn).map_err(|source| StoreError::Unavailable {
            path: store.db_path.clone(),
            source,
        })?;
        tracing::debug!(path = %store.db_path.display(), "record store opened");
        Ok(store)
    }

    fn conn(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path).map_err(|source| StoreError::Unavailable {
            path: self.db_path.clone(),
            source,
        })?;
        conn.busy_timeout(self.busy_timeout)?;
        Ok(conn)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn count(&self) -> Result<u64> {
        let conn = self.conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(1) FROM people", [], |row| row.get(0))?;
        Ok(n.max(0) as u64)
    }

    /// Delete every record in its own committed transaction.
    pub fn clear(&self) -> Result<usize> {
        let conn = self.conn()?;
        let n = conn.execute("DELETE FROM people", [])?;
        tracing::debug!(removed = n, "record store cleared");
        Ok(n)
    }

    /// Insert `records` as one committed unit of work. Returns the number written.
    pub fn append_batch(&self, records: &[PersonRecord]) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let n = insert_rows(&tx, records)?;
        tx.commit()?;
        Ok(n)
    }

    /// Atomically replace the whole record set: clear and insert commit together or not at all.
    pub fn replace_all(&self, records: &[PersonRecord]) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM people", [])?;
        let n = insert_rows(&tx, records)?;
        tx.commit()?;
        tracing::info!(count = n, "record store replaced");
        Ok(n)
    }

    /// All records whose suffix equals `suffix`, in insertion order. Served by `idx_people_suffix`.
    pub fn find_by_suffix(&self, suffix: &str) -> Result<Vec<PersonRecord>> {
        if !is_valid_suffix(suffix) {
            return Err(StoreError::InvalidSuffix(suffix.to_string()));
        }
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id,name,uid_display,suffix,gender,birth_year FROM people WHERE suffix=? ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([suffix], |row| {
            Ok(PersonRecord {
                id: Some(row.get(0)?),
                name: row.get(1)?,
                identifier_display: row.get(2)?,
                identifier_suffix: row.get(3)?,
                gender: row.get(4)?,
                birth_year: row.get(5)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn status(&self) -> StoreStatus {
        StoreStatus::of(Some(self))
    }

    // ---------------- Async wrappers (spawn_blocking) ----------------
    // These helpers offload rusqlite work from async executors.

    pub async fn count_async(&self) -> Result<u64> {
        let s = self.clone();
        tokio::task::spawn_blocking(move || s.count())
            .await
            .map_err(|e| StoreError::Join(e.to_string()))?
    }

    pub async fn clear_async(&self) -> Result<usize> {
        let s = self.clone();
        tokio::task::spawn_blocking(move || s.clear())
            .await
            .map_err(|e| StoreError::Join(e.to_string()))?
    }

    pub async fn append_batch_async(&self, records: Vec<PersonRecord>) -> Result<usize> {
        let s = self.clone();
        tokio::task::spawn_blocking(move || s.append_batch(&records))
            .await
            .map_err(|e| StoreError::Join(e.to_string()))?
    }

    pub async fn find_by_suffix_async(&self, suffix: &str) -> Result<Vec<PersonRecord>> {
        let s = self.clone();
        let suffix = suffix.to_string();
        tokio::task::spawn_blocking(move || s.find_by_suffix(&suffix))
            .await
            .map_err(|e| StoreError::Join(e.to_string()))?
    }
}

fn init_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    migrate_schema(conn)
}

fn migrate_schema(conn: &Connection) -> rusqlite::Result<()> {
    let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    if version < 1 {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS people (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              name TEXT NOT NULL,
              uid_display TEXT NOT NULL,
              suffix TEXT NOT NULL,
              gender TEXT NOT NULL,
              birth_year TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_people_suffix ON people(suffix);
            "#,
        )?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    }
    Ok(())
}

fn insert_rows(conn: &Connection, records: &[PersonRecord]) -> Result<usize> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO people(name,uid_display,suffix,gender,birth_year) VALUES(?,?,?,?,?)",
    )?;
    let mut n = 0usize;
    for rec in records {
        if !is_valid_suffix(&rec.identifier_suffix) {
            return Err(StoreError::InvalidSuffix(rec.identifier_suffix.clone()));
        }
        stmt.execute(params![
            rec.name,
            rec.identifier_display,
            rec.identifier_suffix,
            rec.gender,
            rec.birth_year,
        ])?;
        n += 1;
    }
    Ok(n)
}
