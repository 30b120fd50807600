//! SQLite storage implementation

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use rusqlite::Connection;
use serde::Serialize;
use crate::{Result, Error};
use super::schema;

/// Files SQLite may leave next to the database
const SIDECAR_SUFFIXES: &[&str] = &["-journal", "-wal", "-shm"];

/// Names the physical location of a bigram database.
///
/// `Store` itself holds no connection; [`Store::connect`] hands out a
/// [`StoreHandle`] that callers thread through every operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the database file (creates it and its tables if missing)
    pub fn connect(&self) -> Result<StoreHandle> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| self.unavailable(e))?;
            }
        }

        let conn = Connection::open(&self.path).map_err(|e| self.unavailable(e))?;
        provision(&conn).map_err(|e| self.unavailable(e))?;
        tracing::debug!("Connected to {}", self.path.display());

        Ok(StoreHandle {
            conn: Some(conn),
            path: Some(self.path.clone()),
        })
    }

    /// Delete the database file and its sidecars.
    ///
    /// Succeeds when nothing exists yet. Handles still open on the file must
    /// be closed by the caller first.
    pub fn reset(&self) -> Result<()> {
        let mut removed = 0;
        for path in std::iter::once(self.path.clone()).chain(self.sidecars()) {
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        tracing::info!("Reset {} ({} file(s) removed)", self.path.display(), removed);
        Ok(())
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn unavailable(&self, source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Error {
        Error::StorageUnavailable {
            path: self.path.clone(),
            source: source.into(),
        }
    }

    fn sidecars(&self) -> impl Iterator<Item = PathBuf> + '_ {
        SIDECAR_SUFFIXES.iter().map(|suffix| {
            let mut name = OsString::from(self.path.as_os_str());
            name.push(suffix);
            PathBuf::from(name)
        })
    }
}

fn provision(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(schema::CONNECTION_PRAGMAS)?;
    for stmt in schema::all_schema_statements() {
        conn.execute(stmt, [])?;
    }
    Ok(())
}

/// A live connection to a bigram database.
///
/// Released by [`StoreHandle::close`] or on drop, whichever comes first.
#[derive(Debug)]
pub struct StoreHandle {
    conn: Option<Connection>,
    path: Option<PathBuf>,
}

impl StoreHandle {
    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        provision(&conn)?;
        Ok(Self { conn: Some(conn), path: None })
    }

    /// The backing file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    pub fn conn(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(Error::HandleClosed)
    }

    pub(crate) fn conn_mut(&mut self) -> Result<&mut Connection> {
        self.conn.as_mut().ok_or(Error::HandleClosed)
    }

    /// Release the connection. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, e)| Error::Storage(e))?;
        }
        Ok(())
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<StoreStats> {
        Ok(StoreStats {
            words: crate::dictionary::count_words(self)?,
            bigrams: crate::bigram::count_rows(self)?,
            observations: crate::bigram::total_observations(self)?,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub words: usize,
    pub bigrams: usize,
    /// Sum of all bigram counts
    pub observations: u64,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Words: {}", self.words)?;
        writeln!(f, "  Bigrams: {}", self.bigrams)?;
        writeln!(f, "  Observations: {}", self.observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("bigrams.db"));
        (dir, store)
    }

    #[test]
    fn test_connect_creates_file_and_tables() {
        let (_dir, store) = temp_store();
        assert!(!store.exists());

        let handle = store.connect().unwrap();
        assert!(!handle.is_closed());
        assert!(store.exists());
        assert_eq!(handle.path(), Some(store.path()));

        let tables: i64 = handle
            .conn()
            .unwrap()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('words', 'bigrams')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 2);
    }

    #[test]
    fn test_connect_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("nested").join("deeper").join("bigrams.db"));

        store.connect().unwrap();
        assert!(store.exists());
    }

    #[test]
    fn test_connect_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "plain file").unwrap();

        let store = Store::new(blocker.join("bigrams.db"));
        let err = store.connect().unwrap_err();
        assert!(matches!(err, Error::StorageUnavailable { .. }));
    }

    #[test]
    fn test_close_is_idempotent() {
        let (_dir, store) = temp_store();
        let mut handle = store.connect().unwrap();

        handle.close().unwrap();
        assert!(handle.is_closed());
        handle.close().unwrap();
        assert!(handle.is_closed());
    }

    #[test]
    fn test_closed_handle_rejects_queries() {
        let mut handle = StoreHandle::open_in_memory().unwrap();
        handle.close().unwrap();

        assert!(matches!(handle.conn(), Err(Error::HandleClosed)));
        assert!(matches!(handle.stats(), Err(Error::HandleClosed)));
    }

    #[test]
    fn test_reset_removes_file() {
        let (_dir, store) = temp_store();
        let mut handle = store.connect().unwrap();
        crate::ingest::ingest(&mut handle, &["the", "cat"]).unwrap();
        handle.close().unwrap();

        store.reset().unwrap();
        assert!(!store.exists());
        for sidecar in store.sidecars() {
            assert!(!sidecar.exists());
        }
    }

    #[test]
    fn test_reset_without_store_is_noop() {
        let (_dir, store) = temp_store();
        store.reset().unwrap();
        store.reset().unwrap();
        assert!(!store.exists());
    }

    #[test]
    fn test_reconnect_after_reset_is_empty() {
        let (_dir, store) = temp_store();
        let mut handle = store.connect().unwrap();
        crate::ingest::ingest(&mut handle, &["cat", "the", "mat"]).unwrap();
        assert_eq!(handle.stats().unwrap().bigrams, 2);
        handle.close().unwrap();

        store.reset().unwrap();

        let handle = store.connect().unwrap();
        let stats = handle.stats().unwrap();
        assert_eq!(stats.words, 0);
        assert_eq!(stats.bigrams, 0);
        assert_eq!(stats.observations, 0);
    }

    #[test]
    fn test_data_survives_reconnect() {
        let (_dir, store) = temp_store();
        let mut handle = store.connect().unwrap();
        crate::ingest::ingest(&mut handle, &["a", "b", "a", "b"]).unwrap();
        handle.close().unwrap();

        let handle = store.connect().unwrap();
        let stats = handle.stats().unwrap();
        assert_eq!(stats.words, 2);
        assert_eq!(stats.bigrams, 2);
        assert_eq!(stats.observations, 3);
    }
}
