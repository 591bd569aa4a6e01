//! Store connection management.
//!
//! This module provides the store's connection type with proper
//! initialization and PRAGMA settings for `SQLite`.

use std::time::Duration;

use rusqlite::{Connection, OpenFlags};

use crate::error::{Error, Result};

use super::config::StoreConfig;

/// A reservation store backed by a `SQLite` connection.
///
/// The connection is opened in WAL mode with a busy timeout so two
/// front-desk terminals can share one database file.
///
/// # Examples
///
/// ```no_run
/// use mesa::store::{Store, StoreConfig};
///
/// let store = Store::open(StoreConfig::new("/tmp/mesa.db")).unwrap();
/// ```
#[derive(Debug)]
pub struct Store {
    pub(super) conn: Connection,
    config: StoreConfig,
}

impl Store {
    /// Opens the store with the given configuration.
    ///
    /// Creates the parent directory when `auto_create` is enabled, sets
    /// WAL mode and the busy timeout, and initializes or verifies the
    /// schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, PRAGMA settings
    /// cannot be applied, or the schema version is incompatible.
    pub fn open(config: StoreConfig) -> Result<Self> {
        if !config.path.exists() {
            if config.auto_create {
                if let Some(parent) = config.path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
            } else {
                return Err(Error::DataDirectoryNotFound {
                    path: config.path.clone(),
                });
            }
        }

        let flags = if config.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else if config.auto_create {
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX
        };

        let conn = Connection::open_with_flags(&config.path, flags)?;

        // PRAGMA journal_mode returns a row, so query_row is required.
        let _: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        conn.execute_batch("PRAGMA synchronous = NORMAL")?;
        conn.execute_batch(&format!(
            "PRAGMA busy_timeout = {}",
            config.busy_timeout.as_millis()
        ))?;

        super::migrations::check_schema_compatibility(&conn)?;

        Ok(Self { conn, config })
    }

    /// Returns a reference to the underlying `SQLite` connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns a mutable reference to the underlying `SQLite` connection,
    /// for operations that need a transaction.
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Returns the configured busy timeout.
    pub(crate) const fn busy_timeout(&self) -> Duration {
        self.config.busy_timeout
    }
}

/// Maps a failure to begin a transaction: a busy database after the
/// configured timeout becomes a lock timeout, everything else stays a
/// database error.
pub(crate) fn lock_error(err: rusqlite::Error, busy_timeout: Duration) -> Error {
    if let rusqlite::Error::SqliteFailure(failure, _) = &err {
        if failure.code == rusqlite::ErrorCode::DatabaseBusy {
            return Error::LockTimeout {
                seconds: busy_timeout.as_secs(),
            };
        }
    }
    Error::Database(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_store_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let store = Store::open(StoreConfig::new(&path)).unwrap();
        assert!(path.exists());

        let journal_mode: String = store
            .connection()
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(journal_mode.to_lowercase(), "wal");
    }

    #[test]
    fn test_store_auto_creates_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("subdir").join("test.db");
        assert!(!path.parent().unwrap().exists());

        let _store = Store::open(StoreConfig::new(&path)).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_busy_error_becomes_lock_timeout() {
        let busy = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        );
        let mapped = lock_error(busy, Duration::from_secs(5));
        assert!(matches!(mapped, Error::LockTimeout { seconds: 5 }));

        let other = rusqlite::Error::QueryReturnedNoRows;
        let mapped = lock_error(other, Duration::from_secs(5));
        assert!(matches!(mapped, Error::Database(_)));
    }

    #[test]
    fn test_missing_database_without_auto_create_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.db");

        let result = Store::open(StoreConfig::new(&path).read_only());
        assert!(matches!(
            result,
            Err(Error::DataDirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_store_read_only_refuses_writes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        {
            Store::open(StoreConfig::new(&path)).unwrap();
        }

        let store = Store::open(StoreConfig::new(&path).read_only()).unwrap();
        let result = store
            .connection()
            .execute("CREATE TABLE scratch (id INTEGER)", []);
        assert!(result.is_err());
    }
}
