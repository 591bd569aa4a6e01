//! Store schema management and migrations.
//!
//! This module handles schema initialization, version checking, and
//! migrations.

use rusqlite::Connection;

use crate::error::{Error, Result};

use super::schema::{
    CREATE_BLOCKS_TABLE, CREATE_HOLDS_RESERVATION_INDEX, CREATE_HOLDS_TABLE,
    CREATE_METADATA_TABLE, CREATE_RESERVATIONS_TABLE, CREATE_SERVICE_INDEX, CREATE_WAITING_INDEX,
    CREATE_WAITING_TABLE, CURRENT_SCHEMA_VERSION, INSERT_SCHEMA_VERSION, SELECT_SCHEMA_VERSION,
};

/// Initializes the store schema on a fresh database.
///
/// # Errors
///
/// Returns an error if any SQL statement fails to execute.
///
/// # Examples
///
/// ```no_run
/// use rusqlite::Connection;
/// use mesa::store::migrations::initialize_schema;
///
/// let conn = Connection::open_in_memory().unwrap();
/// initialize_schema(&conn).unwrap();
/// ```
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;
    conn.execute(CREATE_RESERVATIONS_TABLE, [])?;
    conn.execute(CREATE_HOLDS_TABLE, [])?;
    conn.execute(CREATE_BLOCKS_TABLE, [])?;
    conn.execute(CREATE_WAITING_TABLE, [])?;

    conn.execute(CREATE_SERVICE_INDEX, [])?;
    conn.execute(CREATE_WAITING_INDEX, [])?;
    conn.execute(CREATE_HOLDS_RESERVATION_INDEX, [])?;

    conn.execute(INSERT_SCHEMA_VERSION, [CURRENT_SCHEMA_VERSION])?;

    Ok(())
}

/// Gets the current schema version from the database.
///
/// Returns `Ok(0)` when the metadata table is absent or holds no
/// version, which marks a database needing initialization.
///
/// # Errors
///
/// Returns an error if the query fails for any other reason.
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    match conn.query_row(SELECT_SCHEMA_VERSION, [], |row| {
        let value: String = row.get(0)?;
        value
            .parse::<i32>()
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
    }) {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => {
            if let rusqlite::Error::SqliteFailure(ref sqlite_err, _) = e {
                if sqlite_err.code == rusqlite::ErrorCode::Unknown {
                    // Metadata table doesn't exist yet.
                    return Ok(0);
                }
            }
            Err(e.into())
        }
    }
}

/// Checks schema compatibility and initializes a fresh database.
///
/// # Errors
///
/// Returns [`Error::UnsupportedSchemaVersion`] when the on-disk version
/// differs from [`CURRENT_SCHEMA_VERSION`], or a database error when
/// initialization fails.
pub fn check_schema_compatibility(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version == 0 {
        log::debug!("Initializing fresh schema at version {CURRENT_SCHEMA_VERSION}");
        initialize_schema(conn)?;
        return Ok(());
    }

    if version == CURRENT_SCHEMA_VERSION {
        return Ok(());
    }

    #[allow(clippy::cast_sign_loss)]
    Err(Error::UnsupportedSchemaVersion {
        expected: CURRENT_SCHEMA_VERSION as u32,
        found: version as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_database_reports_version_zero() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), 0);
    }

    #[test]
    fn test_initialize_sets_current_version() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_compatibility_check_initializes_fresh_database() {
        let conn = Connection::open_in_memory().unwrap();
        check_schema_compatibility(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_newer_schema_version_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', '99')",
            [],
        )
        .unwrap();

        let result = check_schema_compatibility(&conn);
        assert!(matches!(
            result,
            Err(Error::UnsupportedSchemaVersion { found: 99, .. })
        ));
    }
}
