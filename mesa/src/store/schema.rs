//! Database schema definitions and SQL constants.
//!
//! This module contains all SQL table definitions, indices, and constants
//! related to the database schema for the mesa reservation store.
//!
//! The `table_holds` table is the storage-level guard for the exclusivity
//! invariant: one row per `(date, turno, table_id)`, so two reservations
//! can never hold the same table for the same service no matter how the
//! writes interleave.

/// Current schema version for the database.
///
/// This version is stored in the metadata table and is used to ensure
/// compatibility between the database and the application.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// SQL statement to create the metadata table.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the reservations table.
///
/// Cancellation flips the `cancelled` flag rather than deleting the row;
/// the active set is always `cancelled = 0`.
pub const CREATE_RESERVATIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        turno TEXT NOT NULL,
        time TEXT NOT NULL,
        party_size INTEGER NOT NULL,
        assigned_table TEXT,
        check_in TEXT NOT NULL DEFAULT 'none',
        client TEXT NOT NULL,
        cancelled INTEGER NOT NULL DEFAULT 0
    )";

/// SQL statement to create the table-holds table.
///
/// One row per member table of an assignment. The primary key makes a
/// double-booking a constraint violation instead of a silent overwrite.
pub const CREATE_HOLDS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS table_holds (
        date TEXT NOT NULL,
        turno TEXT NOT NULL,
        table_id INTEGER NOT NULL,
        reservation_id INTEGER NOT NULL,
        PRIMARY KEY (date, turno, table_id)
    )";

/// SQL statement to create the block-configs table.
///
/// One row per `(date, turno)` service; `version` supports
/// compare-and-swap saves.
pub const CREATE_BLOCKS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS block_configs (
        date TEXT NOT NULL,
        turno TEXT NOT NULL,
        manual TEXT NOT NULL,
        exceptions TEXT NOT NULL,
        version INTEGER NOT NULL,
        PRIMARY KEY (date, turno)
    )";

/// SQL statement to create the waiting-list table.
pub const CREATE_WAITING_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS waiting_entries (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        turno TEXT NOT NULL,
        time TEXT NOT NULL,
        party_size INTEGER NOT NULL,
        client TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'pending'
    )";

/// SQL statement to create an index on the reservations' service columns.
///
/// Snapshot loads always filter by `(date, turno)`.
pub const CREATE_SERVICE_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_reservations_service
    ON reservations(date, turno)";

/// SQL statement to create an index on the waiting list's service columns.
pub const CREATE_WAITING_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_waiting_service
    ON waiting_entries(date, turno)";

/// SQL statement to create an index on the holds' reservation column.
///
/// Reassignment clears a reservation's holds before writing new ones.
pub const CREATE_HOLDS_RESERVATION_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_holds_reservation
    ON table_holds(reservation_id)";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";
