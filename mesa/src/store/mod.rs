//! Storage layer for reservations, table holds, block configurations,
//! and the waiting list.
//!
//! This module provides a `SQLite`-based store with connection
//! management, schema versioning, and the write-side enforcement of the
//! exclusivity invariant: the `table_holds` table holds one row per
//! `(date, turno, table)` so a table can never be assigned twice for the
//! same service.
//!
//! # Examples
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use mesa::store::{Store, StoreConfig};
//! use mesa::Turno;
//!
//! let mut store = Store::open(StoreConfig::new("/tmp/mesa.db")).unwrap();
//! let snapshot = store
//!     .load_snapshot(NaiveDate::from_ymd_opt(2026, 9, 5).unwrap(), Turno::Mediodia)
//!     .unwrap();
//! println!("{} reservations", snapshot.reservations().len());
//! ```

mod config;
mod connection;
pub mod migrations;
mod operations;
mod schema;

#[cfg(test)]
pub(crate) mod test_util;

pub use config::{default_data_dir, resolve_database_path, StoreConfig};
pub use connection::Store;
pub use operations::{NewReservation, NewWaitingEntry};

pub(crate) use connection::lock_error;
pub(crate) use operations::{
    clear_holds, delete_waiting_row, insert_holds, insert_reservation_row, insert_waiting_row,
    mark_cancelled_row, save_blocks_row, update_assignment_row, update_check_in_row,
    update_waiting_status_row,
};

// Re-export migration functions for advanced use cases
pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
