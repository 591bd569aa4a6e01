//! Shared test utilities for store unit tests.

use chrono::NaiveDate;
use tempfile::tempdir;

use crate::reservation::{PartySize, Turno};
use crate::store::{NewReservation, NewWaitingEntry, Store, StoreConfig};

/// Creates a temporary test store that is cleaned up automatically.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
/// This is acceptable in test code where we want to fail fast.
#[must_use]
pub fn create_test_store() -> Store {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let store = Store::open(StoreConfig::new(path)).unwrap();

    // Prevent the TempDir from being dropped immediately
    std::mem::forget(dir);

    store
}

/// Builds a midday reservation request for tests.
///
/// # Panics
///
/// Panics on invalid party sizes or assignment strings.
#[must_use]
pub fn new_reservation(date: NaiveDate, covers: u8, table: Option<&str>) -> NewReservation {
    NewReservation {
        date,
        turno: Turno::Mediodia,
        time: "13:00".parse().unwrap(),
        party_size: PartySize::try_from(covers).unwrap(),
        client: "client".into(),
        assignment: table.map(|t| t.parse().unwrap()),
    }
}

/// Builds a midday waiting-list request for tests.
///
/// # Panics
///
/// Panics on invalid party sizes.
#[must_use]
pub fn new_waiting(date: NaiveDate, covers: u8) -> NewWaitingEntry {
    NewWaitingEntry {
        date,
        turno: Turno::Mediodia,
        time: "13:30".parse().unwrap(),
        party_size: PartySize::try_from(covers).unwrap(),
        client: "client".into(),
    }
}
