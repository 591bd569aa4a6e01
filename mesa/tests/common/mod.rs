//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use chrono::NaiveDate;
use tempfile::TempDir;

use mesa::config::{Config, ConfigValidator};
use mesa::reservation::{PartySize, Turno};
use mesa::store::{Store, StoreConfig};
use mesa::DiningRoom;

/// Opens a store on a fresh database; the directory lives as long as
/// the returned guard.
pub fn open_store() -> (Store, TempDir) {
    let dir = TempDir::new().expect("temp dir");
    let store = Store::open(StoreConfig::new(dir.path().join("mesa.db"))).expect("open store");
    (store, dir)
}

/// The default nine-table floor plan with the (2, 3) merge pair.
pub fn default_room() -> DiningRoom {
    ConfigValidator::materialize(&Config::default()).expect("default room")
}

/// A Saturday, open for both turns.
pub fn saturday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, 5).unwrap()
}

pub fn covers(n: u8) -> PartySize {
    PartySize::try_from(n).unwrap()
}

pub fn lunch() -> Turno {
    Turno::Mediodia
}
