//! Table and slot allocation engine for restaurant reservations.
//!
//! `mesa` decides which tables a small restaurant can still promise: it
//! models the dining room (a fixed catalog of one- to six-seat tables,
//! some of which merge into pairs), resolves the per-service state of
//! every table from reservations and block configuration, answers
//! availability queries at the capacity-tier level, auto-assigns tables
//! smallest-fit-first, and parks overflow on a waiting list that is
//! re-verified before promotion.
//!
//! Mutations follow a plan-execute split: planners are pure functions of
//! a [`ServiceSnapshot`], and the [`operations::PlanExecutor`] applies a
//! whole plan in one `SQLite` transaction where the `table_holds`
//! constraint re-validates every assignment at write time.
//!
//! # Examples
//!
//! ```
//! use mesa::config::{Config, ConfigValidator};
//! use mesa::{auto_assign, resolve_states, AssignmentOutcome, PartySize};
//! use mesa::{BlockConfig, ServiceSnapshot, Turno};
//! use chrono::NaiveDate;
//!
//! let room = ConfigValidator::materialize(&Config::default()).unwrap();
//! let saturday = NaiveDate::from_ymd_opt(2026, 9, 5).unwrap();
//! let snapshot = ServiceSnapshot::new(saturday, Turno::Mediodia, vec![], BlockConfig::empty());
//!
//! let states = resolve_states(&room, &snapshot);
//! let outcome = auto_assign(&room, &states, PartySize::try_from(4).unwrap());
//! assert!(matches!(outcome, AssignmentOutcome::Assigned(_)));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod assign;
pub mod availability;
pub mod blocks;
pub mod calendar;
pub mod catalog;
pub mod config;
pub mod conflict;
pub mod error;
pub mod logging;
pub mod operations;
pub mod reservation;
pub mod room;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod table;
pub mod waitlist;

pub use assign::{auto_assign, auto_assign_pending, AssignmentOutcome, BatchPlacement};
pub use availability::{available_slots, tier_demand, tier_supply, Availability, ClosedReason};
pub use blocks::{BlockConfig, DefaultBlocks};
pub use calendar::Calendar;
pub use catalog::{CombinablePair, TableCatalog};
pub use conflict::{check_manual, plan_force_reassign, ForceOutcome, ManualAssignment};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use reservation::{
    CheckInState, PartySize, Reservation, ReservationId, SlotTime, Turno, ValidationError,
};
pub use room::DiningRoom;
pub use snapshot::ServiceSnapshot;
pub use state::{resolve_states, TableState, TableStates};
pub use table::{Capacity, CapacityTier, Table, TableAssignment, TableId};
pub use waitlist::{
    plan_promotion, Promotion, WaitingEntry, WaitingEntryId, WaitingStatus,
};
