//! The waiting list and its promotion into real reservations.
//!
//! When a turn is full for a party's tier, the booking is parked as a
//! [`WaitingEntry`] instead of being refused outright. Entries move
//! through a small status ladder as the front desk works the list, and
//! an open entry is promoted into a reservation only after capacity is
//! re-verified against a fresh snapshot; the list is a queue of intent,
//! never a capacity reservation. A successful promotion marks the entry
//! confirmed, and a failed one leaves it untouched.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::assign::{auto_assign, AssignmentOutcome};
use crate::availability::{available_slots, Availability, ClosedReason};
use crate::reservation::{PartySize, SlotTime, Turno, ValidationError};
use crate::room::DiningRoom;
use crate::snapshot::ServiceSnapshot;
use crate::state::resolve_states;
use crate::table::TableAssignment;

/// A waiting-list entry's identifier, allocated by storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaitingEntryId(i64);

impl WaitingEntryId {
    /// Wraps a raw storage id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw storage id.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for WaitingEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where an entry stands in the front-desk workflow.
///
/// `Pending` entries have not been contacted; `Contacted` entries are
/// waiting on the client's answer; `Confirmed` entries have been
/// promoted into a reservation; `Rejected` entries are closed (client
/// declined or never answered).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitingStatus {
    /// Parked, nobody has reached out yet.
    Pending,
    /// The client has been contacted about a freed slot.
    Contacted,
    /// Promoted into a reservation.
    Confirmed,
    /// Closed without a reservation.
    Rejected,
}

impl WaitingStatus {
    /// Returns `true` if moving to `next` is a legal workflow step.
    ///
    /// The ladder only moves forward: a pending entry may be contacted,
    /// confirmed directly (a promotion does exactly that), or rejected
    /// when the client cancels before being called; a contacted entry
    /// may be confirmed or rejected. Confirmed and rejected entries are
    /// settled and never move again.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Contacted | Self::Confirmed | Self::Rejected)
                | (Self::Contacted, Self::Confirmed | Self::Rejected)
        )
    }
}

impl fmt::Display for WaitingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Contacted => write!(f, "contacted"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for WaitingStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "contacted" => Ok(Self::Contacted),
            "confirmed" => Ok(Self::Confirmed),
            "rejected" => Ok(Self::Rejected),
            other => Err(ValidationError {
                field: "status".into(),
                message: format!("'{other}' is not a waiting-list status"),
            }),
        }
    }
}

/// One parked booking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitingEntry {
    id: WaitingEntryId,
    date: NaiveDate,
    turno: Turno,
    time: SlotTime,
    party_size: PartySize,
    client: String,
    status: WaitingStatus,
}

impl WaitingEntry {
    /// Starts building an entry; new entries begin as `Pending`.
    #[must_use]
    pub fn builder(
        id: WaitingEntryId,
        date: NaiveDate,
        turno: Turno,
        time: SlotTime,
        party_size: PartySize,
    ) -> WaitingEntryBuilder {
        WaitingEntryBuilder {
            id,
            date,
            turno,
            time,
            party_size,
            client: String::new(),
            status: WaitingStatus::Pending,
        }
    }

    /// The entry's identifier.
    #[must_use]
    pub const fn id(&self) -> WaitingEntryId {
        self.id
    }

    /// The requested calendar day.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// The requested meal turn.
    #[must_use]
    pub const fn turno(&self) -> Turno {
        self.turno
    }

    /// The requested slot time.
    #[must_use]
    pub const fn time(&self) -> SlotTime {
        self.time
    }

    /// The party size.
    #[must_use]
    pub const fn party_size(&self) -> PartySize {
        self.party_size
    }

    /// The client's name.
    #[must_use]
    pub fn client(&self) -> &str {
        &self.client
    }

    /// The workflow status.
    #[must_use]
    pub const fn status(&self) -> WaitingStatus {
        self.status
    }

    /// Returns a copy moved to `next`.
    ///
    /// # Errors
    ///
    /// Returns an error if the step is not a legal workflow transition.
    pub fn with_status(&self, next: WaitingStatus) -> Result<Self, ValidationError> {
        if !self.status.can_transition_to(next) {
            return Err(ValidationError {
                field: "status".into(),
                message: format!("cannot move a {} entry to {next}", self.status),
            });
        }
        let mut entry = self.clone();
        entry.status = next;
        Ok(entry)
    }
}

/// Builder for [`WaitingEntry`].
#[derive(Debug)]
pub struct WaitingEntryBuilder {
    id: WaitingEntryId,
    date: NaiveDate,
    turno: Turno,
    time: SlotTime,
    party_size: PartySize,
    client: String,
    status: WaitingStatus,
}

impl WaitingEntryBuilder {
    /// Sets the client's name (required, non-empty).
    #[must_use]
    pub fn client(mut self, client: impl Into<String>) -> Self {
        self.client = client.into();
        self
    }

    /// Sets the workflow status (defaults to `Pending`).
    #[must_use]
    pub const fn status(mut self, status: WaitingStatus) -> Self {
        self.status = status;
        self
    }

    /// Builds the entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the client name is empty after trimming.
    pub fn build(self) -> Result<WaitingEntry, ValidationError> {
        if self.client.trim().is_empty() {
            return Err(ValidationError {
                field: "client".into(),
                message: "a waiting-list entry needs a client name".into(),
            });
        }
        Ok(WaitingEntry {
            id: self.id,
            date: self.date,
            turno: self.turno,
            time: self.time,
            party_size: self.party_size,
            client: self.client,
            status: self.status,
        })
    }
}

/// The promotion planner's verdict for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Promotion {
    /// Capacity re-verified; create the reservation on this assignment.
    Promote {
        /// The table selected for the promoted party.
        assignment: TableAssignment,
    },
    /// The turn (still) cannot take the party; the entry stays parked.
    Unavailable {
        /// Why the turn refused the party.
        reason: ClosedReason,
    },
    /// Settled entries (already promoted, or closed) are not promoted.
    NotEligible {
        /// The entry's current status.
        status: WaitingStatus,
    },
}

/// Plans the promotion of an open entry against a fresh snapshot.
///
/// Pending and contacted entries are eligible; a confirmed entry was
/// already promoted and a rejected one is closed. Availability is
/// re-verified from scratch: parking on the list never reserved any
/// capacity, and whatever was free when the entry was parked may be
/// gone by now. The requested slot must still be offered and the
/// auto-assigner must find a table.
#[must_use]
pub fn plan_promotion(
    room: &DiningRoom,
    snapshot: &ServiceSnapshot,
    entry: &WaitingEntry,
) -> Promotion {
    if !matches!(
        entry.status(),
        WaitingStatus::Pending | WaitingStatus::Contacted
    ) {
        return Promotion::NotEligible {
            status: entry.status(),
        };
    }

    match available_slots(room, snapshot, entry.party_size()) {
        Availability::Closed { reason } => return Promotion::Unavailable { reason },
        Availability::Open { slots } => {
            if !slots.contains(&entry.time()) {
                return Promotion::Unavailable {
                    reason: ClosedReason::NotServing,
                };
            }
        }
    }

    let states = resolve_states(room, snapshot);
    match auto_assign(room, &states, entry.party_size()) {
        AssignmentOutcome::Assigned(assignment) => Promotion::Promote { assignment },
        AssignmentOutcome::Exhausted { tier } => Promotion::Unavailable {
            reason: ClosedReason::TierFull { tier },
        },
    }
}
