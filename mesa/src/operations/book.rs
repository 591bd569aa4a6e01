//! Booking planning: from a booking request to an operation plan.
//!
//! A booking lands in one of two places: a reservation (auto-assigned or
//! pinned to a requested table) when the turn has capacity, or a
//! waiting-list entry when the party's tier is full. A closed service is
//! an error, not a waiting-list case; there is nothing to wait for.

use crate::assign::{auto_assign, AssignmentOutcome};
use crate::availability::{available_slots, Availability, ClosedReason};
use crate::conflict::{check_manual, ManualAssignment};
use crate::error::{Error, Result};
use crate::reservation::{PartySize, SlotTime, Turno};
use crate::room::DiningRoom;
use crate::snapshot::ServiceSnapshot;
use crate::state::resolve_states;
use crate::store::{NewReservation, NewWaitingEntry};
use crate::table::{CapacityTier, TableAssignment};
use chrono::NaiveDate;

use super::plan::{OperationPlan, PlanAction};

/// A request to book a table.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    /// The requested calendar day.
    pub date: NaiveDate,
    /// The requested meal turn.
    pub turno: Turno,
    /// The requested slot time.
    pub time: SlotTime,
    /// The party size.
    pub party_size: PartySize,
    /// The client reference.
    pub client: String,
    /// A specific table or pair requested by the admin, instead of
    /// auto-assignment.
    pub table: Option<TableAssignment>,
    /// Whether a walk-in-only override has been confirmed.
    pub confirm_walk_in: bool,
}

impl BookingRequest {
    /// Creates a request that auto-assigns a table.
    #[must_use]
    pub fn new(
        date: NaiveDate,
        turno: Turno,
        time: SlotTime,
        party_size: PartySize,
        client: impl Into<String>,
    ) -> Self {
        Self {
            date,
            turno,
            time,
            party_size,
            client: client.into(),
            table: None,
            confirm_walk_in: false,
        }
    }

    /// Pins the booking to a specific table or merged pair.
    #[must_use]
    pub fn with_table(mut self, table: TableAssignment) -> Self {
        self.table = Some(table);
        self
    }

    /// Confirms a walk-in-only override in advance.
    #[must_use]
    pub const fn confirm_walk_in(mut self) -> Self {
        self.confirm_walk_in = true;
        self
    }
}

/// What the booking planner decided.
#[derive(Debug, Clone)]
pub enum BookingOutcome {
    /// The turn has capacity: execute to create the reservation.
    Booked {
        /// The plan creating the reservation.
        plan: OperationPlan,
        /// The table the reservation will hold.
        assignment: TableAssignment,
    },
    /// The party's tier is full: execute to park the booking instead.
    Waitlisted {
        /// The plan creating the waiting-list entry.
        plan: OperationPlan,
        /// The tier that was full.
        tier: CapacityTier,
    },
}

/// Plans a booking against one service snapshot.
///
/// # Errors
///
/// Returns [`Error::Closed`] when the restaurant does not serve the
/// requested date/turno, a validation error when the slot time is not in
/// the turn's slot list, and the conflict errors of an explicit table
/// request ([`Error::TableConflict`], [`Error::TableUnavailable`],
/// [`Error::WalkInOverrideRequired`], [`Error::UnknownTable`]).
pub fn plan_booking(
    room: &DiningRoom,
    snapshot: &ServiceSnapshot,
    request: &BookingRequest,
) -> Result<BookingOutcome> {
    if !room.calendar().is_open(request.date, request.turno) {
        return Err(Error::Closed);
    }
    if !room.calendar().contains_slot(request.turno, request.time) {
        return Err(Error::Validation {
            field: "time".into(),
            message: format!(
                "{} is not a {} slot",
                request.time, request.turno
            ),
        });
    }

    let availability = available_slots(room, snapshot, request.party_size);
    if let Availability::Closed { reason } = availability {
        let tier = match reason {
            ClosedReason::TierFull { tier } => tier,
            // The calendar was already checked; full tiers are the only
            // remaining closed reason.
            ClosedReason::NotServing => return Err(Error::Closed),
        };
        let plan = OperationPlan::new(format!(
            "Park {} on the waiting list ({tier} tier full)",
            request.client
        ))
        .add_action(PlanAction::CreateWaitingEntry(NewWaitingEntry {
            date: request.date,
            turno: request.turno,
            time: request.time,
            party_size: request.party_size,
            client: request.client.clone(),
        }));
        return Ok(BookingOutcome::Waitlisted { plan, tier });
    }

    let states = resolve_states(room, snapshot);
    let assignment = match request.table {
        Some(requested) => {
            match check_manual(room, &states, None, &requested, request.confirm_walk_in) {
                ManualAssignment::Allowed => requested,
                ManualAssignment::NeedsConfirmation { tables } => {
                    return Err(Error::WalkInOverrideRequired { tables });
                }
                ManualAssignment::Conflict { table, occupant } => {
                    return Err(Error::TableConflict { table, occupant });
                }
                ManualAssignment::Rejected { table, state } => {
                    return match state {
                        Some(state) => Err(Error::TableUnavailable { table, state }),
                        None => Err(Error::UnknownTable { table }),
                    };
                }
                ManualAssignment::NotCombinable { first, second } => {
                    return Err(Error::Validation {
                        field: "table".into(),
                        message: format!("tables {first} and {second} cannot be merged"),
                    });
                }
            }
        }
        None => match auto_assign(room, &states, request.party_size) {
            AssignmentOutcome::Assigned(assignment) => assignment,
            // Tier capacity said yes but no concrete unit fits; treat it
            // the same as a full tier.
            AssignmentOutcome::Exhausted { tier } => {
                let plan = OperationPlan::new(format!(
                    "Park {} on the waiting list (no {tier} unit free)",
                    request.client
                ))
                .add_action(PlanAction::CreateWaitingEntry(NewWaitingEntry {
                    date: request.date,
                    turno: request.turno,
                    time: request.time,
                    party_size: request.party_size,
                    client: request.client.clone(),
                }));
                return Ok(BookingOutcome::Waitlisted { plan, tier });
            }
        },
    };

    let plan = OperationPlan::new(format!(
        "Book {} ({} covers) on table {assignment}",
        request.client,
        request.party_size.covers()
    ))
    .add_action(PlanAction::CreateReservation(NewReservation {
        date: request.date,
        turno: request.turno,
        time: request.time,
        party_size: request.party_size,
        client: request.client.clone(),
        assignment: Some(assignment),
    }));

    Ok(BookingOutcome::Booked { plan, assignment })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::blocks::BlockConfig;
    use crate::catalog::fixtures::id;
    use crate::reservation::{Reservation, ReservationId};
    use crate::room::fixtures::room;

    fn saturday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 5).unwrap()
    }

    fn request(covers: u8) -> BookingRequest {
        BookingRequest::new(
            saturday(),
            Turno::Mediodia,
            "13:00".parse().unwrap(),
            PartySize::try_from(covers).unwrap(),
            "Ana",
        )
    }

    fn reservation(rid: i64, covers: u8, table: &str) -> Reservation {
        Reservation::builder(
            ReservationId::new(rid),
            saturday(),
            Turno::Mediodia,
            "13:00".parse().unwrap(),
            PartySize::try_from(covers).unwrap(),
        )
        .client("client")
        .assigned_table(Some(table.parse().unwrap()))
        .build()
        .unwrap()
    }

    fn snapshot(reservations: Vec<Reservation>) -> ServiceSnapshot {
        ServiceSnapshot::new(saturday(), Turno::Mediodia, reservations, BlockConfig::empty())
    }

    #[test]
    fn test_booking_auto_assigns_exact_fit() {
        let outcome = plan_booking(&room(), &snapshot(vec![]), &request(2)).unwrap();
        let BookingOutcome::Booked { assignment, plan } = outcome else {
            panic!("expected a booking");
        };
        assert_eq!(assignment, TableAssignment::Single(id(1)));
        assert_eq!(plan.actions.len(), 1);
    }

    #[test]
    fn test_booking_on_closed_day_is_an_error() {
        let monday = NaiveDate::from_ymd_opt(2026, 9, 7).unwrap();
        let mut req = request(2);
        req.date = monday;
        let snap = ServiceSnapshot::new(monday, Turno::Mediodia, vec![], BlockConfig::empty());
        assert!(matches!(
            plan_booking(&room(), &snap, &req),
            Err(Error::Closed)
        ));
    }

    #[test]
    fn test_booking_rejects_off_grid_time() {
        let mut req = request(2);
        req.time = "16:45".parse().unwrap();
        assert!(matches!(
            plan_booking(&room(), &snapshot(vec![]), &req),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_full_tier_routes_to_waiting_list() {
        let taken: Vec<Reservation> = (1..=4)
            .map(|n| reservation(n, 4, &(n + 4).to_string()))
            .collect();
        let outcome = plan_booking(&room(), &snapshot(taken), &request(4)).unwrap();
        let BookingOutcome::Waitlisted { tier, plan } = outcome else {
            panic!("expected waitlisting");
        };
        assert_eq!(tier, CapacityTier::Medium);
        assert!(matches!(
            plan.actions[0],
            PlanAction::CreateWaitingEntry(_)
        ));
    }

    #[test]
    fn test_explicit_table_conflict_surfaces_occupant() {
        let snap = snapshot(vec![reservation(1, 4, "5")]);
        let req = request(4).with_table("5".parse().unwrap());
        let result = plan_booking(&room(), &snap, &req);
        assert!(matches!(
            result,
            Err(Error::TableConflict {
                occupant,
                ..
            }) if occupant == ReservationId::new(1)
        ));
    }

    #[test]
    fn test_explicit_table_happy_path() {
        let req = request(4).with_table("6".parse().unwrap());
        let outcome = plan_booking(&room(), &snapshot(vec![]), &req).unwrap();
        let BookingOutcome::Booked { assignment, .. } = outcome else {
            panic!("expected a booking");
        };
        assert_eq!(assignment, TableAssignment::Single(id(6)));
    }
}
