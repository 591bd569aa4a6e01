//! Assignment planning: placing existing reservations on tables.
//!
//! Three entry points: a manual placement of one reservation (optionally
//! forcing a contested table free), a single auto-assignment, and the
//! batch pass that places every unassigned reservation of a service in
//! arrival order.

use crate::assign::{auto_assign, auto_assign_pending, AssignmentOutcome};
use crate::conflict::{check_manual, plan_force_reassign, ForceOutcome, ManualAssignment};
use crate::error::{Error, Result};
use crate::reservation::ReservationId;
use crate::room::DiningRoom;
use crate::snapshot::ServiceSnapshot;
use crate::state::resolve_states;
use crate::table::TableAssignment;

use super::plan::{OperationPlan, PlanAction};

/// A request to place a reservation on a specific table or merged pair.
#[derive(Debug, Clone)]
pub struct AssignRequest {
    /// The reservation being placed.
    pub reservation: ReservationId,
    /// The requested table or merged pair.
    pub assignment: TableAssignment,
    /// Whether a walk-in-only override has been confirmed.
    pub confirm_walk_in: bool,
    /// Whether a conflicting occupant may be relocated.
    pub force: bool,
}

/// Plans a manual table assignment.
///
/// Without `force`, a table reserved by another party is an error naming
/// the occupant so the caller can offer the forced path. With `force`,
/// the occupant (and any co-holder of a contested pair) is relocated via
/// auto-assignment in the same plan; the whole plan applies atomically
/// or not at all.
///
/// # Errors
///
/// Returns [`Error::NotFound`] when the reservation is not part of the
/// snapshot's service, [`Error::TableConflict`] on an unforced conflict,
/// [`Error::TableUnavailable`] or [`Error::UnknownTable`] on a hard
/// rejection, [`Error::WalkInOverrideRequired`] without confirmation,
/// and [`Error::TurnFull`] when a forced displacement has nowhere to go.
pub fn plan_assign(
    room: &DiningRoom,
    snapshot: &ServiceSnapshot,
    request: &AssignRequest,
) -> Result<OperationPlan> {
    let Some(reservation) = snapshot.reservation(request.reservation) else {
        return Err(Error::NotFound {
            resource: format!("reservation {}", request.reservation),
        });
    };

    let states = resolve_states(room, snapshot);
    let verdict = check_manual(
        room,
        &states,
        Some(request.reservation),
        &request.assignment,
        request.confirm_walk_in,
    );

    match verdict {
        ManualAssignment::Allowed => {}
        ManualAssignment::NeedsConfirmation { tables } => {
            return Err(Error::WalkInOverrideRequired { tables });
        }
        ManualAssignment::Conflict { table, occupant } => {
            if !request.force {
                return Err(Error::TableConflict { table, occupant });
            }
            return plan_forced(room, snapshot, request);
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

    Ok(OperationPlan::new(format!(
        "Assign table {} to {}",
        request.assignment,
        reservation.client()
    ))
    .add_action(PlanAction::AssignTable {
        date: snapshot.date(),
        turno: snapshot.turno(),
        reservation: request.reservation,
        assignment: request.assignment,
    }))
}

fn plan_forced(
    room: &DiningRoom,
    snapshot: &ServiceSnapshot,
    request: &AssignRequest,
) -> Result<OperationPlan> {
    match plan_force_reassign(room, snapshot, request.reservation, &request.assignment) {
        ForceOutcome::Relocated { moves } => {
            let mut plan = OperationPlan::new(format!(
                "Take table {} by force, relocating {} reservation(s)",
                request.assignment,
                moves.len()
            ))
            .add_action(PlanAction::AssignTable {
                date: snapshot.date(),
                turno: snapshot.turno(),
                reservation: request.reservation,
                assignment: request.assignment,
            });
            for (displaced, replacement) in moves {
                plan = plan.add_action(PlanAction::AssignTable {
                    date: snapshot.date(),
                    turno: snapshot.turno(),
                    reservation: displaced,
                    assignment: replacement,
                });
            }
            Ok(plan)
        }
        ForceOutcome::Impossible { tier, .. } => Err(Error::TurnFull { tier }),
        ForceOutcome::NotForceable { table } => {
            // Occupied or blocked members were already rejected by the
            // manual check; reaching this arm means the snapshot changed
            // between checks, so report the table as contested.
            Err(Error::TableUnavailable {
                table,
                state: crate::state::TableState::Occupied,
            })
        }
    }
}

/// Plans an auto-assignment for one unassigned reservation.
///
/// # Errors
///
/// Returns [`Error::NotFound`] when the reservation is not part of the
/// snapshot's service and [`Error::TurnFull`] when no free unit fits the
/// party.
pub fn plan_auto_assign(
    room: &DiningRoom,
    snapshot: &ServiceSnapshot,
    reservation: ReservationId,
) -> Result<OperationPlan> {
    let Some(found) = snapshot.reservation(reservation) else {
        return Err(Error::NotFound {
            resource: format!("reservation {reservation}"),
        });
    };

    let states = resolve_states(room, snapshot);
    match auto_assign(room, &states, found.party_size()) {
        AssignmentOutcome::Assigned(assignment) => Ok(OperationPlan::new(format!(
            "Assign table {assignment} to {}",
            found.client()
        ))
        .add_action(PlanAction::AssignTable {
            date: snapshot.date(),
            turno: snapshot.turno(),
            reservation,
            assignment,
        })),
        AssignmentOutcome::Exhausted { tier } => Err(Error::TurnFull { tier }),
    }
}

/// Plans the batch auto-assignment of every unassigned reservation.
///
/// Reservations are placed in arrival order (slot time, then id), each
/// against the picture left by the previous placement. Parties that
/// cannot be placed become warnings; the rest of the batch proceeds.
#[must_use]
pub fn plan_auto_assign_pending(room: &DiningRoom, snapshot: &ServiceSnapshot) -> OperationPlan {
    let placements = auto_assign_pending(room, snapshot);
    let mut plan = OperationPlan::new(format!(
        "Auto-assign {} pending reservation(s) for {} {}",
        placements.len(),
        snapshot.date(),
        snapshot.turno()
    ));

    for placement in placements {
        match placement.outcome {
            AssignmentOutcome::Assigned(assignment) => {
                plan = plan.add_action(PlanAction::AssignTable {
                    date: snapshot.date(),
                    turno: snapshot.turno(),
                    reservation: placement.reservation,
                    assignment,
                });
            }
            AssignmentOutcome::Exhausted { tier } => {
                plan = plan.add_warning(format!(
                    "no free {tier} unit for reservation {}",
                    placement.reservation
                ));
            }
        }
    }

    plan
}
