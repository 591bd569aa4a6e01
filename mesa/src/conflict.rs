//! Manual-assignment checking and forced reassignment.
//!
//! Manual assignment lets an admin pin a reservation to a specific table
//! or merged pair. The checker never mutates anything: it classifies the
//! request so the caller can apply it, ask for confirmation, or show the
//! conflicting occupant. Forced reassignment is planned the same way,
//! and the plan is all-or-nothing: if any displaced party has nowhere to
//! go, no move happens at all.

use crate::reservation::ReservationId;
use crate::room::DiningRoom;
use crate::snapshot::ServiceSnapshot;
use crate::state::{resolve_states, TableState, TableStates};
use crate::table::{CapacityTier, TableAssignment, TableId};

use crate::assign::{auto_assign, AssignmentOutcome};

/// The checker's verdict on a manual assignment request.
///
/// Verdicts are ranked: a hard rejection on any member table outranks a
/// conflict, and a conflict outranks a confirmation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManualAssignment {
    /// The assignment can be applied as requested.
    Allowed,
    /// Every member is free but at least one is held for walk-ins; the
    /// admin must confirm the override.
    NeedsConfirmation {
        /// The walk-in-only member tables.
        tables: Vec<TableId>,
    },
    /// A member table is reserved by another party. The caller may offer
    /// a forced reassignment.
    Conflict {
        /// The contested table.
        table: TableId,
        /// The reservation currently holding it.
        occupant: ReservationId,
    },
    /// A member table can never take this reservation.
    Rejected {
        /// The offending table.
        table: TableId,
        /// Why: `Occupied`, `Blocked`, or `None` for an id outside the
        /// catalog.
        state: Option<TableState>,
    },
    /// The two requested tables are not a combinable pair.
    NotCombinable {
        /// Lower-id half of the request.
        first: TableId,
        /// Higher-id half of the request.
        second: TableId,
    },
}

/// Classifies a manual assignment of `assignment` to a reservation.
///
/// `incoming` is the reservation being placed, or `None` when the
/// reservation does not exist yet (booking with an explicit table). A
/// table already held by the incoming reservation is not a conflict, so
/// re-applying an existing assignment is allowed. Pass `confirm_walk_in`
/// once the admin has acknowledged a walk-in-only override.
#[must_use]
pub fn check_manual(
    room: &DiningRoom,
    states: &TableStates,
    incoming: Option<ReservationId>,
    assignment: &TableAssignment,
    confirm_walk_in: bool,
) -> ManualAssignment {
    if let TableAssignment::Combined(a, b) = *assignment {
        if room.catalog().pair_capacity(a, b).is_none() {
            return ManualAssignment::NotCombinable { first: a, second: b };
        }
    }

    let mut conflict: Option<(TableId, ReservationId)> = None;
    let mut walk_in: Vec<TableId> = Vec::new();

    for member in assignment.members() {
        match states.state(member) {
            None => {
                return ManualAssignment::Rejected {
                    table: member,
                    state: None,
                };
            }
            Some(state @ (TableState::Occupied | TableState::Blocked)) => {
                return ManualAssignment::Rejected {
                    table: member,
                    state: Some(state),
                };
            }
            Some(TableState::Reserved) => {
                match states.occupant(member) {
                    Some(holder) if incoming != Some(holder) => {
                        if conflict.is_none() {
                            conflict = Some((member, holder));
                        }
                    }
                    // Held by this reservation already, or an occupant
                    // record is missing; either way not a conflict here.
                    _ => {}
                }
            }
            Some(TableState::WalkInOnly) => walk_in.push(member),
            Some(TableState::Free) => {}
        }
    }

    if let Some((table, occupant)) = conflict {
        return ManualAssignment::Conflict { table, occupant };
    }
    if !walk_in.is_empty() && !confirm_walk_in {
        return ManualAssignment::NeedsConfirmation { tables: walk_in };
    }
    ManualAssignment::Allowed
}

/// The planned result of a forced reassignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForceOutcome {
    /// The target goes to the incoming reservation; each displaced
    /// reservation moves to the listed replacement.
    Relocated {
        /// Replacement assignments, one per displaced reservation.
        moves: Vec<(ReservationId, TableAssignment)>,
    },
    /// A displaced party had nowhere to go. Nothing may change.
    Impossible {
        /// The reservation that could not be relocated.
        reservation: ReservationId,
        /// Its capacity tier, for reporting.
        tier: CapacityTier,
    },
    /// A member of the target is not merely reserved, so force does not
    /// apply; resolve via [`check_manual`] instead.
    NotForceable {
        /// The offending table.
        table: TableId,
    },
}

/// Plans a forced takeover of `target` for the `incoming` reservation.
///
/// Finds the reservations currently holding the target's members, frees
/// their whole assignments, hands the target to the incoming party, and
/// auto-assigns each displaced party a replacement against the resulting
/// picture. Seated parties are never displaced. The returned plan is
/// only valid against the snapshot it was computed from; the caller must
/// apply it atomically or not at all.
#[must_use]
pub fn plan_force_reassign(
    room: &DiningRoom,
    snapshot: &ServiceSnapshot,
    incoming: ReservationId,
    target: &TableAssignment,
) -> ForceOutcome {
    let states = resolve_states(room, snapshot);

    let mut displaced: Vec<ReservationId> = Vec::new();
    for member in target.members() {
        match states.state(member) {
            Some(TableState::Free | TableState::WalkInOnly) => {}
            Some(TableState::Reserved) => {
                if let Some(holder) = states.occupant(member) {
                    if holder != incoming && !displaced.contains(&holder) {
                        displaced.push(holder);
                    }
                }
            }
            _ => return ForceOutcome::NotForceable { table: member },
        }
    }

    // Re-resolve with the displaced assignments stripped, in the same
    // snapshot ordering the batch assigner uses.
    let stripped: Vec<_> = snapshot
        .reservations()
        .iter()
        .map(|r| {
            if displaced.contains(&r.id()) {
                r.clone().with_assignment(None)
            } else {
                r.clone()
            }
        })
        .collect();
    let hypothetical = ServiceSnapshot::new(
        snapshot.date(),
        snapshot.turno(),
        stripped,
        snapshot.blocks().clone(),
    );
    let mut states = resolve_states(room, &hypothetical);
    states.mark_assigned(target, incoming);

    let mut moves = Vec::with_capacity(displaced.len());
    for reservation in hypothetical
        .reservations()
        .iter()
        .filter(|r| displaced.contains(&r.id()))
    {
        match auto_assign(room, &states, reservation.party_size()) {
            AssignmentOutcome::Assigned(replacement) => {
                states.mark_assigned(&replacement, reservation.id());
                moves.push((reservation.id(), replacement));
            }
            AssignmentOutcome::Exhausted { tier } => {
                return ForceOutcome::Impossible {
                    reservation: reservation.id(),
                    tier,
                };
            }
        }
    }

    ForceOutcome::Relocated { moves }
}
