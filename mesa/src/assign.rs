//! The auto-assignment engine.
//!
//! Picks a concrete table (or merged pair) for a party out of the
//! currently free tables. Selection is exact-fit-first: the smallest
//! capacity that seats the party wins, and among equal capacities the
//! lowest table id wins, so identical inputs always produce the same
//! assignment.

use crate::reservation::{PartySize, ReservationId};
use crate::room::DiningRoom;
use crate::snapshot::ServiceSnapshot;
use crate::state::{resolve_states, TableState, TableStates};
use crate::table::{CapacityTier, TableAssignment};

/// The result of one auto-assignment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOutcome {
    /// A table or merged pair was selected for the party.
    Assigned(TableAssignment),
    /// No free table or pair can seat the party.
    Exhausted {
        /// The party's capacity tier, for reporting.
        tier: CapacityTier,
    },
}

impl AssignmentOutcome {
    /// Returns the selected assignment, if any.
    #[must_use]
    pub const fn assignment(&self) -> Option<TableAssignment> {
        match *self {
            Self::Assigned(assignment) => Some(assignment),
            Self::Exhausted { .. } => None,
        }
    }
}

/// Selects a table for a party from the free tables in `states`.
///
/// Single tables are always preferred over merged pairs; a pair is only
/// considered for large parties (5 to 6 covers) when no single free
/// table seats them. Walk-in-only, reserved, occupied, and blocked
/// tables are never candidates.
///
/// # Examples
///
/// ```
/// # use std::collections::BTreeSet;
/// # use chrono::NaiveDate;
/// # use mesa::*;
/// # let t1 = TableId::try_from(1).unwrap();
/// # let catalog = TableCatalog::build(
/// #     vec![Table::new(t1, Capacity::try_from(2).unwrap())],
/// #     vec![],
/// # )
/// # .unwrap();
/// # let room = DiningRoom::new(catalog, Calendar::default(), DefaultBlocks::default(), BTreeSet::new()).unwrap();
/// let snapshot = ServiceSnapshot::new(
///     NaiveDate::from_ymd_opt(2026, 9, 5).unwrap(),
///     Turno::Mediodia,
///     vec![],
///     BlockConfig::empty(),
/// );
/// let states = resolve_states(&room, &snapshot);
///
/// let outcome = auto_assign(&room, &states, PartySize::try_from(2).unwrap());
/// assert_eq!(outcome.assignment(), Some(TableAssignment::Single(t1)));
/// ```
#[must_use]
pub fn auto_assign(
    room: &DiningRoom,
    states: &TableStates,
    party: PartySize,
) -> AssignmentOutcome {
    let covers = party.covers();

    // Exact fit first: smallest adequate capacity, then lowest id.
    // Catalog iteration is ascending by id, and the sort is stable.
    let mut candidates: Vec<_> = room
        .catalog()
        .iter()
        .filter(|t| t.capacity.seats() >= covers)
        .filter(|t| states.state(t.id) == Some(TableState::Free))
        .collect();
    candidates.sort_by_key(|t| t.capacity);

    if let Some(table) = candidates.first() {
        return AssignmentOutcome::Assigned(TableAssignment::Single(table.id));
    }

    // No single table fits: merged pairs are reserved for parties the
    // singles cannot hold (5 and up), so a smaller party never consumes
    // two tables. Pairs are tried in ascending (first, second) order for
    // determinism.
    if party.tier() == CapacityTier::Large {
        let mut pairs: Vec<_> = room
            .catalog()
            .pairs()
            .iter()
            .filter(|p| p.capacity.seats() >= covers)
            .filter(|p| {
                states.state(p.first) == Some(TableState::Free)
                    && states.state(p.second) == Some(TableState::Free)
            })
            .collect();
        pairs.sort_by_key(|p| (p.capacity, p.first, p.second));

        if let Some(pair) = pairs.first() {
            // Normalization cannot fail: catalog pairs are distinct by construction.
            if let Ok(assignment) = TableAssignment::combined(pair.first, pair.second) {
                return AssignmentOutcome::Assigned(assignment);
            }
        }
    }

    AssignmentOutcome::Exhausted { tier: party.tier() }
}

/// One reservation's result within a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlacement {
    /// The reservation considered.
    pub reservation: ReservationId,
    /// What the engine decided for it.
    pub outcome: AssignmentOutcome,
}

/// Assigns every unassigned reservation of the snapshot's service.
///
/// Reservations are processed in slot-time order, ties broken by
/// creation order, and each placement is visible to the next: a table
/// given to the 13:00 party is no longer free for the 13:30 one.
/// Reservations that cannot be placed are reported as exhausted and the
/// run continues; a partial batch is a normal result, not an error.
#[must_use]
pub fn auto_assign_pending(room: &DiningRoom, snapshot: &ServiceSnapshot) -> Vec<BatchPlacement> {
    let mut states = resolve_states(room, snapshot);
    let mut placements = Vec::new();

    for reservation in snapshot.unassigned() {
        let outcome = auto_assign(room, &states, reservation.party_size());
        if let AssignmentOutcome::Assigned(assignment) = outcome {
            states.mark_assigned(&assignment, reservation.id());
        }
        placements.push(BatchPlacement {
            reservation: reservation.id(),
            outcome,
        });
    }

    placements
}
