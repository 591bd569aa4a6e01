//! The table state resolver.
//!
//! Derives, for every table in the catalog, one of five mutually
//! exclusive states for a single `(date, turno)` service. States are
//! never persisted; they are always recomputed from the reservation set
//! and block configuration, so they cannot drift out of sync with their
//! sources.
//!
//! Precedence, highest first: reservation/check-in, out-of-service,
//! manual block, exception, default block, free. A seated party always
//! shows `Occupied` even on a table the admin later blocked; a manual
//! block always beats an exception because it is the most recent admin
//! intent.

use std::collections::BTreeMap;
use std::fmt;

use crate::reservation::{CheckInState, ReservationId};
use crate::room::DiningRoom;
use crate::snapshot::ServiceSnapshot;
use crate::table::TableId;

/// The resolved state of one table for one service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableState {
    /// Open for reservations.
    Free,
    /// Held for walk-ins; reservable only through an explicit admin
    /// override.
    WalkInOnly,
    /// Assigned to a reservation whose party has not arrived.
    Reserved,
    /// Assigned to a reservation whose party is seated.
    Occupied,
    /// Out of service; never assignable.
    Blocked,
}

impl TableState {
    /// Returns `true` if the table counts toward reservable capacity.
    #[must_use]
    pub const fn is_reservable(self) -> bool {
        matches!(self, Self::Free)
    }
}

impl fmt::Display for TableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => write!(f, "free"),
            Self::WalkInOnly => write!(f, "free-walk-in-only"),
            Self::Reserved => write!(f, "reserved"),
            Self::Occupied => write!(f, "occupied"),
            Self::Blocked => write!(f, "blocked"),
        }
    }
}

/// The resolver's output: per-table states plus the occupant lookup.
///
/// Warnings carry input inconsistencies (a reservation naming an unknown
/// table, or two reservations claiming the same table); a bad record is
/// flagged and skipped, it never poisons the rest of the computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStates {
    states: BTreeMap<TableId, TableState>,
    occupants: BTreeMap<TableId, ReservationId>,
    warnings: Vec<String>,
}

impl TableStates {
    /// Returns the state of a table, or `None` for ids outside the catalog.
    #[must_use]
    pub fn state(&self, id: TableId) -> Option<TableState> {
        self.states.get(&id).copied()
    }

    /// Returns the reservation holding a `Reserved`/`Occupied` table.
    #[must_use]
    pub fn occupant(&self, id: TableId) -> Option<ReservationId> {
        self.occupants.get(&id).copied()
    }

    /// Iterates over `(table, state)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (TableId, TableState)> + '_ {
        self.states.iter().map(|(id, state)| (*id, *state))
    }

    /// Input inconsistencies found while resolving.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Marks the members of an assignment as reserved by a reservation.
    ///
    /// Used by batch assignment to advance an in-memory snapshot between
    /// placements; unknown ids are ignored.
    pub fn mark_assigned(&mut self, assignment: &crate::table::TableAssignment, id: ReservationId) {
        for member in assignment.members() {
            if let Some(state) = self.states.get_mut(&member) {
                *state = TableState::Reserved;
                self.occupants.insert(member, id);
            }
        }
    }
}

/// Resolves the state of every catalog table for one service snapshot.
///
/// Pure: identical inputs always produce identical output.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use chrono::NaiveDate;
/// use mesa::{
///     BlockConfig, Calendar, Capacity, DefaultBlocks, DiningRoom, ServiceSnapshot, Table,
///     TableCatalog, TableId, TableState, Turno, resolve_states,
/// };
///
/// let t1 = TableId::try_from(1).unwrap();
/// let catalog = TableCatalog::build(
///     vec![Table::new(t1, Capacity::try_from(2).unwrap())],
///     vec![],
/// )
/// .unwrap();
/// let room = DiningRoom::new(
///     catalog,
///     Calendar::default(),
///     DefaultBlocks::default(),
///     BTreeSet::new(),
/// )
/// .unwrap();
///
/// let snapshot = ServiceSnapshot::new(
///     NaiveDate::from_ymd_opt(2026, 9, 5).unwrap(),
///     Turno::Mediodia,
///     vec![],
///     BlockConfig::empty(),
/// );
///
/// let states = resolve_states(&room, &snapshot);
/// assert_eq!(states.state(t1), Some(TableState::Free));
/// ```
#[must_use]
pub fn resolve_states(room: &DiningRoom, snapshot: &ServiceSnapshot) -> TableStates {
    let blocks = snapshot.blocks();
    let mut states: BTreeMap<TableId, TableState> = BTreeMap::new();
    let mut occupants: BTreeMap<TableId, ReservationId> = BTreeMap::new();
    let mut warnings: Vec<String> = Vec::new();

    // Every catalog table starts free.
    for table in room.catalog().iter() {
        states.insert(table.id, TableState::Free);
    }

    // Default walk-in lists, unless excepted for this service.
    for id in room.defaults().for_turno(snapshot.turno()) {
        if !blocks.exceptions().contains(id) {
            states.insert(*id, TableState::WalkInOnly);
        }
    }

    // Manual blocks beat exceptions: the most recent admin intent wins.
    for id in blocks.manual() {
        if states.contains_key(id) {
            states.insert(*id, TableState::WalkInOnly);
        } else {
            warnings.push(format!("manual block for unknown table {id} ignored"));
        }
    }

    // Out-of-service tables are never assignable.
    for id in room.out_of_service() {
        states.insert(*id, TableState::Blocked);
    }

    // Reservations and check-ins override everything else.
    for reservation in snapshot.reservations() {
        let Some(assignment) = reservation.assigned_table() else {
            continue;
        };
        let target = match reservation.check_in() {
            CheckInState::Arrived => TableState::Occupied,
            CheckInState::None => TableState::Reserved,
        };
        for member in assignment.members() {
            if !states.contains_key(&member) {
                warnings.push(format!(
                    "reservation {} references table {member} not in the catalog",
                    reservation.id()
                ));
                continue;
            }
            if let Some(holder) = occupants.get(&member) {
                if *holder != reservation.id() {
                    warnings.push(format!(
                        "reservations {holder} and {} both claim table {member}; keeping {holder}",
                        reservation.id()
                    ));
                    continue;
                }
            }
            occupants.insert(member, reservation.id());
            states.insert(member, target);
        }
    }

    TableStates {
        states,
        occupants,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;

    use super::*;
    use crate::blocks::{BlockConfig, DefaultBlocks};
    use crate::catalog::fixtures::id;
    use crate::reservation::{PartySize, Reservation, SlotTime, Turno};
    use crate::room::fixtures::{room, room_with};
    use crate::table::TableAssignment;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 5).unwrap()
    }

    fn reservation(rid: i64, table: &str, arrived: bool) -> Reservation {
        let builder = Reservation::builder(
            ReservationId::new(rid),
            date(),
            Turno::Mediodia,
            "13:00".parse::<SlotTime>().unwrap(),
            PartySize::try_from(2).unwrap(),
        )
        .client("client")
        .assigned_table(Some(table.parse::<TableAssignment>().unwrap()));
        let builder = if arrived {
            builder.check_in(crate::reservation::CheckInState::Arrived)
        } else {
            builder
        };
        builder.build().unwrap()
    }

    fn snapshot(reservations: Vec<Reservation>, blocks: BlockConfig) -> ServiceSnapshot {
        ServiceSnapshot::new(date(), Turno::Mediodia, reservations, blocks)
    }

    fn defaults(tables: &[u32]) -> DefaultBlocks {
        DefaultBlocks {
            mediodia: tables.iter().map(|n| id(*n)).collect(),
            noche: BTreeSet::new(),
        }
    }

    #[test]
    fn test_all_free_with_no_inputs() {
        let states = resolve_states(&room(), &snapshot(vec![], BlockConfig::empty()));
        for (_, state) in states.iter() {
            assert_eq!(state, TableState::Free);
        }
        assert!(states.warnings().is_empty());
    }

    #[test]
    fn test_default_block_marks_walk_in_only() {
        let room = room_with(defaults(&[4]), BTreeSet::new());
        let states = resolve_states(&room, &snapshot(vec![], BlockConfig::empty()));
        assert_eq!(states.state(id(4)), Some(TableState::WalkInOnly));
        assert_eq!(states.state(id(5)), Some(TableState::Free));
    }

    #[test]
    fn test_exception_reopens_default_block() {
        let room = room_with(defaults(&[4]), BTreeSet::new());
        let mut blocks = BlockConfig::empty();
        blocks.except(id(4));
        let states = resolve_states(&room, &snapshot(vec![], blocks));
        assert_eq!(states.state(id(4)), Some(TableState::Free));
    }

    #[test]
    fn test_manual_block_beats_exception() {
        // A table can't be in both sets at once, but a manual block for a
        // defaulted table must win over an exception for a different one.
        let room = room_with(defaults(&[4]), BTreeSet::new());
        let mut blocks = BlockConfig::empty();
        blocks.except(id(4));
        blocks.block(id(4));
        let states = resolve_states(&room, &snapshot(vec![], blocks));
        assert_eq!(states.state(id(4)), Some(TableState::WalkInOnly));
    }

    #[test]
    fn test_manual_block_on_free_table() {
        let mut blocks = BlockConfig::empty();
        blocks.block(id(6));
        let states = resolve_states(&room(), &snapshot(vec![], blocks));
        assert_eq!(states.state(id(6)), Some(TableState::WalkInOnly));
    }

    #[test]
    fn test_reservation_marks_reserved_with_occupant() {
        let states = resolve_states(
            &room(),
            &snapshot(vec![reservation(1, "5", false)], BlockConfig::empty()),
        );
        assert_eq!(states.state(id(5)), Some(TableState::Reserved));
        assert_eq!(states.occupant(id(5)), Some(ReservationId::new(1)));
    }

    #[test]
    fn test_check_in_supersedes_reserved() {
        let states = resolve_states(
            &room(),
            &snapshot(vec![reservation(1, "5", true)], BlockConfig::empty()),
        );
        assert_eq!(states.state(id(5)), Some(TableState::Occupied));
    }

    #[test]
    fn test_composite_assignment_marks_both_halves() {
        let states = resolve_states(
            &room(),
            &snapshot(vec![reservation(1, "2+3", false)], BlockConfig::empty()),
        );
        assert_eq!(states.state(id(2)), Some(TableState::Reserved));
        assert_eq!(states.state(id(3)), Some(TableState::Reserved));
        assert_eq!(states.occupant(id(2)), Some(ReservationId::new(1)));
        assert_eq!(states.occupant(id(3)), Some(ReservationId::new(1)));
    }

    #[test]
    fn test_reservation_beats_manual_block() {
        let mut blocks = BlockConfig::empty();
        blocks.block(id(5));
        let states = resolve_states(&room(), &snapshot(vec![reservation(1, "5", false)], blocks));
        assert_eq!(states.state(id(5)), Some(TableState::Reserved));
    }

    #[test]
    fn test_reservation_beats_default_block_and_exception() {
        let room = room_with(defaults(&[2]), BTreeSet::new());
        let mut blocks = BlockConfig::empty();
        blocks.except(id(2));
        let states = resolve_states(&room, &snapshot(vec![reservation(1, "2", false)], blocks));
        assert_eq!(states.state(id(2)), Some(TableState::Reserved));
    }

    #[test]
    fn test_out_of_service_is_blocked() {
        let room = room_with(DefaultBlocks::default(), [id(8)].into_iter().collect());
        let states = resolve_states(&room, &snapshot(vec![], BlockConfig::empty()));
        assert_eq!(states.state(id(8)), Some(TableState::Blocked));
    }

    #[test]
    fn test_out_of_service_beats_manual_block() {
        let room = room_with(DefaultBlocks::default(), [id(8)].into_iter().collect());
        let mut blocks = BlockConfig::empty();
        blocks.block(id(8));
        let states = resolve_states(&room, &snapshot(vec![], blocks));
        assert_eq!(states.state(id(8)), Some(TableState::Blocked));
    }

    #[test]
    fn test_seated_party_beats_out_of_service() {
        let room = room_with(DefaultBlocks::default(), [id(8)].into_iter().collect());
        let states = resolve_states(
            &room,
            &snapshot(vec![reservation(1, "8", true)], BlockConfig::empty()),
        );
        assert_eq!(states.state(id(8)), Some(TableState::Occupied));
    }

    #[test]
    fn test_unknown_table_is_flagged_not_fatal() {
        let states = resolve_states(
            &room(),
            &snapshot(
                vec![reservation(1, "42", false), reservation(2, "5", false)],
                BlockConfig::empty(),
            ),
        );
        assert_eq!(states.warnings().len(), 1);
        assert!(states.warnings()[0].contains("42"));
        // The valid reservation still resolves.
        assert_eq!(states.state(id(5)), Some(TableState::Reserved));
        assert_eq!(states.state(id(42)), None);
    }

    #[test]
    fn test_double_claim_keeps_first_and_warns() {
        let states = resolve_states(
            &room(),
            &snapshot(
                vec![reservation(1, "5", false), reservation(2, "5", false)],
                BlockConfig::empty(),
            ),
        );
        assert_eq!(states.occupant(id(5)), Some(ReservationId::new(1)));
        assert_eq!(states.warnings().len(), 1);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let room = room_with(defaults(&[2, 4]), [id(8)].into_iter().collect());
        let mut blocks = BlockConfig::empty();
        blocks.except(id(2));
        blocks.block(id(6));
        let snap = snapshot(
            vec![reservation(1, "5", false), reservation(2, "2+3", true)],
            blocks,
        );

        let first = resolve_states(&room, &snap);
        let second = resolve_states(&room, &snap);
        assert_eq!(first, second);
    }

    #[test]
    fn test_mark_assigned_advances_state() {
        let mut states = resolve_states(&room(), &snapshot(vec![], BlockConfig::empty()));
        let pair: TableAssignment = "2+3".parse().unwrap();
        states.mark_assigned(&pair, ReservationId::new(9));
        assert_eq!(states.state(id(2)), Some(TableState::Reserved));
        assert_eq!(states.state(id(3)), Some(TableState::Reserved));
        assert_eq!(states.occupant(id(3)), Some(ReservationId::new(9)));
    }
}
