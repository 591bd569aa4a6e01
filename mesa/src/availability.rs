//! The slot availability calculator.
//!
//! Decides which clock slots can still accept a booking of a given party
//! size. Capacity is deliberately accounted at the turn level, not per
//! slot: two reservations at different times within the same turn compete
//! for the same tier capacity. The waiting-list fallback depends on this
//! all-or-nothing semantics, so it must not be "fixed" into a per-slot
//! queue.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

use crate::reservation::{PartySize, SlotTime};
use crate::room::DiningRoom;
use crate::snapshot::ServiceSnapshot;
use crate::state::{resolve_states, TableState};
use crate::table::{CapacityTier, TableId};

/// Why no slot can be offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosedReason {
    /// The restaurant does not serve this date/turno at all.
    NotServing,
    /// The party's capacity tier has no spare turn-level capacity.
    TierFull {
        /// The tier that is fully booked.
        tier: CapacityTier,
    },
}

impl fmt::Display for ClosedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotServing => write!(f, "the restaurant is closed for this service"),
            Self::TierFull { tier } => {
                write!(f, "no {tier} tables left for this turn")
            }
        }
    }
}

/// The calculator's result: bookable slots, or a concrete reason why not.
///
/// When the turn has capacity for the party's tier, *all* of the turn's
/// fixed slots are offered; the booking model fills a turn, not a
/// quarter-hour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// The turn can take the party at any of these slots.
    Open {
        /// The turn's fixed slot list, ascending.
        slots: Vec<SlotTime>,
    },
    /// No slot can be offered.
    Closed {
        /// The concrete reason, suitable for showing to a client or admin.
        reason: ClosedReason,
    },
}

impl Availability {
    /// Returns `true` if at least one slot is bookable.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    /// Returns the bookable slots (empty when closed).
    #[must_use]
    pub fn slots(&self) -> &[SlotTime] {
        match self {
            Self::Open { slots } => slots,
            Self::Closed { .. } => &[],
        }
    }
}

/// Per-tier reservable supply for one resolved service.
///
/// Only `free` tables count; walk-in-only and blocked tables do not.
/// A fully-free combinable pair adds one unit at the merged capacity's
/// tier, with each table counted into at most one pair.
#[must_use]
pub fn tier_supply(
    room: &DiningRoom,
    states: &crate::state::TableStates,
) -> BTreeMap<CapacityTier, u32> {
    let mut supply: BTreeMap<CapacityTier, u32> = BTreeMap::new();
    for tier in CapacityTier::ALL {
        supply.insert(tier, 0);
    }

    for table in room.catalog().iter() {
        if states.state(table.id) == Some(TableState::Free) {
            *supply.entry(table.capacity.tier()).or_default() += 1;
        }
    }

    let mut paired: BTreeSet<TableId> = BTreeSet::new();
    for pair in room.catalog().pairs() {
        if paired.contains(&pair.first) || paired.contains(&pair.second) {
            continue;
        }
        let both_free = states.state(pair.first) == Some(TableState::Free)
            && states.state(pair.second) == Some(TableState::Free);
        if both_free {
            *supply.entry(pair.capacity.tier()).or_default() += 1;
            paired.insert(pair.first);
            paired.insert(pair.second);
        }
    }

    supply
}

/// Per-tier demand: reservations still waiting for a table, counted by
/// party size.
///
/// Assigned reservations already consume supply (their tables are not
/// free), so only unassigned ones count here; counting both sides would
/// charge a seated party twice.
#[must_use]
pub fn tier_demand(snapshot: &ServiceSnapshot) -> BTreeMap<CapacityTier, u32> {
    let mut demand: BTreeMap<CapacityTier, u32> = BTreeMap::new();
    for tier in CapacityTier::ALL {
        demand.insert(tier, 0);
    }
    for reservation in snapshot.reservations() {
        if reservation.assigned_table().is_none() {
            *demand.entry(reservation.party_size().tier()).or_default() += 1;
        }
    }
    demand
}

/// Computes the bookable slots for a party on the snapshot's service.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use mesa::{available_slots, BlockConfig, PartySize, ServiceSnapshot, Turno};
///
/// # fn room() -> mesa::DiningRoom {
/// #     use std::collections::BTreeSet;
/// #     use mesa::*;
/// #     let catalog = TableCatalog::build(
/// #         vec![Table::new(TableId::try_from(1).unwrap(), Capacity::try_from(2).unwrap())],
/// #         vec![],
/// #     )
/// #     .unwrap();
/// #     DiningRoom::new(catalog, Calendar::default(), DefaultBlocks::default(), BTreeSet::new())
/// #         .unwrap()
/// # }
/// let snapshot = ServiceSnapshot::new(
///     NaiveDate::from_ymd_opt(2026, 9, 5).unwrap(), // a Saturday
///     Turno::Mediodia,
///     vec![],
///     BlockConfig::empty(),
/// );
///
/// let availability = available_slots(&room(), &snapshot, PartySize::try_from(2).unwrap());
/// assert!(availability.is_open());
/// assert_eq!(availability.slots().len(), 5);
/// ```
#[must_use]
pub fn available_slots(
    room: &DiningRoom,
    snapshot: &ServiceSnapshot,
    party: PartySize,
) -> Availability {
    if !room.calendar().is_open(snapshot.date(), snapshot.turno()) {
        return Availability::Closed {
            reason: ClosedReason::NotServing,
        };
    }

    let states = resolve_states(room, snapshot);
    let supply = tier_supply(room, &states);
    let demand = tier_demand(snapshot);

    let tier = party.tier();
    let open = demand.get(&tier).copied().unwrap_or(0) < supply.get(&tier).copied().unwrap_or(0);

    if open {
        Availability::Open {
            slots: room.calendar().slots(snapshot.turno()).to_vec(),
        }
    } else {
        Availability::Closed {
            reason: ClosedReason::TierFull { tier },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;

    use super::*;
    use crate::blocks::{BlockConfig, DefaultBlocks};
    use crate::catalog::fixtures::id;
    use crate::reservation::{Reservation, ReservationId, Turno};
    use crate::room::fixtures::{room, room_with};

    fn saturday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 5).unwrap()
    }

    fn party(covers: u8) -> PartySize {
        PartySize::try_from(covers).unwrap()
    }

    fn reservation(rid: i64, covers: u8, table: Option<&str>) -> Reservation {
        Reservation::builder(
            ReservationId::new(rid),
            saturday(),
            Turno::Mediodia,
            "13:00".parse().unwrap(),
            party(covers),
        )
        .client("client")
        .assigned_table(table.map(|t| t.parse().unwrap()))
        .build()
        .unwrap()
    }

    fn snapshot(reservations: Vec<Reservation>) -> ServiceSnapshot {
        ServiceSnapshot::new(saturday(), Turno::Mediodia, reservations, BlockConfig::empty())
    }

    #[test]
    fn test_closed_day_returns_not_serving() {
        let monday = NaiveDate::from_ymd_opt(2026, 9, 7).unwrap();
        let snap = ServiceSnapshot::new(monday, Turno::Mediodia, vec![], BlockConfig::empty());
        let availability = available_slots(&room(), &snap, party(2));
        assert_eq!(
            availability,
            Availability::Closed {
                reason: ClosedReason::NotServing
            }
        );
        assert!(availability.slots().is_empty());
    }

    #[test]
    fn test_sunday_noche_returns_not_serving() {
        let sunday = NaiveDate::from_ymd_opt(2026, 9, 6).unwrap();
        let snap = ServiceSnapshot::new(sunday, Turno::Noche, vec![], BlockConfig::empty());
        let availability = available_slots(&room(), &snap, party(2));
        assert!(!availability.is_open());
    }

    #[test]
    fn test_open_turn_offers_all_slots() {
        let availability = available_slots(&room(), &snapshot(vec![]), party(4));
        assert!(availability.is_open());
        assert_eq!(availability.slots().len(), 5);
    }

    #[test]
    fn test_medium_tier_full_closes_despite_other_tiers() {
        // Scenario: four 4-seat tables, four medium reservations already
        // booked; a fifth party of 4 finds the medium tier full even
        // though small and large tiers still have room.
        let reservations = (1..=4).map(|n| reservation(n, 4, None)).collect();
        let availability = available_slots(&room(), &snapshot(reservations), party(4));
        assert_eq!(
            availability,
            Availability::Closed {
                reason: ClosedReason::TierFull {
                    tier: CapacityTier::Medium
                }
            }
        );

        // Small and large parties still book fine.
        let reservations: Vec<Reservation> = (1..=4).map(|n| reservation(n, 4, None)).collect();
        assert!(available_slots(&room(), &snapshot(reservations.clone()), party(2)).is_open());
        assert!(available_slots(&room(), &snapshot(reservations), party(6)).is_open());
    }

    #[test]
    fn test_unassigned_reservations_consume_their_tier() {
        let reservations = vec![reservation(1, 6, None)];
        let supply_demand = tier_demand(&snapshot(reservations));
        assert_eq!(supply_demand.get(&CapacityTier::Large), Some(&1));
    }

    #[test]
    fn test_seated_parties_are_not_counted_twice() {
        // Two seated medium parties leave two free four-seaters: the turn
        // stays open for a third medium party.
        let reservations = vec![reservation(1, 4, Some("5")), reservation(2, 4, Some("6"))];
        let snap = snapshot(reservations);
        assert_eq!(tier_demand(&snap).get(&CapacityTier::Medium), Some(&0));
        assert!(available_slots(&room(), &snap, party(4)).is_open());

        // The tier closes only when all four are taken.
        let reservations = (1..=4)
            .map(|n| reservation(n, 4, Some(&(n + 4).to_string())))
            .collect();
        let availability = available_slots(&room(), &snapshot(reservations), party(4));
        assert_eq!(
            availability,
            Availability::Closed {
                reason: ClosedReason::TierFull {
                    tier: CapacityTier::Medium
                }
            }
        );
    }

    #[test]
    fn test_walk_in_only_tables_do_not_count_as_supply() {
        // All four small tables defaulted to walk-in-only: no small supply,
        // and the 2+3 pair bonus disappears with them.
        let defaults = DefaultBlocks {
            mediodia: [id(1), id(2), id(3), id(4)].into_iter().collect(),
            noche: BTreeSet::new(),
        };
        let room = room_with(defaults, BTreeSet::new());
        let availability = available_slots(&room, &snapshot(vec![]), party(2));
        assert_eq!(
            availability,
            Availability::Closed {
                reason: ClosedReason::TierFull {
                    tier: CapacityTier::Small
                }
            }
        );
    }

    #[test]
    fn test_free_pair_adds_one_large_unit() {
        let states = resolve_states(&room(), &snapshot(vec![]));
        let supply = tier_supply(&room(), &states);
        // Table 9 plus the free 2+3 pair.
        assert_eq!(supply.get(&CapacityTier::Large), Some(&2));
    }

    #[test]
    fn test_pair_bonus_lost_when_half_is_taken() {
        let snap = snapshot(vec![reservation(1, 2, Some("3"))]);
        let states = resolve_states(&room(), &snap);
        let supply = tier_supply(&room(), &states);
        assert_eq!(supply.get(&CapacityTier::Large), Some(&1));
    }

    #[test]
    fn test_large_tier_closes_when_table_and_pair_consumed() {
        // Table 9 reserved by one large party, pair half taken: a second
        // large party has nowhere to go.
        let reservations = vec![reservation(1, 6, Some("9")), reservation(2, 2, Some("2"))];
        let availability = available_slots(&room(), &snapshot(reservations), party(5));
        assert_eq!(
            availability,
            Availability::Closed {
                reason: ClosedReason::TierFull {
                    tier: CapacityTier::Large
                }
            }
        );
    }

    #[test]
    fn test_adding_a_reservation_never_opens_capacity() {
        // Capacity monotonicity, spot-checked across tiers.
        for covers in [2u8, 4, 6] {
            let before = available_slots(&room(), &snapshot(vec![]), party(covers));
            let after = available_slots(
                &room(),
                &snapshot(vec![reservation(1, covers, None)]),
                party(covers),
            );
            assert!(before.slots().len() >= after.slots().len());
        }
    }
}
