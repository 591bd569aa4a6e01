//! Property tests for the allocation invariants. Run with
//! `--features property-tests`.

#![cfg(feature = "property-tests")]

mod common;

use chrono::NaiveDate;
use proptest::prelude::*;

use common::default_room;

use mesa::{
    auto_assign, auto_assign_pending, available_slots, resolve_states, AssignmentOutcome,
    Availability, BlockConfig, PartySize, Reservation, ReservationId, ServiceSnapshot, TableState,
    Turno,
};

fn saturday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, 5).unwrap()
}

fn arb_party() -> impl Strategy<Value = PartySize> {
    (1u8..=6).prop_map(|n| PartySize::try_from(n).unwrap())
}

/// A service with up to eight unassigned parties of arbitrary sizes.
fn arb_snapshot() -> impl Strategy<Value = ServiceSnapshot> {
    proptest::collection::vec(arb_party(), 0..8).prop_map(|parties| {
        let reservations = parties
            .into_iter()
            .enumerate()
            .map(|(i, party)| {
                Reservation::builder(
                    ReservationId::new(i as i64 + 1),
                    saturday(),
                    Turno::Mediodia,
                    "13:00".parse().unwrap(),
                    party,
                )
                .client("client")
                .build()
                .unwrap()
            })
            .collect();
        ServiceSnapshot::new(saturday(), Turno::Mediodia, reservations, BlockConfig::empty())
    })
}

proptest! {
    /// The auto-assigner only ever hands out free units that fit.
    #[test]
    fn assigned_units_are_free_and_large_enough(snapshot in arb_snapshot(), party in arb_party()) {
        let room = default_room();
        let states = resolve_states(&room, &snapshot);
        if let AssignmentOutcome::Assigned(assignment) = auto_assign(&room, &states, party) {
            let mut seats = 0u8;
            for member in assignment.members() {
                prop_assert_eq!(states.state(member), Some(TableState::Free));
                seats += room.catalog().get(member).unwrap().capacity.seats();
            }
            prop_assert!(seats >= party.covers());
        }
    }

    /// The batch pass never promises the same table twice.
    #[test]
    fn batch_placements_never_overlap(snapshot in arb_snapshot()) {
        let room = default_room();
        let placements = auto_assign_pending(&room, &snapshot);
        let assigned: Vec<_> = placements
            .iter()
            .filter_map(|p| p.outcome.assignment())
            .collect();
        for (i, a) in assigned.iter().enumerate() {
            for b in &assigned[i + 1..] {
                prop_assert!(!a.overlaps(b));
            }
        }
    }

    /// Resolving the same snapshot twice yields the same floor picture.
    #[test]
    fn state_resolution_is_idempotent(snapshot in arb_snapshot()) {
        let room = default_room();
        let first = resolve_states(&room, &snapshot);
        let second = resolve_states(&room, &snapshot);
        prop_assert_eq!(
            first.iter().collect::<Vec<_>>(),
            second.iter().collect::<Vec<_>>()
        );
        prop_assert_eq!(first.warnings(), second.warnings());
    }

    /// Availability never opens for a larger crowd of the same tier than
    /// it refused: adding one more same-tier party keeps a closed tier
    /// closed.
    #[test]
    fn availability_is_monotone_in_demand(snapshot in arb_snapshot(), party in arb_party()) {
        let room = default_room();
        if available_slots(&room, &snapshot, party).is_open() {
            return Ok(());
        }

        let mut reservations: Vec<_> = snapshot.reservations().to_vec();
        let next_id = reservations.len() as i64 + 1;
        reservations.push(
            Reservation::builder(
                ReservationId::new(next_id),
                saturday(),
                Turno::Mediodia,
                "13:00".parse().unwrap(),
                party,
            )
            .client("client")
            .build()
            .unwrap(),
        );
        let bigger = ServiceSnapshot::new(
            saturday(),
            Turno::Mediodia,
            reservations,
            BlockConfig::empty(),
        );
        let still_closed = matches!(
            available_slots(&room, &bigger, party),
            Availability::Closed { .. }
        );
        prop_assert!(still_closed);
    }
}
