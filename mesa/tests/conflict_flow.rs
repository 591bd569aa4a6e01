//! Forced reassignment, check-in, and block edits through the executor.

mod common;

use common::{covers, default_room, lunch, open_store, saturday};

use mesa::operations::{
    plan_assign, plan_auto_assign_pending, plan_cancel, plan_check_in, plan_save_blocks,
    AssignRequest, PlanExecutor,
};
use mesa::store::NewReservation;
use mesa::table::TableId;
use mesa::{resolve_states, Error, TableState};

fn new_reservation(n: u8, client: &str, table: Option<&str>) -> NewReservation {
    NewReservation {
        date: saturday(),
        turno: lunch(),
        time: "13:00".parse().unwrap(),
        party_size: covers(n),
        client: client.into(),
        assignment: table.map(|t| t.parse().unwrap()),
    }
}

#[test]
fn force_reassign_moves_both_parties_atomically() {
    let room = default_room();
    let (mut store, _dir) = open_store();

    let sitting = store
        .create_reservation(&new_reservation(4, "Ana", Some("5")))
        .unwrap();
    let incoming = store
        .create_reservation(&new_reservation(4, "Bea", None))
        .unwrap();

    let snapshot = store.load_snapshot(saturday(), lunch()).unwrap();
    let request = AssignRequest {
        reservation: incoming.id(),
        assignment: "5".parse().unwrap(),
        confirm_walk_in: false,
        force: false,
    };

    // Without force the occupant is surfaced.
    assert!(matches!(
        plan_assign(&room, &snapshot, &request),
        Err(Error::TableConflict { occupant, .. }) if occupant == sitting.id()
    ));

    let forced = AssignRequest { force: true, ..request };
    let plan = plan_assign(&room, &snapshot, &forced).unwrap();
    PlanExecutor::new(&mut store).execute(&plan).unwrap();

    let after = store.load_snapshot(saturday(), lunch()).unwrap();
    assert_eq!(
        after.reservation(incoming.id()).unwrap().assigned_table(),
        Some("5".parse().unwrap())
    );
    assert_eq!(
        after.reservation(sitting.id()).unwrap().assigned_table(),
        Some("6".parse().unwrap())
    );
}

#[test]
fn seated_parties_are_never_displaced() {
    let room = default_room();
    let (mut store, _dir) = open_store();

    let seated = store
        .create_reservation(&new_reservation(4, "Ana", Some("5")))
        .unwrap();
    let snapshot = store.load_snapshot(saturday(), lunch()).unwrap();
    let plan = plan_check_in(&snapshot, seated.id()).unwrap();
    PlanExecutor::new(&mut store).execute(&plan).unwrap();

    let incoming = store
        .create_reservation(&new_reservation(4, "Bea", None))
        .unwrap();
    let snapshot = store.load_snapshot(saturday(), lunch()).unwrap();
    let request = AssignRequest {
        reservation: incoming.id(),
        assignment: "5".parse().unwrap(),
        confirm_walk_in: false,
        force: true,
    };
    assert!(matches!(
        plan_assign(&room, &snapshot, &request),
        Err(Error::TableUnavailable {
            state: TableState::Occupied,
            ..
        })
    ));
}

#[test]
fn cancellation_frees_the_table_for_the_batch_pass() {
    let room = default_room();
    let (mut store, _dir) = open_store();

    for name in ["a", "b", "c", "d"] {
        store
            .create_reservation(&new_reservation(4, name, None))
            .unwrap();
    }
    let first = store
        .create_reservation(&new_reservation(4, "gone", Some("5")))
        .unwrap();

    let snapshot = store.load_snapshot(saturday(), lunch()).unwrap();
    let plan = plan_cancel(&snapshot, first.id()).unwrap();
    PlanExecutor::new(&mut store).execute(&plan).unwrap();

    let snapshot = store.load_snapshot(saturday(), lunch()).unwrap();
    let plan = plan_auto_assign_pending(&room, &snapshot);
    assert_eq!(plan.actions.len(), 4);
    assert!(plan.warnings.is_empty());
    PlanExecutor::new(&mut store).execute(&plan).unwrap();

    let after = store.load_snapshot(saturday(), lunch()).unwrap();
    assert!(after.unassigned().next().is_none());
}

#[test]
fn concurrent_block_edits_are_detected() {
    let (mut store, _dir) = open_store();

    let loaded = store.load_blocks(saturday(), lunch()).unwrap();
    let table = TableId::try_from(4).unwrap();

    // Two terminals edit from the same loaded version.
    let mut first = loaded.clone();
    first.block(table);
    let mut second = loaded;
    second.block(TableId::try_from(1).unwrap());

    let plan = plan_save_blocks(saturday(), lunch(), first);
    PlanExecutor::new(&mut store).execute(&plan).unwrap();

    let plan = plan_save_blocks(saturday(), lunch(), second);
    let result = PlanExecutor::new(&mut store).execute(&plan);
    assert!(matches!(result, Err(Error::StalePrecondition { .. })));

    // The first edit survived and shows up in state resolution.
    let room = default_room();
    let snapshot = store.load_snapshot(saturday(), lunch()).unwrap();
    let states = resolve_states(&room, &snapshot);
    assert_eq!(states.state(table), Some(TableState::WalkInOnly));
}
