//! Plan execution engine.
//!
//! The executor applies an operation plan to the store inside a single
//! transaction: either every action lands or none does. The table-holds
//! constraint re-validates assignments at write time, so a plan computed
//! from a snapshot that has since changed fails with a stale-precondition
//! error instead of double-booking a table.

use rusqlite::TransactionBehavior;

use crate::error::Result;
use crate::reservation::ReservationId;
use crate::store::{self, Store};
use crate::waitlist::WaitingEntryId;

use super::plan::{OperationPlan, PlanAction};

/// Result of executing a plan.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Whether the execution was successful.
    pub success: bool,

    /// Whether this was a dry-run (no actual changes made).
    pub dry_run: bool,

    /// Descriptions of actions that were taken (or would be taken in
    /// dry-run).
    pub actions_taken: Vec<String>,

    /// Warnings from the plan.
    pub warnings: Vec<String>,

    /// The reservation created by the plan, if any.
    pub reservation: Option<ReservationId>,

    /// The waiting-list entry created by the plan, if any.
    pub waiting_entry: Option<WaitingEntryId>,
}

impl ExecutionResult {
    fn from_plan(plan: &OperationPlan, dry_run: bool) -> Self {
        Self {
            success: true,
            dry_run,
            actions_taken: plan.actions.iter().map(PlanAction::description).collect(),
            warnings: plan.warnings.clone(),
            reservation: None,
            waiting_entry: None,
        }
    }
}

/// Executes operation plans against the store.
///
/// The executor can run in normal mode (applying changes) or dry-run
/// mode (describing without changes).
///
/// # Examples
///
/// ```no_run
/// use mesa::operations::{OperationPlan, PlanExecutor};
/// use mesa::store::{Store, StoreConfig};
///
/// let mut store = Store::open(StoreConfig::new("/tmp/mesa.db")).unwrap();
/// let plan = OperationPlan::new("No-op");
///
/// let mut executor = PlanExecutor::new(&mut store).dry_run();
/// let result = executor.execute(&plan).unwrap();
/// assert!(result.dry_run);
/// ```
pub struct PlanExecutor<'a> {
    store: &'a mut Store,
    dry_run: bool,
}

impl<'a> PlanExecutor<'a> {
    /// Creates a new plan executor.
    #[must_use]
    pub fn new(store: &'a mut Store) -> Self {
        Self {
            store,
            dry_run: false,
        }
    }

    /// Sets the executor to dry-run mode: the plan is described but the
    /// store is not touched.
    #[must_use]
    pub const fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Executes the given plan atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if any action fails; in that case the whole
    /// transaction is rolled back and the store is unchanged.
    pub fn execute(&mut self, plan: &OperationPlan) -> Result<ExecutionResult> {
        let mut result = ExecutionResult::from_plan(plan, self.dry_run);
        if self.dry_run {
            return Ok(result);
        }

        log::debug!(
            "Executing plan '{}' ({} actions)",
            plan.description,
            plan.actions.len()
        );

        // The timeout is read up front: once `connection_mut` borrows the
        // store, no other access to it is possible until commit.
        let busy_timeout = self.store.busy_timeout();
        let tx = self
            .store
            .connection_mut()
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|err| store::lock_error(err, busy_timeout))?;

        for action in &plan.actions {
            match action {
                PlanAction::CreateReservation(new) => {
                    let id = ReservationId::new(store::insert_reservation_row(&tx, new)?);
                    if let Some(assignment) = new.assignment {
                        store::insert_holds(&tx, new.date, new.turno, &assignment, id)?;
                    }
                    result.reservation = Some(id);
                }
                PlanAction::AssignTable {
                    date,
                    turno,
                    reservation,
                    assignment,
                } => {
                    store::clear_holds(&tx, *reservation)?;
                    store::insert_holds(&tx, *date, *turno, assignment, *reservation)?;
                    store::update_assignment_row(&tx, *reservation, Some(assignment))?;
                }
                PlanAction::SetCheckIn { reservation, state } => {
                    store::update_check_in_row(&tx, *reservation, *state)?;
                }
                PlanAction::CancelReservation { reservation } => {
                    store::clear_holds(&tx, *reservation)?;
                    store::mark_cancelled_row(&tx, *reservation)?;
                }
                PlanAction::SaveBlocks {
                    date,
                    turno,
                    config,
                } => {
                    store::save_blocks_row(&tx, *date, *turno, config)?;
                }
                PlanAction::CreateWaitingEntry(new) => {
                    result.waiting_entry =
                        Some(WaitingEntryId::new(store::insert_waiting_row(&tx, new)?));
                }
                PlanAction::SetWaitingStatus { entry, status } => {
                    store::update_waiting_status_row(&tx, *entry, *status)?;
                }
                PlanAction::RemoveWaitingEntry { entry } => {
                    store::delete_waiting_row(&tx, *entry)?;
                }
            }
        }

        tx.commit()?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::error::Error;
    use crate::reservation::Turno;
    use crate::store::test_util::{create_test_store, new_reservation, new_waiting};

    fn saturday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 5).unwrap()
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let mut store = create_test_store();
        let plan = OperationPlan::new("Book")
            .add_action(PlanAction::CreateReservation(new_reservation(
                saturday(),
                2,
                Some("1"),
            )));

        let result = PlanExecutor::new(&mut store).dry_run().execute(&plan).unwrap();
        assert!(result.dry_run);
        assert_eq!(result.actions_taken.len(), 1);
        assert!(store
            .list_reservations(saturday(), Turno::Mediodia)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_execute_creates_reservation_with_holds() {
        let mut store = create_test_store();
        let plan = OperationPlan::new("Book")
            .add_action(PlanAction::CreateReservation(new_reservation(
                saturday(),
                6,
                Some("2+3"),
            )));

        let result = PlanExecutor::new(&mut store).execute(&plan).unwrap();
        let id = result.reservation.unwrap();
        let stored = store.get_reservation(id).unwrap();
        assert_eq!(stored.assigned_table(), Some("2+3".parse().unwrap()));

        let holds: i64 = store
            .connection()
            .query_row("SELECT COUNT(*) FROM table_holds", [], |row| row.get(0))
            .unwrap();
        assert_eq!(holds, 2);
    }

    #[test]
    fn test_multi_action_plan_is_atomic() {
        let mut store = create_test_store();
        let first = store
            .create_reservation(&new_reservation(saturday(), 4, Some("5")))
            .unwrap();
        let second = store
            .create_reservation(&new_reservation(saturday(), 4, Some("6")))
            .unwrap();

        // Swap attempt that collides on the second step: the first step
        // must be rolled back too.
        let plan = OperationPlan::new("Shuffle")
            .add_action(PlanAction::AssignTable {
                date: saturday(),
                turno: Turno::Mediodia,
                reservation: first.id(),
                assignment: "7".parse().unwrap(),
            })
            .add_action(PlanAction::AssignTable {
                date: saturday(),
                turno: Turno::Mediodia,
                reservation: second.id(),
                assignment: "7".parse().unwrap(),
            });

        let result = PlanExecutor::new(&mut store).execute(&plan);
        assert!(matches!(result, Err(Error::StalePrecondition { .. })));

        let unchanged = store.get_reservation(first.id()).unwrap();
        assert_eq!(unchanged.assigned_table(), Some("5".parse().unwrap()));
    }

    #[test]
    fn test_cancel_frees_the_table() {
        let mut store = create_test_store();
        let created = store
            .create_reservation(&new_reservation(saturday(), 4, Some("5")))
            .unwrap();

        let plan = OperationPlan::new("Cancel").add_action(PlanAction::CancelReservation {
            reservation: created.id(),
        });
        PlanExecutor::new(&mut store).execute(&plan).unwrap();

        assert!(matches!(
            store.get_reservation(created.id()),
            Err(Error::NotFound { .. })
        ));
        // The freed table can be booked again.
        assert!(store
            .create_reservation(&new_reservation(saturday(), 4, Some("5")))
            .is_ok());
    }

    #[test]
    fn test_remove_waiting_entry_deletes_the_row() {
        let mut store = create_test_store();
        let entry = store.add_waiting_entry(&new_waiting(saturday(), 4)).unwrap();

        let plan = OperationPlan::new("Drop").add_action(PlanAction::RemoveWaitingEntry {
            entry: entry.id(),
        });
        PlanExecutor::new(&mut store).execute(&plan).unwrap();

        assert!(matches!(
            store.get_waiting_entry(entry.id()),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_stale_plan_fails_on_execution() {
        let mut store = create_test_store();
        let pending = store
            .create_reservation(&new_reservation(saturday(), 4, None))
            .unwrap();

        // Another terminal takes table 5 after this plan was computed.
        store
            .create_reservation(&new_reservation(saturday(), 4, Some("5")))
            .unwrap();

        let plan = OperationPlan::new("Assign").add_action(PlanAction::AssignTable {
            date: saturday(),
            turno: Turno::Mediodia,
            reservation: pending.id(),
            assignment: "5".parse().unwrap(),
        });
        let result = PlanExecutor::new(&mut store).execute(&plan);
        assert!(matches!(result, Err(Error::StalePrecondition { .. })));
    }
}
