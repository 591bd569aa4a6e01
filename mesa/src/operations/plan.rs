//! Plan types for reservation operations.
//!
//! This module defines the plan structures that describe what actions
//! will be taken during an operation, without actually performing them.
//! Plans are computed against one snapshot and applied atomically by the
//! executor; the storage layer re-validates table holds on write, so a
//! plan raced by a concurrent change fails whole rather than half-lands.

use chrono::NaiveDate;

use crate::blocks::BlockConfig;
use crate::reservation::{CheckInState, ReservationId, Turno};
use crate::store::{NewReservation, NewWaitingEntry};
use crate::table::TableAssignment;
use crate::waitlist::{WaitingEntryId, WaitingStatus};

/// A single action to be taken during plan execution.
///
/// Each action corresponds to a specific storage operation performed
/// when the plan is executed.
#[derive(Debug, Clone)]
pub enum PlanAction {
    /// Create a new reservation (with its table holds when assigned).
    CreateReservation(NewReservation),

    /// Give a reservation a table or merged pair, replacing any previous
    /// assignment.
    AssignTable {
        /// The service the assignment belongs to.
        date: NaiveDate,
        /// The service's turn.
        turno: Turno,
        /// The reservation being placed.
        reservation: ReservationId,
        /// The table or merged pair to hold.
        assignment: TableAssignment,
    },

    /// Record an arrival or undo one.
    SetCheckIn {
        /// The reservation being updated.
        reservation: ReservationId,
        /// The new check-in state.
        state: CheckInState,
    },

    /// Cancel a reservation, freeing its holds.
    CancelReservation {
        /// The reservation being cancelled.
        reservation: ReservationId,
    },

    /// Save a service's block configuration (compare-and-swap on its
    /// version).
    SaveBlocks {
        /// The service's day.
        date: NaiveDate,
        /// The service's turn.
        turno: Turno,
        /// The configuration to save.
        config: BlockConfig,
    },

    /// Park a new waiting-list entry.
    CreateWaitingEntry(NewWaitingEntry),

    /// Move a waiting-list entry along the status ladder.
    SetWaitingStatus {
        /// The entry being updated.
        entry: WaitingEntryId,
        /// The new status.
        status: WaitingStatus,
    },

    /// Drop a settled waiting-list entry from the list.
    RemoveWaitingEntry {
        /// The entry being removed.
        entry: WaitingEntryId,
    },
}

impl PlanAction {
    /// Returns a human-readable description of this action.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::CreateReservation(new) => match new.assignment {
                Some(assignment) => format!(
                    "Create reservation for {} ({} covers) on table {assignment}",
                    new.client,
                    new.party_size.covers()
                ),
                None => format!(
                    "Create unassigned reservation for {} ({} covers)",
                    new.client,
                    new.party_size.covers()
                ),
            },
            Self::AssignTable {
                reservation,
                assignment,
                ..
            } => format!("Assign table {assignment} to reservation {reservation}"),
            Self::SetCheckIn { reservation, state } => match state {
                CheckInState::Arrived => format!("Check in reservation {reservation}"),
                CheckInState::None => format!("Undo check-in of reservation {reservation}"),
            },
            Self::CancelReservation { reservation } => {
                format!("Cancel reservation {reservation}")
            }
            Self::SaveBlocks { date, turno, .. } => {
                format!("Save block configuration for {date} {turno}")
            }
            Self::CreateWaitingEntry(new) => format!(
                "Park {} ({} covers) on the waiting list",
                new.client,
                new.party_size.covers()
            ),
            Self::SetWaitingStatus { entry, status } => {
                format!("Mark waiting-list entry {entry} as {status}")
            }
            Self::RemoveWaitingEntry { entry } => {
                format!("Remove waiting-list entry {entry}")
            }
        }
    }
}

/// A complete operation plan describing all actions to be taken.
///
/// Plans are generated during the planning phase and can be inspected,
/// logged, or executed. They include a description, a sequence of
/// actions, and any warnings that should be communicated to the user.
#[derive(Debug, Clone)]
pub struct OperationPlan {
    /// A human-readable description of the operation.
    pub description: String,

    /// The sequence of actions to perform.
    pub actions: Vec<PlanAction>,

    /// Warnings to communicate to the user.
    pub warnings: Vec<String>,
}

impl OperationPlan {
    /// Creates a new operation plan with the given description.
    ///
    /// # Examples
    ///
    /// ```
    /// use mesa::operations::OperationPlan;
    ///
    /// let plan = OperationPlan::new("Book a table for four");
    /// assert!(plan.is_empty());
    /// ```
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            actions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an action to the plan.
    #[must_use]
    pub fn add_action(mut self, action: PlanAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Adds a warning to the plan.
    #[must_use]
    pub fn add_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Returns `true` if the plan contains no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservation::PartySize;

    #[test]
    fn test_plan_builder() {
        let plan = OperationPlan::new("Test")
            .add_action(PlanAction::CancelReservation {
                reservation: ReservationId::new(1),
            })
            .add_warning("heads up");
        assert_eq!(plan.actions.len(), 1);
        assert_eq!(plan.warnings, vec!["heads up".to_string()]);
        assert!(!plan.is_empty());
    }

    #[test]
    fn test_action_descriptions_name_their_subject() {
        let new = NewReservation {
            date: chrono::NaiveDate::from_ymd_opt(2026, 9, 5).unwrap(),
            turno: Turno::Mediodia,
            time: "13:00".parse().unwrap(),
            party_size: PartySize::try_from(6).unwrap(),
            client: "Marta R.".into(),
            assignment: Some("2+3".parse().unwrap()),
        };
        let description = PlanAction::CreateReservation(new).description();
        assert!(description.contains("Marta R."));
        assert!(description.contains("2+3"));
    }
}
