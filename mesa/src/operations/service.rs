//! Day-to-day service planning: check-ins, cancellations, and block
//! configuration changes.

use chrono::NaiveDate;

use crate::blocks::BlockConfig;
use crate::error::{Error, Result};
use crate::reservation::{CheckInState, ReservationId, Turno};
use crate::snapshot::ServiceSnapshot;

use super::plan::{OperationPlan, PlanAction};

/// Plans the cancellation of a reservation, freeing its table.
///
/// # Errors
///
/// Returns [`Error::NotFound`] when the reservation is not part of the
/// snapshot's service.
pub fn plan_cancel(snapshot: &ServiceSnapshot, reservation: ReservationId) -> Result<OperationPlan> {
    let Some(found) = snapshot.reservation(reservation) else {
        return Err(Error::NotFound {
            resource: format!("reservation {reservation}"),
        });
    };

    Ok(
        OperationPlan::new(format!("Cancel the reservation of {}", found.client()))
            .add_action(PlanAction::CancelReservation { reservation }),
    )
}

/// Plans a check-in, marking the party as seated.
///
/// # Errors
///
/// Returns [`Error::NotFound`] when the reservation is not part of the
/// snapshot's service, and a validation error when the party is already
/// seated.
pub fn plan_check_in(
    snapshot: &ServiceSnapshot,
    reservation: ReservationId,
) -> Result<OperationPlan> {
    plan_check_in_change(snapshot, reservation, CheckInState::Arrived)
}

/// Plans the undo of a mistaken check-in.
///
/// # Errors
///
/// Returns [`Error::NotFound`] when the reservation is not part of the
/// snapshot's service, and a validation error when the party has not
/// arrived.
pub fn plan_undo_check_in(
    snapshot: &ServiceSnapshot,
    reservation: ReservationId,
) -> Result<OperationPlan> {
    plan_check_in_change(snapshot, reservation, CheckInState::None)
}

fn plan_check_in_change(
    snapshot: &ServiceSnapshot,
    reservation: ReservationId,
    state: CheckInState,
) -> Result<OperationPlan> {
    let Some(found) = snapshot.reservation(reservation) else {
        return Err(Error::NotFound {
            resource: format!("reservation {reservation}"),
        });
    };
    if found.check_in() == state {
        let message = match state {
            CheckInState::Arrived => "the party is already checked in",
            CheckInState::None => "the party has not checked in",
        };
        return Err(Error::Validation {
            field: "check_in".into(),
            message: message.into(),
        });
    }

    let description = match state {
        CheckInState::Arrived => format!("Check in {}", found.client()),
        CheckInState::None => format!("Undo the check-in of {}", found.client()),
    };
    Ok(OperationPlan::new(description)
        .add_action(PlanAction::SetCheckIn { reservation, state }))
}

/// Plans saving a service's block configuration.
///
/// The configuration carries the version it was loaded at; storage
/// applies the save only if that version is still current, so two
/// terminals editing the same service cannot silently overwrite each
/// other.
#[must_use]
pub fn plan_save_blocks(date: NaiveDate, turno: Turno, config: BlockConfig) -> OperationPlan {
    OperationPlan::new(format!("Save the block configuration for {date} {turno}"))
        .add_action(PlanAction::SaveBlocks {
            date,
            turno,
            config,
        })
}
