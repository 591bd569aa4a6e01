//! Promotion planning: turning a parked waiting-list entry into a
//! reservation.

use crate::availability::ClosedReason;
use crate::error::{Error, Result};
use crate::room::DiningRoom;
use crate::snapshot::ServiceSnapshot;
use crate::store::NewReservation;
use crate::waitlist::{plan_promotion, Promotion, WaitingEntry, WaitingStatus};

use super::plan::{OperationPlan, PlanAction};

/// Plans the promotion of a waiting-list entry.
///
/// Availability is re-verified against the given snapshot; a successful
/// plan creates the reservation (with the freshly selected table) and
/// marks the entry confirmed in one atomic step. A failed promotion
/// leaves the entry exactly as it was.
///
/// # Errors
///
/// Returns a validation error when the entry is already settled
/// (confirmed or rejected), [`Error::Closed`] when the service no
/// longer offers the entry's slot, and [`Error::TurnFull`] when the
/// tier filled up again.
pub fn plan_promote(
    room: &DiningRoom,
    snapshot: &ServiceSnapshot,
    entry: &WaitingEntry,
) -> Result<OperationPlan> {
    match plan_promotion(room, snapshot, entry) {
        Promotion::Promote { assignment } => Ok(OperationPlan::new(format!(
            "Promote {} from the waiting list to table {assignment}",
            entry.client()
        ))
        .add_action(PlanAction::CreateReservation(NewReservation {
            date: entry.date(),
            turno: entry.turno(),
            time: entry.time(),
            party_size: entry.party_size(),
            client: entry.client().to_string(),
            assignment: Some(assignment),
        }))
        .add_action(PlanAction::SetWaitingStatus {
            entry: entry.id(),
            status: WaitingStatus::Confirmed,
        })),
        Promotion::Unavailable { reason } => match reason {
            ClosedReason::NotServing => Err(Error::Closed),
            ClosedReason::TierFull { tier } => Err(Error::TurnFull { tier }),
        },
        Promotion::NotEligible { status } => Err(Error::Validation {
            field: "status".into(),
            message: format!("a {status} entry cannot be promoted"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::blocks::BlockConfig;
    use crate::reservation::{PartySize, Reservation, ReservationId, Turno};
    use crate::room::fixtures::room;
    use crate::waitlist::{WaitingEntryId, WaitingStatus};

    fn saturday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 5).unwrap()
    }

    fn entry(covers: u8, status: WaitingStatus) -> WaitingEntry {
        WaitingEntry::builder(
            WaitingEntryId::new(7),
            saturday(),
            Turno::Mediodia,
            "13:30".parse().unwrap(),
            PartySize::try_from(covers).unwrap(),
        )
        .client("Ana")
        .status(status)
        .build()
        .unwrap()
    }

    fn snapshot(reservations: Vec<Reservation>) -> ServiceSnapshot {
        ServiceSnapshot::new(saturday(), Turno::Mediodia, reservations, BlockConfig::empty())
    }

    #[test]
    fn test_promote_creates_and_confirms_atomically() {
        let plan = plan_promote(&room(), &snapshot(vec![]), &entry(4, WaitingStatus::Pending))
            .unwrap();
        assert_eq!(plan.actions.len(), 2);
        assert!(matches!(plan.actions[0], PlanAction::CreateReservation(_)));
        assert!(matches!(
            plan.actions[1],
            PlanAction::SetWaitingStatus { entry, status: WaitingStatus::Confirmed }
                if entry == WaitingEntryId::new(7)
        ));
    }

    #[test]
    fn test_promote_refuses_settled_entries() {
        for status in [WaitingStatus::Confirmed, WaitingStatus::Rejected] {
            let result = plan_promote(&room(), &snapshot(vec![]), &entry(4, status));
            assert!(matches!(result, Err(Error::Validation { .. })));
        }
    }

    #[test]
    fn test_promote_fails_when_tier_refilled() {
        let taken = (1..=4)
            .map(|n| {
                Reservation::builder(
                    ReservationId::new(n),
                    saturday(),
                    Turno::Mediodia,
                    "13:00".parse().unwrap(),
                    PartySize::try_from(4).unwrap(),
                )
                .client("client")
                .assigned_table(Some((n + 4).to_string().parse().unwrap()))
                .build()
                .unwrap()
            })
            .collect();
        let result = plan_promote(&room(), &snapshot(taken), &entry(4, WaitingStatus::Pending));
        assert!(matches!(result, Err(Error::TurnFull { .. })));
    }
}
