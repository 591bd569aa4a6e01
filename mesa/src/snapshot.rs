//! A consistent view of one service, taken at a single point in time.
//!
//! Every resolver, calculator, and assigner call takes a
//! [`ServiceSnapshot`] rather than reading shared state: the surrounding
//! system is responsible for producing a snapshot from one consistent
//! read and re-invoking the engine when the underlying data changes.

use chrono::NaiveDate;

use crate::blocks::BlockConfig;
use crate::reservation::{Reservation, ReservationId, Turno};

/// The active reservations and block configuration for one `(date, turno)`.
///
/// Reservations are filtered to the snapshot's service and held in
/// deterministic order: ascending slot time, then ascending id (creation
/// order). Batch assignment depends on this ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSnapshot {
    date: NaiveDate,
    turno: Turno,
    reservations: Vec<Reservation>,
    blocks: BlockConfig,
}

impl ServiceSnapshot {
    /// Creates a snapshot, filtering and ordering the reservation list.
    ///
    /// Reservations for other dates or turns are dropped, so callers may
    /// pass an unfiltered active set.
    #[must_use]
    pub fn new(
        date: NaiveDate,
        turno: Turno,
        reservations: Vec<Reservation>,
        blocks: BlockConfig,
    ) -> Self {
        let mut reservations: Vec<Reservation> = reservations
            .into_iter()
            .filter(|r| r.date() == date && r.turno() == turno)
            .collect();
        reservations.sort_by_key(|r| (r.time(), r.id()));
        Self {
            date,
            turno,
            reservations,
            blocks,
        }
    }

    /// The snapshot's calendar day.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// The snapshot's meal turn.
    #[must_use]
    pub const fn turno(&self) -> Turno {
        self.turno
    }

    /// Active reservations for this service, in (time, id) order.
    #[must_use]
    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    /// The block configuration for this service.
    #[must_use]
    pub const fn blocks(&self) -> &BlockConfig {
        &self.blocks
    }

    /// Looks up a reservation by id.
    #[must_use]
    pub fn reservation(&self, id: ReservationId) -> Option<&Reservation> {
        self.reservations.iter().find(|r| r.id() == id)
    }

    /// Iterates over reservations that still need a table.
    pub fn unassigned(&self) -> impl Iterator<Item = &Reservation> {
        self.reservations
            .iter()
            .filter(|r| r.assigned_table().is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservation::{PartySize, SlotTime};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 5).unwrap()
    }

    fn reservation(id: i64, turno: Turno, time: &str) -> Reservation {
        Reservation::builder(
            ReservationId::new(id),
            date(),
            turno,
            time.parse::<SlotTime>().unwrap(),
            PartySize::try_from(2).unwrap(),
        )
        .client("client")
        .build()
        .unwrap()
    }

    #[test]
    fn test_filters_other_services() {
        let snapshot = ServiceSnapshot::new(
            date(),
            Turno::Mediodia,
            vec![
                reservation(1, Turno::Mediodia, "13:00"),
                reservation(2, Turno::Noche, "21:00"),
            ],
            BlockConfig::empty(),
        );
        assert_eq!(snapshot.reservations().len(), 1);
        assert!(snapshot.reservation(ReservationId::new(2)).is_none());
    }

    #[test]
    fn test_orders_by_time_then_id() {
        let snapshot = ServiceSnapshot::new(
            date(),
            Turno::Mediodia,
            vec![
                reservation(3, Turno::Mediodia, "14:00"),
                reservation(2, Turno::Mediodia, "13:00"),
                reservation(1, Turno::Mediodia, "14:00"),
            ],
            BlockConfig::empty(),
        );
        let ids: Vec<i64> = snapshot
            .reservations()
            .iter()
            .map(|r| r.id().value())
            .collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_unassigned_iterator() {
        let assigned = reservation(1, Turno::Mediodia, "13:00")
            .with_assignment(Some("5".parse().unwrap()));
        let pending = reservation(2, Turno::Mediodia, "13:30");
        let snapshot = ServiceSnapshot::new(
            date(),
            Turno::Mediodia,
            vec![assigned, pending],
            BlockConfig::empty(),
        );
        let pending_ids: Vec<i64> = snapshot.unassigned().map(|r| r.id().value()).collect();
        assert_eq!(pending_ids, vec![2]);
    }
}
