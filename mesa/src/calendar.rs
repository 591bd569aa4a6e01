//! The operating calendar: which services run, and their time slots.
//!
//! The restaurant closes all day on Mondays and skips the evening turn on
//! Sundays. Each turn has a fixed list of bookable clock slots; the slots
//! are presentational only, capacity is enforced per turn.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::reservation::{SlotTime, Turno, ValidationError};

/// Fixed slot lists per turn plus the weekly closing rules.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use mesa::{Calendar, Turno};
///
/// let calendar = Calendar::default();
///
/// // 2026-09-07 is a Monday: fully closed.
/// let monday = NaiveDate::from_ymd_opt(2026, 9, 7).unwrap();
/// assert!(!calendar.is_open(monday, Turno::Mediodia));
///
/// // 2026-09-06 is a Sunday: midday only.
/// let sunday = NaiveDate::from_ymd_opt(2026, 9, 6).unwrap();
/// assert!(calendar.is_open(sunday, Turno::Mediodia));
/// assert!(!calendar.is_open(sunday, Turno::Noche));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    mediodia: Vec<SlotTime>,
    noche: Vec<SlotTime>,
}

impl Calendar {
    /// Creates a calendar from per-turn slot lists.
    ///
    /// Slots are sorted and deduplicated.
    ///
    /// # Errors
    ///
    /// Returns an error if either turn has no slots.
    pub fn new(mediodia: Vec<SlotTime>, noche: Vec<SlotTime>) -> Result<Self, ValidationError> {
        let normalize = |mut slots: Vec<SlotTime>, turno: Turno| {
            slots.sort_unstable();
            slots.dedup();
            if slots.is_empty() {
                Err(ValidationError {
                    field: "slots".into(),
                    message: format!("turno '{turno}' must have at least one time slot"),
                })
            } else {
                Ok(slots)
            }
        };

        Ok(Self {
            mediodia: normalize(mediodia, Turno::Mediodia)?,
            noche: normalize(noche, Turno::Noche)?,
        })
    }

    /// Returns the fixed slot list for a turn, ascending.
    #[must_use]
    pub fn slots(&self, turno: Turno) -> &[SlotTime] {
        match turno {
            Turno::Mediodia => &self.mediodia,
            Turno::Noche => &self.noche,
        }
    }

    /// Returns `true` if the given slot is one of the turn's fixed slots.
    #[must_use]
    pub fn contains_slot(&self, turno: Turno, slot: SlotTime) -> bool {
        self.slots(turno).contains(&slot)
    }

    /// Returns `true` if the restaurant serves the given date and turn.
    ///
    /// Mondays are closed entirely; Sundays have no evening service.
    #[must_use]
    pub fn is_open(&self, date: NaiveDate, turno: Turno) -> bool {
        match date.weekday() {
            Weekday::Mon => false,
            Weekday::Sun => turno == Turno::Mediodia,
            _ => true,
        }
    }
}

impl Default for Calendar {
    /// The house slot grid: midday 13:00-15:00, evening 20:00-22:00,
    /// both on the half hour.
    fn default() -> Self {
        let parse = |times: &[&str]| -> Vec<SlotTime> {
            times.iter().map(|t| t.parse().expect("valid slot")).collect()
        };
        Self {
            mediodia: parse(&["13:00", "13:30", "14:00", "14:30", "15:00"]),
            noche: parse(&["20:00", "20:30", "21:00", "21:30", "22:00"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(s: &str) -> SlotTime {
        s.parse().unwrap()
    }

    #[test]
    fn test_default_slot_grid() {
        let calendar = Calendar::default();
        assert_eq!(calendar.slots(Turno::Mediodia).len(), 5);
        assert_eq!(calendar.slots(Turno::Noche).len(), 5);
        assert!(calendar.contains_slot(Turno::Noche, slot("21:00")));
        assert!(!calendar.contains_slot(Turno::Noche, slot("13:00")));
    }

    #[test]
    fn test_new_sorts_and_dedups() {
        let calendar = Calendar::new(
            vec![slot("14:00"), slot("13:00"), slot("14:00")],
            vec![slot("20:00")],
        )
        .unwrap();
        assert_eq!(
            calendar.slots(Turno::Mediodia),
            &[slot("13:00"), slot("14:00")]
        );
    }

    #[test]
    fn test_new_rejects_empty_turn() {
        assert!(Calendar::new(vec![], vec![slot("20:00")]).is_err());
        assert!(Calendar::new(vec![slot("13:00")], vec![]).is_err());
    }

    #[test]
    fn test_monday_fully_closed() {
        let calendar = Calendar::default();
        let monday = NaiveDate::from_ymd_opt(2026, 9, 7).unwrap();
        assert_eq!(monday.weekday(), Weekday::Mon);
        assert!(!calendar.is_open(monday, Turno::Mediodia));
        assert!(!calendar.is_open(monday, Turno::Noche));
    }

    #[test]
    fn test_sunday_evening_closed() {
        let calendar = Calendar::default();
        let sunday = NaiveDate::from_ymd_opt(2026, 9, 6).unwrap();
        assert_eq!(sunday.weekday(), Weekday::Sun);
        assert!(calendar.is_open(sunday, Turno::Mediodia));
        assert!(!calendar.is_open(sunday, Turno::Noche));
    }

    #[test]
    fn test_weekdays_open_both_turns() {
        let calendar = Calendar::default();
        let saturday = NaiveDate::from_ymd_opt(2026, 9, 5).unwrap();
        assert_eq!(saturday.weekday(), Weekday::Sat);
        assert!(calendar.is_open(saturday, Turno::Mediodia));
        assert!(calendar.is_open(saturday, Turno::Noche));
    }
}
