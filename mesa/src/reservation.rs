//! Reservation types for tracking table bookings.
//!
//! This module provides the reservation record and its component types:
//! the meal turn, validated party sizes, slot times, and check-in state.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::table::{CapacityTier, TableAssignment};

/// The meal turn a reservation belongs to.
///
/// The restaurant runs two seatings a day; capacity is accounted per turn,
/// not per clock slot.
///
/// # Examples
///
/// ```
/// use mesa::Turno;
///
/// assert_eq!(Turno::Mediodia.to_string(), "mediodia");
/// assert_eq!("noche".parse::<Turno>().unwrap(), Turno::Noche);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Turno {
    /// The midday seating.
    Mediodia,
    /// The evening seating.
    Noche,
}

impl Turno {
    /// Both turns in service order.
    pub const ALL: [Self; 2] = [Self::Mediodia, Self::Noche];
}

impl fmt::Display for Turno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mediodia => write!(f, "mediodia"),
            Self::Noche => write!(f, "noche"),
        }
    }
}

impl FromStr for Turno {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mediodia" => Ok(Self::Mediodia),
            "noche" => Ok(Self::Noche),
            _ => Err(ValidationError {
                field: "turno".into(),
                message: format!("unknown turno '{s}' (expected 'mediodia' or 'noche')"),
            }),
        }
    }
}

/// A validated party size (1-6 covers).
///
/// Parties of 7 or more are handled through manual contact and never
/// enter the allocation engine.
///
/// # Examples
///
/// ```
/// use mesa::{CapacityTier, PartySize};
///
/// let party = PartySize::try_from(5).unwrap();
/// assert_eq!(party.covers(), 5);
/// assert_eq!(party.tier(), CapacityTier::Large);
/// assert!(PartySize::try_from(0).is_err());
/// assert!(PartySize::try_from(7).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartySize(u8);

impl PartySize {
    /// The largest party the engine accepts.
    pub const MAX: u8 = 6;

    /// Returns the number of covers in the party.
    #[must_use]
    pub const fn covers(self) -> u8 {
        self.0
    }

    /// Returns the capacity tier this party competes in.
    #[must_use]
    pub const fn tier(self) -> CapacityTier {
        CapacityTier::of_seats(self.0)
    }
}

impl TryFrom<u8> for PartySize {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value == 0 || value > Self::MAX {
            Err(ValidationError {
                field: "party_size".into(),
                message: format!(
                    "party size {value} out of range (1-{}); larger parties are handled manually",
                    Self::MAX
                ),
            })
        } else {
            Ok(Self(value))
        }
    }
}

impl fmt::Display for PartySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A clock time slot within a turn, minute precision.
///
/// Slot times exist for presentation and ordering; capacity is enforced
/// at the turn level.
///
/// # Examples
///
/// ```
/// use mesa::SlotTime;
///
/// let slot: SlotTime = "13:30".parse().unwrap();
/// assert_eq!(slot.to_string(), "13:30");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotTime(NaiveTime);

impl SlotTime {
    /// Creates a slot time from a `chrono` time (seconds are dropped).
    #[must_use]
    pub fn new(time: NaiveTime) -> Self {
        use chrono::Timelike;
        Self(
            NaiveTime::from_hms_opt(time.hour(), time.minute(), 0)
                .unwrap_or(time),
        )
    }

    /// Returns the underlying time value.
    #[must_use]
    pub const fn time(self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for SlotTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(Self)
            .map_err(|_| ValidationError {
                field: "time".into(),
                message: format!("'{s}' is not a valid HH:MM slot time"),
            })
    }
}

impl From<SlotTime> for String {
    fn from(slot: SlotTime) -> Self {
        slot.to_string()
    }
}

impl TryFrom<String> for SlotTime {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Whether the party behind a reservation has arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckInState {
    /// The party has not arrived yet.
    #[default]
    None,
    /// The party has been seated.
    Arrived,
}

impl fmt::Display for CheckInState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Arrived => write!(f, "arrived"),
        }
    }
}

/// A unique identifier for a stored reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(i64);

impl ReservationId {
    /// Wraps a raw storage id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw storage id.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A confirmed table booking.
///
/// Created on booking confirmation; the table assignment may be set at
/// creation (admin flow) or later via auto or manual assignment.
/// Cancellation removes the reservation from the active set, it does not
/// destroy the record.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use mesa::{PartySize, Reservation, ReservationId, Turno};
///
/// let reservation = Reservation::builder(
///     ReservationId::new(1),
///     NaiveDate::from_ymd_opt(2026, 9, 5).unwrap(),
///     Turno::Noche,
///     "21:00".parse().unwrap(),
///     PartySize::try_from(4).unwrap(),
/// )
/// .client("Marta R.")
/// .build()
/// .unwrap();
///
/// assert_eq!(reservation.party_size().covers(), 4);
/// assert!(reservation.assigned_table().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    date: NaiveDate,
    turno: Turno,
    time: SlotTime,
    party_size: PartySize,
    assigned_table: Option<TableAssignment>,
    check_in: CheckInState,
    client: String,
}

impl Reservation {
    /// Creates a new reservation builder.
    #[must_use]
    pub fn builder(
        id: ReservationId,
        date: NaiveDate,
        turno: Turno,
        time: SlotTime,
        party_size: PartySize,
    ) -> ReservationBuilder {
        ReservationBuilder {
            id,
            date,
            turno,
            time,
            party_size,
            assigned_table: None,
            check_in: CheckInState::None,
            client: String::new(),
        }
    }

    /// Returns the reservation id.
    #[must_use]
    pub const fn id(&self) -> ReservationId {
        self.id
    }

    /// Returns the calendar day of the booking.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the meal turn.
    #[must_use]
    pub const fn turno(&self) -> Turno {
        self.turno
    }

    /// Returns the booked slot time.
    #[must_use]
    pub const fn time(&self) -> SlotTime {
        self.time
    }

    /// Returns the party size.
    #[must_use]
    pub const fn party_size(&self) -> PartySize {
        self.party_size
    }

    /// Returns the assigned table(s), if any.
    #[must_use]
    pub const fn assigned_table(&self) -> Option<TableAssignment> {
        self.assigned_table
    }

    /// Returns the check-in state.
    #[must_use]
    pub const fn check_in(&self) -> CheckInState {
        self.check_in
    }

    /// Returns the client reference.
    #[must_use]
    pub fn client(&self) -> &str {
        &self.client
    }

    /// Returns a copy with the given table assignment.
    #[must_use]
    pub fn with_assignment(mut self, assignment: Option<TableAssignment>) -> Self {
        self.assigned_table = assignment;
        self
    }

    /// Returns a copy with the given check-in state.
    #[must_use]
    pub fn with_check_in(mut self, state: CheckInState) -> Self {
        self.check_in = state;
        self
    }
}

/// Builder for [`Reservation`] instances.
#[derive(Debug)]
pub struct ReservationBuilder {
    id: ReservationId,
    date: NaiveDate,
    turno: Turno,
    time: SlotTime,
    party_size: PartySize,
    assigned_table: Option<TableAssignment>,
    check_in: CheckInState,
    client: String,
}

impl ReservationBuilder {
    /// Sets the client reference (trimmed).
    #[must_use]
    pub fn client(mut self, client: impl Into<String>) -> Self {
        self.client = client.into().trim().to_string();
        self
    }

    /// Sets the table assignment.
    #[must_use]
    pub const fn assigned_table(mut self, assignment: Option<TableAssignment>) -> Self {
        self.assigned_table = assignment;
        self
    }

    /// Sets the check-in state.
    #[must_use]
    pub const fn check_in(mut self, state: CheckInState) -> Self {
        self.check_in = state;
        self
    }

    /// Builds the reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if the client reference is empty.
    pub fn build(self) -> Result<Reservation, ValidationError> {
        if self.client.is_empty() {
            return Err(ValidationError {
                field: "client".into(),
                message: "client reference must be non-empty".into(),
            });
        }

        Ok(Reservation {
            id: self.id,
            date: self.date,
            turno: self.turno,
            time: self.time,
            party_size: self.party_size,
            assigned_table: self.assigned_table,
            check_in: self.check_in,
            client: self.client,
        })
    }
}

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}
