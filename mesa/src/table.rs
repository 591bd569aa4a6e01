//! Table identity, seating capacity, and assignment units.
//!
//! This module provides the basic vocabulary of the dining room: table
//! identifiers, validated capacities with their tier classification, and
//! the assignment unit a reservation can hold (a single table or a merged
//! pair of combinable tables).

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A physical table's identifier.
///
/// Table ids are small positive integers printed on the floor plan.
/// Id 0 is invalid.
///
/// # Examples
///
/// ```
/// use mesa::TableId;
///
/// let id = TableId::try_from(7).unwrap();
/// assert_eq!(id.value(), 7);
/// assert!(TableId::try_from(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(u32);

impl TableId {
    /// Returns the underlying id number.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for TableId {
    type Error = InvalidTableIdError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if value == 0 {
            Err(InvalidTableIdError {
                value,
                reason: "table id 0 is invalid".into(),
            })
        } else {
            Ok(Self(value))
        }
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for invalid table ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTableIdError {
    /// The invalid id value.
    pub value: u32,
    /// The reason the id is invalid.
    pub reason: String,
}

impl fmt::Display for InvalidTableIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid table id {}: {}", self.value, self.reason)
    }
}

impl std::error::Error for InvalidTableIdError {}

/// A validated seating capacity (1-6 covers).
///
/// Larger parties are routed to manual contact and never reach the
/// allocation engine, so no table or merged pair seats more than 6.
///
/// # Examples
///
/// ```
/// use mesa::{Capacity, CapacityTier};
///
/// let four = Capacity::try_from(4).unwrap();
/// assert_eq!(four.seats(), 4);
/// assert_eq!(four.tier(), CapacityTier::Medium);
/// assert!(Capacity::try_from(0).is_err());
/// assert!(Capacity::try_from(7).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capacity(u8);

impl Capacity {
    /// The maximum capacity handled by the engine.
    pub const MAX: u8 = 6;

    /// Returns the number of covers this capacity seats.
    #[must_use]
    pub const fn seats(self) -> u8 {
        self.0
    }

    /// Returns the capacity tier this capacity belongs to.
    #[must_use]
    pub const fn tier(self) -> CapacityTier {
        CapacityTier::of_seats(self.0)
    }
}

impl TryFrom<u8> for Capacity {
    type Error = InvalidCapacityError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value == 0 || value > Self::MAX {
            Err(InvalidCapacityError { value })
        } else {
            Ok(Self(value))
        }
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for invalid capacities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidCapacityError {
    /// The invalid capacity value.
    pub value: u8,
}

impl fmt::Display for InvalidCapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid capacity {}: must be between 1 and {}",
            self.value,
            Capacity::MAX
        )
    }
}

impl std::error::Error for InvalidCapacityError {}

/// Capacity tiers used for supply/demand accounting.
///
/// Tables and parties are partitioned into the same three tiers so that
/// turn-level capacity can be compared tier by tier: small (1-2),
/// medium (3-4), large (5-6).
///
/// # Examples
///
/// ```
/// use mesa::CapacityTier;
///
/// assert_eq!(CapacityTier::of_seats(2), CapacityTier::Small);
/// assert_eq!(CapacityTier::of_seats(3), CapacityTier::Medium);
/// assert_eq!(CapacityTier::of_seats(6), CapacityTier::Large);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapacityTier {
    /// Parties or tables of 1-2 covers.
    Small,
    /// Parties or tables of 3-4 covers.
    Medium,
    /// Parties or tables of 5-6 covers.
    Large,
}

impl CapacityTier {
    /// All tiers in ascending order.
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Classifies a number of covers into its tier.
    #[must_use]
    pub const fn of_seats(seats: u8) -> Self {
        match seats {
            0..=2 => Self::Small,
            3..=4 => Self::Medium,
            _ => Self::Large,
        }
    }
}

impl fmt::Display for CapacityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Small => write!(f, "small"),
            Self::Medium => write!(f, "medium"),
            Self::Large => write!(f, "large"),
        }
    }
}

/// A physical table as described by the catalog.
///
/// Immutable after catalog construction; `combinable_with` lists the
/// tables this one may legally be merged with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// The table's identifier.
    pub id: TableId,
    /// Seating capacity of the table on its own.
    pub capacity: Capacity,
    /// Ids of tables this one may be merged with.
    #[serde(default)]
    pub combinable_with: BTreeSet<TableId>,
}

impl Table {
    /// Creates a table with no combination partners.
    #[must_use]
    pub fn new(id: TableId, capacity: Capacity) -> Self {
        Self {
            id,
            capacity,
            combinable_with: BTreeSet::new(),
        }
    }
}

/// The unit of a table assignment: one table, or a merged pair.
///
/// Replaces the historical `"A+B"` composite-string encoding with an
/// explicit variant; string parsing happens only at the storage boundary
/// via [`FromStr`].
///
/// # Examples
///
/// ```
/// use mesa::{TableAssignment, TableId};
///
/// let t2 = TableId::try_from(2).unwrap();
/// let t3 = TableId::try_from(3).unwrap();
///
/// let single = TableAssignment::Single(t2);
/// assert_eq!(single.to_string(), "2");
///
/// // Combined pairs are normalized to ascending id order.
/// let pair = TableAssignment::combined(t3, t2).unwrap();
/// assert_eq!(pair.to_string(), "2+3");
/// assert!(pair.contains(t2) && pair.contains(t3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TableAssignment {
    /// A single table.
    Single(TableId),
    /// A merged pair of combinable tables, ordered ascending by id.
    Combined(TableId, TableId),
}

impl TableAssignment {
    /// Creates a combined assignment, normalizing the pair to ascending order.
    ///
    /// # Errors
    ///
    /// Returns an error if both halves are the same table.
    pub fn combined(a: TableId, b: TableId) -> Result<Self, InvalidAssignmentError> {
        if a == b {
            return Err(InvalidAssignmentError {
                text: format!("{a}+{b}"),
                reason: "a combined assignment requires two distinct tables".into(),
            });
        }
        if a < b {
            Ok(Self::Combined(a, b))
        } else {
            Ok(Self::Combined(b, a))
        }
    }

    /// Returns the member tables of this assignment.
    #[must_use]
    pub fn members(&self) -> Vec<TableId> {
        match *self {
            Self::Single(id) => vec![id],
            Self::Combined(a, b) => vec![a, b],
        }
    }

    /// Returns `true` if the assignment includes the given table.
    #[must_use]
    pub fn contains(&self, id: TableId) -> bool {
        match *self {
            Self::Single(t) => t == id,
            Self::Combined(a, b) => a == id || b == id,
        }
    }

    /// Returns `true` if the two assignments share any table.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.members().iter().any(|id| other.contains(*id))
    }
}

impl fmt::Display for TableAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Single(id) => write!(f, "{id}"),
            Self::Combined(a, b) => write!(f, "{a}+{b}"),
        }
    }
}

impl FromStr for TableAssignment {
    type Err = InvalidAssignmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_id = |part: &str| -> Result<TableId, InvalidAssignmentError> {
            let raw: u32 = part.trim().parse().map_err(|_| InvalidAssignmentError {
                text: s.to_string(),
                reason: format!("'{part}' is not a table id"),
            })?;
            TableId::try_from(raw).map_err(|e| InvalidAssignmentError {
                text: s.to_string(),
                reason: e.reason,
            })
        };

        match s.split_once('+') {
            None => Ok(Self::Single(parse_id(s)?)),
            Some((a, b)) => {
                if b.contains('+') {
                    return Err(InvalidAssignmentError {
                        text: s.to_string(),
                        reason: "at most two tables may be combined".into(),
                    });
                }
                Self::combined(parse_id(a)?, parse_id(b)?)
            }
        }
    }
}

impl From<TableAssignment> for String {
    fn from(assignment: TableAssignment) -> Self {
        assignment.to_string()
    }
}

impl TryFrom<String> for TableAssignment {
    type Error = InvalidAssignmentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Error type for malformed table assignments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidAssignmentError {
    /// The text that failed to parse.
    pub text: String,
    /// The reason parsing failed.
    pub reason: String,
}

impl fmt::Display for InvalidAssignmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid table assignment '{}': {}", self.text, self.reason)
    }
}

impl std::error::Error for InvalidAssignmentError {}
