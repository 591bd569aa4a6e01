//! Error types for the mesa library.
//!
//! This module provides the error hierarchy for all operations in the
//! mesa library, using `thiserror` for ergonomic error handling.

use std::path::PathBuf;

use thiserror::Error;

use crate::state::TableState;
use crate::table::{CapacityTier, TableId};

/// Result type alias for operations that may fail with a mesa error.
///
/// # Examples
///
/// ```
/// use mesa::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(4)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the mesa library.
///
/// This enum encompasses all error conditions that can occur while
/// resolving states, planning assignments, or persisting a service.
#[derive(Debug, Error)]
pub enum Error {
    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// A table id was used that is not in the catalog.
    #[error("unknown table {table}")]
    UnknownTable {
        /// The unknown table id.
        table: TableId,
    },

    /// A requested table cannot take the reservation.
    #[error("table {table} is {state}")]
    TableUnavailable {
        /// The refusing table.
        table: TableId,
        /// The state that refused the request.
        state: TableState,
    },

    /// A table is held by another reservation.
    #[error("table {table} is already assigned to reservation {occupant}")]
    TableConflict {
        /// The contested table.
        table: TableId,
        /// The reservation holding it.
        occupant: crate::reservation::ReservationId,
    },

    /// A table is held for walk-ins and the override was not confirmed.
    #[error("table(s) {tables:?} are held for walk-ins; confirmation required")]
    WalkInOverrideRequired {
        /// The walk-in-only tables involved.
        tables: Vec<TableId>,
    },

    /// The requested turn has no capacity left for the party's tier.
    #[error("no {tier} capacity left for this turn")]
    TurnFull {
        /// The exhausted capacity tier.
        tier: CapacityTier,
    },

    /// The restaurant is closed for the requested service.
    #[error("the restaurant is closed for the requested service")]
    Closed,

    /// The state a write was planned against changed before it was applied.
    #[error("stale precondition: {details}")]
    StalePrecondition {
        /// What changed under the plan.
        details: String,
    },

    /// A database lock timeout occurred.
    #[error("database lock timeout after {seconds}s")]
    LockTimeout {
        /// The number of seconds waited before timing out.
        seconds: u64,
    },

    /// The data directory was not found and auto-initialization is disabled.
    #[error("data directory not found: {}", path.display())]
    DataDirectoryNotFound {
        /// The expected path to the data directory.
        path: PathBuf,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: u32,
        /// The schema version found in the database.
        found: u32,
    },

    /// Database corruption was detected.
    #[error("database corruption detected: {details}")]
    DatabaseCorruption {
        /// Details about the corruption.
        details: String,
    },
}

// Conversions from the domain-level error types.

impl From<crate::reservation::ValidationError> for Error {
    fn from(err: crate::reservation::ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl From<crate::table::InvalidTableIdError> for Error {
    fn from(err: crate::table::InvalidTableIdError) -> Self {
        Self::Validation {
            field: "table_id".into(),
            message: err.reason,
        }
    }
}

impl From<crate::table::InvalidCapacityError> for Error {
    fn from(err: crate::table::InvalidCapacityError) -> Self {
        Self::Validation {
            field: "capacity".into(),
            message: format!(
                "capacity {} out of range (1-{})",
                err.value,
                crate::table::Capacity::MAX
            ),
        }
    }
}

impl From<crate::table::InvalidAssignmentError> for Error {
    fn from(err: crate::table::InvalidAssignmentError) -> Self {
        Self::Validation {
            field: "assignment".into(),
            message: format!("'{}': {}", err.text, err.reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_conversion() {
        let err: Error = crate::reservation::ValidationError {
            field: "turno".into(),
            message: "unknown turno".into(),
        }
        .into();
        assert!(matches!(err, Error::Validation { .. }));
        assert!(err.to_string().contains("turno"));
    }

    #[test]
    fn test_assignment_error_conversion() {
        let parse_err = "2+3+4".parse::<crate::table::TableAssignment>().unwrap_err();
        let err: Error = parse_err.into();
        assert!(err.to_string().contains("2+3+4"));
    }

    #[test]
    fn test_stale_precondition_display() {
        let err = Error::StalePrecondition {
            details: "table 5 was taken".into(),
        };
        assert!(err.to_string().contains("stale precondition"));
    }
}
