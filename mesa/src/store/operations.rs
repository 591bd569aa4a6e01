//! Store CRUD operations for reservations, holds, block configs, and
//! the waiting list.
//!
//! Every write that touches a table assignment also writes the
//! corresponding `table_holds` rows; the holds' primary key turns a
//! double-booking into a constraint violation, which is surfaced as
//! [`Error::StalePrecondition`] so callers know to re-plan against a
//! fresh snapshot.

use chrono::NaiveDate;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, TransactionBehavior};

use crate::blocks::BlockConfig;
use crate::error::{Error, Result};
use crate::reservation::{
    CheckInState, PartySize, Reservation, ReservationId, SlotTime, Turno,
};
use crate::snapshot::ServiceSnapshot;
use crate::table::TableAssignment;
use crate::waitlist::{WaitingEntry, WaitingEntryId, WaitingStatus};

use super::connection::Store;

/// The data needed to create a reservation; the id is allocated by the
/// store.
#[derive(Debug, Clone)]
pub struct NewReservation {
    /// The calendar day of the booking.
    pub date: NaiveDate,
    /// The meal turn.
    pub turno: Turno,
    /// The booked slot time.
    pub time: SlotTime,
    /// The party size.
    pub party_size: PartySize,
    /// The client reference.
    pub client: String,
    /// An assignment to write together with the reservation, if any.
    pub assignment: Option<TableAssignment>,
}

/// The data needed to park a waiting-list entry.
#[derive(Debug, Clone)]
pub struct NewWaitingEntry {
    /// The requested calendar day.
    pub date: NaiveDate,
    /// The requested meal turn.
    pub turno: Turno,
    /// The requested slot time.
    pub time: SlotTime,
    /// The party size.
    pub party_size: PartySize,
    /// The client reference.
    pub client: String,
}

const SELECT_RESERVATION: &str = r"
    SELECT id, date, turno, time, party_size, assigned_table, check_in, client
    FROM reservations
    WHERE id = ? AND cancelled = 0
";

const LIST_SERVICE_RESERVATIONS: &str = r"
    SELECT id, date, turno, time, party_size, assigned_table, check_in, client
    FROM reservations
    WHERE date = ? AND turno = ? AND cancelled = 0
    ORDER BY time, id
";

const SELECT_WAITING: &str = r"
    SELECT id, date, turno, time, party_size, client, status
    FROM waiting_entries
    WHERE id = ?
";

const LIST_SERVICE_WAITING: &str = r"
    SELECT id, date, turno, time, party_size, client, status
    FROM waiting_entries
    WHERE date = ? AND turno = ?
    ORDER BY id
";

fn parse_failure(e: impl std::error::Error + Send + Sync + 'static) -> rusqlite::Error {
    rusqlite::Error::ToSqlConversionFailure(Box::new(e))
}

fn row_to_reservation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reservation> {
    let id: i64 = row.get(0)?;
    let date: String = row.get(1)?;
    let turno: String = row.get(2)?;
    let time: String = row.get(3)?;
    let party_size: u8 = row.get(4)?;
    let assigned: Option<String> = row.get(5)?;
    let check_in: String = row.get(6)?;
    let client: String = row.get(7)?;

    let date: NaiveDate = date.parse().map_err(parse_failure)?;
    let turno: Turno = turno.parse().map_err(parse_failure)?;
    let time: SlotTime = time.parse().map_err(parse_failure)?;
    let party_size = PartySize::try_from(party_size).map_err(parse_failure)?;
    let assigned = assigned
        .map(|s| s.parse::<TableAssignment>())
        .transpose()
        .map_err(parse_failure)?;
    let check_in = if check_in == "arrived" {
        CheckInState::Arrived
    } else {
        CheckInState::None
    };

    Reservation::builder(ReservationId::new(id), date, turno, time, party_size)
        .client(client)
        .assigned_table(assigned)
        .check_in(check_in)
        .build()
        .map_err(parse_failure)
}

fn row_to_waiting(row: &rusqlite::Row<'_>) -> rusqlite::Result<WaitingEntry> {
    let id: i64 = row.get(0)?;
    let date: String = row.get(1)?;
    let turno: String = row.get(2)?;
    let time: String = row.get(3)?;
    let party_size: u8 = row.get(4)?;
    let client: String = row.get(5)?;
    let status: String = row.get(6)?;

    WaitingEntry::builder(
        WaitingEntryId::new(id),
        date.parse().map_err(parse_failure)?,
        turno.parse::<Turno>().map_err(parse_failure)?,
        time.parse::<SlotTime>().map_err(parse_failure)?,
        PartySize::try_from(party_size).map_err(parse_failure)?,
    )
    .client(client)
    .status(status.parse::<WaitingStatus>().map_err(parse_failure)?)
    .build()
    .map_err(parse_failure)
}

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation
    )
}

// Connection-level primitives, shared by single-shot store methods and
// the plan executor's transactions.

pub(crate) fn insert_reservation_row(conn: &Connection, new: &NewReservation) -> Result<i64> {
    conn.execute(
        r"INSERT INTO reservations (date, turno, time, party_size, assigned_table, check_in, client)
          VALUES (?, ?, ?, ?, ?, 'none', ?)",
        params![
            new.date.to_string(),
            new.turno.to_string(),
            new.time.to_string(),
            new.party_size.covers(),
            new.assignment.map(|a| a.to_string()),
            new.client,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Writes one hold row per member table. The holds' primary key rejects
/// a member already held for this service.
pub(crate) fn insert_holds(
    conn: &Connection,
    date: NaiveDate,
    turno: Turno,
    assignment: &TableAssignment,
    reservation: ReservationId,
) -> Result<()> {
    for member in assignment.members() {
        let result = conn.execute(
            "INSERT INTO table_holds (date, turno, table_id, reservation_id) VALUES (?, ?, ?, ?)",
            params![
                date.to_string(),
                turno.to_string(),
                member.value(),
                reservation.value()
            ],
        );
        match result {
            Ok(_) => {}
            Err(e) if is_constraint_violation(&e) => {
                return Err(Error::StalePrecondition {
                    details: format!("table {member} was taken by a concurrent write"),
                });
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

pub(crate) fn clear_holds(conn: &Connection, reservation: ReservationId) -> Result<()> {
    conn.execute(
        "DELETE FROM table_holds WHERE reservation_id = ?",
        params![reservation.value()],
    )?;
    Ok(())
}

pub(crate) fn update_assignment_row(
    conn: &Connection,
    reservation: ReservationId,
    assignment: Option<&TableAssignment>,
) -> Result<()> {
    let changed = conn.execute(
        "UPDATE reservations SET assigned_table = ? WHERE id = ? AND cancelled = 0",
        params![assignment.map(ToString::to_string), reservation.value()],
    )?;
    if changed == 0 {
        return Err(Error::NotFound {
            resource: format!("reservation {reservation}"),
        });
    }
    Ok(())
}

pub(crate) fn update_check_in_row(
    conn: &Connection,
    reservation: ReservationId,
    state: CheckInState,
) -> Result<()> {
    let value = match state {
        CheckInState::Arrived => "arrived",
        CheckInState::None => "none",
    };
    let changed = conn.execute(
        "UPDATE reservations SET check_in = ? WHERE id = ? AND cancelled = 0",
        params![value, reservation.value()],
    )?;
    if changed == 0 {
        return Err(Error::NotFound {
            resource: format!("reservation {reservation}"),
        });
    }
    Ok(())
}

pub(crate) fn mark_cancelled_row(conn: &Connection, reservation: ReservationId) -> Result<()> {
    let changed = conn.execute(
        "UPDATE reservations SET cancelled = 1 WHERE id = ? AND cancelled = 0",
        params![reservation.value()],
    )?;
    if changed == 0 {
        return Err(Error::NotFound {
            resource: format!("reservation {reservation}"),
        });
    }
    Ok(())
}

pub(crate) fn get_reservation_row(
    conn: &Connection,
    id: ReservationId,
) -> Result<Option<Reservation>> {
    conn.query_row(SELECT_RESERVATION, params![id.value()], row_to_reservation)
        .optional()
        .map_err(Error::from)
}

pub(crate) fn load_blocks_row(
    conn: &Connection,
    date: NaiveDate,
    turno: Turno,
) -> Result<BlockConfig> {
    let row = conn
        .query_row(
            "SELECT manual, exceptions, version FROM block_configs WHERE date = ? AND turno = ?",
            params![date.to_string(), turno.to_string()],
            |row| {
                let manual: String = row.get(0)?;
                let exceptions: String = row.get(1)?;
                let version: u64 = row.get(2)?;
                Ok((manual, exceptions, version))
            },
        )
        .optional()?;

    match row {
        None => Ok(BlockConfig::empty()),
        Some((manual, exceptions, version)) => {
            let manual = serde_json::from_str(&manual).map_err(|e| Error::DatabaseCorruption {
                details: format!("bad manual block list: {e}"),
            })?;
            let exceptions =
                serde_json::from_str(&exceptions).map_err(|e| Error::DatabaseCorruption {
                    details: format!("bad exception list: {e}"),
                })?;
            Ok(BlockConfig::new(manual, exceptions, version))
        }
    }
}

/// Saves a block configuration with compare-and-swap on its version.
///
/// The write only succeeds when the stored version still equals the
/// version the configuration was loaded at; the saved row carries
/// version + 1. Returns the new version.
pub(crate) fn save_blocks_row(
    conn: &Connection,
    date: NaiveDate,
    turno: Turno,
    config: &BlockConfig,
) -> Result<u64> {
    let manual = serde_json::to_string(config.manual()).map_err(|e| Error::Validation {
        field: "blocks".into(),
        message: e.to_string(),
    })?;
    let exceptions = serde_json::to_string(config.exceptions()).map_err(|e| Error::Validation {
        field: "blocks".into(),
        message: e.to_string(),
    })?;
    let next = config.version() + 1;

    let changed = if config.version() == 0 {
        let result = conn.execute(
            r"INSERT INTO block_configs (date, turno, manual, exceptions, version)
              VALUES (?, ?, ?, ?, ?)",
            params![date.to_string(), turno.to_string(), manual, exceptions, next],
        );
        match result {
            Ok(n) => n,
            Err(e) if is_constraint_violation(&e) => 0,
            Err(e) => return Err(e.into()),
        }
    } else {
        conn.execute(
            r"UPDATE block_configs SET manual = ?, exceptions = ?, version = ?
              WHERE date = ? AND turno = ? AND version = ?",
            params![
                manual,
                exceptions,
                next,
                date.to_string(),
                turno.to_string(),
                config.version()
            ],
        )?
    };

    if changed == 0 {
        return Err(Error::StalePrecondition {
            details: format!(
                "block configuration for {date}/{turno} was changed by another admin"
            ),
        });
    }
    Ok(next)
}

pub(crate) fn insert_waiting_row(conn: &Connection, new: &NewWaitingEntry) -> Result<i64> {
    conn.execute(
        r"INSERT INTO waiting_entries (date, turno, time, party_size, client, status)
          VALUES (?, ?, ?, ?, ?, 'pending')",
        params![
            new.date.to_string(),
            new.turno.to_string(),
            new.time.to_string(),
            new.party_size.covers(),
            new.client,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn get_waiting_row(
    conn: &Connection,
    id: WaitingEntryId,
) -> Result<Option<WaitingEntry>> {
    conn.query_row(SELECT_WAITING, params![id.value()], row_to_waiting)
        .optional()
        .map_err(Error::from)
}

pub(crate) fn delete_waiting_row(conn: &Connection, id: WaitingEntryId) -> Result<()> {
    let changed = conn.execute(
        "DELETE FROM waiting_entries WHERE id = ?",
        params![id.value()],
    )?;
    if changed == 0 {
        return Err(Error::NotFound {
            resource: format!("waiting-list entry {id}"),
        });
    }
    Ok(())
}

pub(crate) fn update_waiting_status_row(
    conn: &Connection,
    id: WaitingEntryId,
    status: WaitingStatus,
) -> Result<()> {
    let changed = conn.execute(
        "UPDATE waiting_entries SET status = ? WHERE id = ?",
        params![status.to_string(), id.value()],
    )?;
    if changed == 0 {
        return Err(Error::NotFound {
            resource: format!("waiting-list entry {id}"),
        });
    }
    Ok(())
}

impl Store {
    /// Creates a reservation, writing its table holds in the same
    /// transaction when an assignment is included.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StalePrecondition`] when a requested table is
    /// already held for the service, or a database error.
    pub fn create_reservation(&mut self, new: &NewReservation) -> Result<Reservation> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let id = insert_reservation_row(&tx, new)?;
        if let Some(assignment) = new.assignment {
            insert_holds(&tx, new.date, new.turno, &assignment, ReservationId::new(id))?;
        }
        tx.commit()?;

        self.get_reservation(ReservationId::new(id))
    }

    /// Fetches an active reservation by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for unknown or cancelled ids.
    pub fn get_reservation(&self, id: ReservationId) -> Result<Reservation> {
        get_reservation_row(&self.conn, id)?.ok_or_else(|| Error::NotFound {
            resource: format!("reservation {id}"),
        })
    }

    /// Lists active reservations for one service in (time, id) order.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub fn list_reservations(&self, date: NaiveDate, turno: Turno) -> Result<Vec<Reservation>> {
        let mut stmt = self.conn.prepare(LIST_SERVICE_RESERVATIONS)?;
        let rows = stmt.query_map(
            params![date.to_string(), turno.to_string()],
            row_to_reservation,
        )?;
        let mut reservations = Vec::new();
        for row in rows {
            reservations.push(row?);
        }
        Ok(reservations)
    }

    /// Loads a consistent snapshot of one service: its active
    /// reservations and block configuration in a single read
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns a database error if the reads fail.
    pub fn load_snapshot(&mut self, date: NaiveDate, turno: Turno) -> Result<ServiceSnapshot> {
        let tx = self.conn.transaction()?;
        let blocks = load_blocks_row(&tx, date, turno)?;

        let reservations = {
            let mut stmt = tx.prepare(LIST_SERVICE_RESERVATIONS)?;
            let rows = stmt.query_map(
                params![date.to_string(), turno.to_string()],
                row_to_reservation,
            )?;
            let mut reservations = Vec::new();
            for row in rows {
                reservations.push(row?);
            }
            reservations
        };
        tx.commit()?;

        Ok(ServiceSnapshot::new(date, turno, reservations, blocks))
    }

    /// Loads the block configuration for a service (empty at version 0
    /// when none was ever saved).
    ///
    /// # Errors
    ///
    /// Returns a database error if the read fails.
    pub fn load_blocks(&self, date: NaiveDate, turno: Turno) -> Result<BlockConfig> {
        load_blocks_row(&self.conn, date, turno)
    }

    /// Saves a block configuration, detecting concurrent edits through
    /// its version. Returns the configuration at its new version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StalePrecondition`] when another admin saved the
    /// same service's configuration in between.
    pub fn save_blocks(
        &mut self,
        date: NaiveDate,
        turno: Turno,
        config: &BlockConfig,
    ) -> Result<BlockConfig> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let next = save_blocks_row(&tx, date, turno, config)?;
        tx.commit()?;
        Ok(config.clone().at_version(next))
    }

    /// Parks a new waiting-list entry as `Pending`.
    ///
    /// # Errors
    ///
    /// Returns a database error if the insert fails.
    pub fn add_waiting_entry(&mut self, new: &NewWaitingEntry) -> Result<WaitingEntry> {
        let id = insert_waiting_row(&self.conn, new)?;
        self.get_waiting_entry(WaitingEntryId::new(id))
    }

    /// Fetches a waiting-list entry by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for unknown ids.
    pub fn get_waiting_entry(&self, id: WaitingEntryId) -> Result<WaitingEntry> {
        get_waiting_row(&self.conn, id)?.ok_or_else(|| Error::NotFound {
            resource: format!("waiting-list entry {id}"),
        })
    }

    /// Lists a service's waiting-list entries in arrival order.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub fn list_waiting_entries(
        &self,
        date: NaiveDate,
        turno: Turno,
    ) -> Result<Vec<WaitingEntry>> {
        let mut stmt = self.conn.prepare(LIST_SERVICE_WAITING)?;
        let rows = stmt.query_map(params![date.to_string(), turno.to_string()], row_to_waiting)?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    /// Moves a waiting-list entry along the status ladder.
    ///
    /// # Errors
    ///
    /// Returns a validation error for illegal transitions, or
    /// [`Error::NotFound`] for unknown ids.
    pub fn set_waiting_status(
        &mut self,
        id: WaitingEntryId,
        status: WaitingStatus,
    ) -> Result<WaitingEntry> {
        let entry = self.get_waiting_entry(id)?;
        let updated = entry.with_status(status)?;
        update_waiting_status_row(&self.conn, id, status)?;
        Ok(updated)
    }
}
