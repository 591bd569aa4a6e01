//! List command implementation.
//!
//! This module implements the `list` command, which displays a
//! service's reservations in table or JSON form.

use clap::{Args, ValueEnum};
use serde::Serialize;
use std::io::Write;

use mesa::{CheckInState, Reservation};

use crate::error::CliError;
use crate::utils::{load_room, open_store, parse_date, parse_turno, GlobalOptions};

/// Column headers for table output.
const COLUMN_HEADERS: [&str; 6] = ["id", "time", "covers", "table", "checked_in", "client"];

/// List a service's reservations.
#[derive(Args)]
pub struct ListCommand {
    /// Service day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: String,

    /// Service turn (mediodia or noche)
    #[arg(long, value_name = "TURNO")]
    pub turno: String,

    /// Only show reservations without a table
    #[arg(long)]
    pub unassigned: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "table", ignore_case = true)]
    pub format: OutputFormat,
}

/// Output format for the list command.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated table format (human-readable)
    Table,
    /// JSON format
    Json,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let date = parse_date(&self.date)?;
        let turno = parse_turno(&self.turno)?;

        let (config, _room) = load_room(global)?;
        let store = open_store(global, &config)?;
        let mut reservations = store.list_reservations(date, turno)?;

        if self.unassigned {
            reservations.retain(|r| r.assigned_table().is_none());
        }

        match self.format {
            OutputFormat::Table => format_as_table(&reservations)?,
            OutputFormat::Json => format_as_json(&reservations)?,
        }

        Ok(())
    }
}

/// Format reservations as a human-readable table.
fn format_as_table(reservations: &[Reservation]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let header_line = COLUMN_HEADERS
        .iter()
        .map(|s| s.to_uppercase())
        .collect::<Vec<_>>()
        .join("\t");
    writeln!(handle, "{header_line}")?;

    for res in reservations {
        let table = res
            .assigned_table()
            .map_or_else(|| "-".to_string(), |a| a.to_string());
        let checked_in = match res.check_in() {
            CheckInState::Arrived => "yes",
            CheckInState::None => "no",
        };
        writeln!(
            handle,
            "{}\t{}\t{}\t{table}\t{checked_in}\t{}",
            res.id(),
            res.time(),
            res.party_size().covers(),
            res.client(),
        )?;
    }

    Ok(())
}

/// One reservation row in JSON output.
#[derive(Serialize)]
struct ReservationRow {
    id: i64,
    time: String,
    covers: u8,
    table: Option<String>,
    checked_in: bool,
    client: String,
}

impl From<&Reservation> for ReservationRow {
    fn from(r: &Reservation) -> Self {
        Self {
            id: r.id().value(),
            time: r.time().to_string(),
            covers: r.party_size().covers(),
            table: r.assigned_table().map(|a| a.to_string()),
            checked_in: r.check_in() == CheckInState::Arrived,
            client: r.client().to_string(),
        }
    }
}

/// Format reservations as JSON.
fn format_as_json(reservations: &[Reservation]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let rows: Vec<ReservationRow> = reservations.iter().map(ReservationRow::from).collect();

    serde_json::to_writer_pretty(&mut handle, &rows)
        .map_err(|e| CliError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;

    writeln!(handle)?;

    Ok(())
}
