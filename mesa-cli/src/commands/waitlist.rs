//! Waitlist command implementation.
//!
//! This module implements the `waitlist` command: listing a service's
//! parked entries, moving them along the contact ladder with
//! `--mark`/`--status`, and dropping settled entries with `--remove`.

use clap::{Args, ValueEnum};
use std::io::Write;

use mesa::operations::{OperationPlan, PlanAction};
use mesa::{WaitingEntry, WaitingEntryId, WaitingStatus};

use crate::error::CliError;
use crate::utils::{execute_plan, load_room, open_store, parse_date, parse_turno, GlobalOptions};

/// Inspect and work the waiting list.
#[derive(Args)]
pub struct WaitlistCommand {
    /// Service day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: String,

    /// Service turn (mediodia or noche)
    #[arg(long, value_name = "TURNO")]
    pub turno: String,

    /// Move this entry along the ladder (requires --status)
    #[arg(long, value_name = "ENTRY", requires = "status")]
    pub mark: Option<i64>,

    /// The status to move the marked entry to
    #[arg(long, value_enum, requires = "mark")]
    pub status: Option<StatusArg>,

    /// Drop a settled (confirmed or rejected) entry from the list
    #[arg(long, value_name = "ENTRY", conflicts_with = "mark")]
    pub remove: Option<i64>,

    /// Output format
    #[arg(long, value_enum, default_value = "table", ignore_case = true)]
    pub format: OutputFormat,
}

/// Waiting-list statuses accepted on the command line.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum StatusArg {
    /// The client has been contacted about a freed slot
    Contacted,
    /// The entry was promoted into a reservation
    Confirmed,
    /// The client declined or never answered
    Rejected,
}

impl From<StatusArg> for WaitingStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Contacted => WaitingStatus::Contacted,
            StatusArg::Confirmed => WaitingStatus::Confirmed,
            StatusArg::Rejected => WaitingStatus::Rejected,
        }
    }
}

/// Output format for the waitlist command.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated table format (human-readable)
    Table,
    /// JSON format
    Json,
}

impl WaitlistCommand {
    /// Execute the waitlist command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let date = parse_date(&self.date)?;
        let turno = parse_turno(&self.turno)?;

        let (config, _room) = load_room(global)?;
        let mut store = open_store(global, &config)?;

        if let (Some(id), Some(status)) = (self.mark, self.status) {
            let entry_id = WaitingEntryId::new(id);
            let next = WaitingStatus::from(status);

            // Validate the ladder step before planning the write.
            let entry = store.get_waiting_entry(entry_id)?;
            entry
                .with_status(next)
                .map_err(|e| CliError::InvalidArguments(e.to_string()))?;

            let plan = OperationPlan::new(format!(
                "Mark waiting-list entry {entry_id} as {next}"
            ))
            .add_action(PlanAction::SetWaitingStatus {
                entry: entry_id,
                status: next,
            });
            execute_plan(&mut store, &plan, global)?;
            return Ok(());
        }

        if let Some(id) = self.remove {
            let entry_id = WaitingEntryId::new(id);
            let entry = store.get_waiting_entry(entry_id)?;
            if !matches!(
                entry.status(),
                WaitingStatus::Confirmed | WaitingStatus::Rejected
            ) {
                return Err(CliError::InvalidArguments(format!(
                    "entry {entry_id} is still {}, settle it before removing",
                    entry.status()
                )));
            }

            let plan = OperationPlan::new(format!(
                "Remove waiting-list entry {entry_id}"
            ))
            .add_action(PlanAction::RemoveWaitingEntry { entry: entry_id });
            execute_plan(&mut store, &plan, global)?;
            return Ok(());
        }

        let entries = store.list_waiting_entries(date, turno)?;
        match self.format {
            OutputFormat::Table => format_as_table(&entries)?,
            OutputFormat::Json => format_as_json(&entries)?,
        }

        Ok(())
    }
}

/// Format waiting-list entries as a human-readable table.
fn format_as_table(entries: &[WaitingEntry]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    writeln!(handle, "ID\tTIME\tCOVERS\tSTATUS\tCLIENT")?;
    for entry in entries {
        writeln!(
            handle,
            "{}\t{}\t{}\t{}\t{}",
            entry.id(),
            entry.time(),
            entry.party_size().covers(),
            entry.status(),
            entry.client(),
        )?;
    }

    Ok(())
}

/// Format waiting-list entries as JSON.
fn format_as_json(entries: &[WaitingEntry]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let json_data: Vec<serde_json::Value> = entries
        .iter()
        .map(|e| {
            serde_json::json!({
                "id": e.id().value(),
                "time": e.time().to_string(),
                "covers": e.party_size().covers(),
                "status": e.status().to_string(),
                "client": e.client(),
            })
        })
        .collect();

    serde_json::to_writer_pretty(&mut handle, &json_data)
        .map_err(|e| CliError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;

    writeln!(handle)?;

    Ok(())
}
