//! Tables command implementation.
//!
//! This module implements the `tables` command, which shows the floor
//! plan and the resolved per-service state of every table.

use clap::{Args, ValueEnum};
use std::io::Write;

use mesa::resolve_states;

use crate::error::CliError;
use crate::utils::{load_room, open_store, parse_date, parse_turno, GlobalOptions};

/// Show the floor plan and per-service table states.
#[derive(Args)]
pub struct TablesCommand {
    /// Service day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: String,

    /// Service turn (mediodia or noche)
    #[arg(long, value_name = "TURNO")]
    pub turno: String,

    /// Output format
    #[arg(long, value_enum, default_value = "table", ignore_case = true)]
    pub format: OutputFormat,
}

/// Output format for the tables command.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated table format (human-readable)
    Table,
    /// JSON format
    Json,
}

impl TablesCommand {
    /// Execute the tables command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let date = parse_date(&self.date)?;
        let turno = parse_turno(&self.turno)?;

        let (config, room) = load_room(global)?;
        let mut store = open_store(global, &config)?;
        let snapshot = store.load_snapshot(date, turno)?;
        let states = resolve_states(&room, &snapshot);

        for warning in states.warnings() {
            eprintln!("WARN: {warning}");
        }

        let stdout = std::io::stdout();
        let mut handle = stdout.lock();

        match self.format {
            OutputFormat::Table => {
                writeln!(handle, "TABLE\tSEATS\tTIER\tSTATE\tOCCUPANT")?;
                for (id, state) in states.iter() {
                    let Some(table) = room.catalog().get(id) else {
                        continue;
                    };
                    let occupant = states
                        .occupant(id)
                        .map_or_else(|| "-".to_string(), |r| r.to_string());
                    writeln!(
                        handle,
                        "{id}\t{}\t{}\t{state}\t{occupant}",
                        table.capacity.seats(),
                        table.capacity.tier(),
                    )?;
                }
            }
            OutputFormat::Json => {
                let json_data: Vec<serde_json::Value> = states
                    .iter()
                    .filter_map(|(id, state)| {
                        let table = room.catalog().get(id)?;
                        Some(serde_json::json!({
                            "table": id.value(),
                            "seats": table.capacity.seats(),
                            "tier": table.capacity.tier().to_string(),
                            "state": state.to_string(),
                            "occupant": states.occupant(id).map(mesa::ReservationId::value),
                        }))
                    })
                    .collect();
                serde_json::to_writer_pretty(&mut handle, &json_data)
                    .map_err(|e| CliError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
                writeln!(handle)?;
            }
        }

        Ok(())
    }
}
