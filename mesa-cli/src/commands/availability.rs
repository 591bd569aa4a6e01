//! Availability command implementation.
//!
//! This module implements the `availability` command, which shows the
//! bookable slots of a service for a given party size.

use clap::{Args, ValueEnum};
use std::io::Write;

use mesa::{available_slots, Availability};

use crate::error::CliError;
use crate::utils::{load_room, open_store, parse_date, parse_party, parse_turno, GlobalOptions};

/// Show the bookable slots for a party.
#[derive(Args)]
pub struct AvailabilityCommand {
    /// Service day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: String,

    /// Service turn (mediodia or noche)
    #[arg(long, value_name = "TURNO")]
    pub turno: String,

    /// Party size (1 to 6 covers)
    #[arg(long, value_name = "COVERS")]
    pub party: u8,

    /// Output format
    #[arg(long, value_enum, default_value = "table", ignore_case = true)]
    pub format: OutputFormat,
}

/// Output format for the availability command.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One slot per line (human-readable)
    Table,
    /// JSON format
    Json,
}

impl AvailabilityCommand {
    /// Execute the availability command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let date = parse_date(&self.date)?;
        let turno = parse_turno(&self.turno)?;
        let party = parse_party(self.party)?;

        let (config, room) = load_room(global)?;
        let mut store = open_store(global, &config)?;
        let snapshot = store.load_snapshot(date, turno)?;
        let availability = available_slots(&room, &snapshot, party);

        let stdout = std::io::stdout();
        let mut handle = stdout.lock();

        match self.format {
            OutputFormat::Table => match &availability {
                Availability::Open { slots } => {
                    for slot in slots {
                        writeln!(handle, "{slot}")?;
                    }
                }
                Availability::Closed { reason } => {
                    writeln!(handle, "closed: {reason}")?;
                }
            },
            OutputFormat::Json => {
                let json_data = match &availability {
                    Availability::Open { slots } => serde_json::json!({
                        "open": true,
                        "slots": slots.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    }),
                    Availability::Closed { reason } => serde_json::json!({
                        "open": false,
                        "reason": reason.to_string(),
                    }),
                };
                serde_json::to_writer_pretty(&mut handle, &json_data)
                    .map_err(|e| CliError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
                writeln!(handle)?;
            }
        }

        Ok(())
    }
}
