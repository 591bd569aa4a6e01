//! Book command implementation.
//!
//! This module implements the `book` command: plan a booking against
//! the current snapshot and apply it. Full tiers park the booking on
//! the waiting list instead of refusing it.

use clap::Args;

use mesa::operations::{plan_booking, BookingOutcome, BookingRequest};

use crate::error::CliError;
use crate::utils::{
    execute_plan, load_room, open_store, parse_date, parse_party, parse_table, parse_time,
    parse_turno, GlobalOptions,
};

/// Book a table.
#[derive(Args)]
pub struct BookCommand {
    /// Service day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: String,

    /// Service turn (mediodia or noche)
    #[arg(long, value_name = "TURNO")]
    pub turno: String,

    /// Slot time (HH:MM)
    #[arg(long, value_name = "TIME")]
    pub time: String,

    /// Party size (1 to 6 covers)
    #[arg(long, value_name = "COVERS")]
    pub party: u8,

    /// Client name
    #[arg(long, value_name = "NAME")]
    pub client: String,

    /// Pin the booking to a table (`7`) or merged pair (`2+3`)
    /// instead of auto-assigning
    #[arg(long, value_name = "TABLE")]
    pub table: Option<String>,

    /// Confirm taking a table held for walk-ins
    #[arg(long)]
    pub confirm_walk_in: bool,
}

impl BookCommand {
    /// Execute the book command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut request = BookingRequest::new(
            parse_date(&self.date)?,
            parse_turno(&self.turno)?,
            parse_time(&self.time)?,
            parse_party(self.party)?,
            self.client,
        );
        if let Some(ref table) = self.table {
            request = request.with_table(parse_table(table)?);
        }
        if self.confirm_walk_in {
            request = request.confirm_walk_in();
        }

        let (config, room) = load_room(global)?;
        let mut store = open_store(global, &config)?;
        let snapshot = store.load_snapshot(request.date, request.turno)?;

        match plan_booking(&room, &snapshot, &request)? {
            BookingOutcome::Booked { plan, assignment } => {
                let result = execute_plan(&mut store, &plan, global)?;
                if !global.quiet {
                    if let Some(id) = result.reservation {
                        println!("Reservation {id} on table {assignment}");
                    }
                }
            }
            BookingOutcome::Waitlisted { plan, tier } => {
                let result = execute_plan(&mut store, &plan, global)?;
                if !global.quiet {
                    eprintln!("The {tier} tier is full for this service");
                    if let Some(id) = result.waiting_entry {
                        println!("Waiting-list entry {id}");
                    }
                }
            }
        }

        Ok(())
    }
}
