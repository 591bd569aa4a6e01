//! Autoassign command implementation.
//!
//! This module implements the `autoassign` command: either the batch
//! pass placing every unassigned reservation of a service in arrival
//! order, or a single reservation when `--reservation` is given.

use clap::Args;

use mesa::operations::{plan_auto_assign, plan_auto_assign_pending};
use mesa::ReservationId;

use crate::error::CliError;
use crate::utils::{execute_plan, load_room, open_store, parse_date, parse_turno, GlobalOptions};

/// Auto-assign tables to unassigned reservations.
#[derive(Args)]
pub struct AutoAssignCommand {
    /// Service day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: String,

    /// Service turn (mediodia or noche)
    #[arg(long, value_name = "TURNO")]
    pub turno: String,

    /// Only assign this reservation
    #[arg(long, value_name = "RESERVATION")]
    pub reservation: Option<i64>,
}

impl AutoAssignCommand {
    /// Execute the autoassign command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let date = parse_date(&self.date)?;
        let turno = parse_turno(&self.turno)?;

        let (config, room) = load_room(global)?;
        let mut store = open_store(global, &config)?;
        let snapshot = store.load_snapshot(date, turno)?;

        let plan = match self.reservation {
            Some(id) => plan_auto_assign(&room, &snapshot, ReservationId::new(id))?,
            None => plan_auto_assign_pending(&room, &snapshot),
        };

        if plan.is_empty() && plan.warnings.is_empty() {
            if !global.quiet {
                println!("Nothing to assign");
            }
            return Ok(());
        }

        execute_plan(&mut store, &plan, global)?;
        Ok(())
    }
}
