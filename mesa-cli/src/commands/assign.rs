//! Assign command implementation.
//!
//! This module implements the `assign` command, which places an
//! existing reservation on a specific table or merged pair. With
//! `--force`, a conflicting occupant is relocated in the same atomic
//! step.

use clap::Args;

use mesa::operations::{plan_assign, AssignRequest};
use mesa::ReservationId;

use crate::error::CliError;
use crate::utils::{execute_plan, load_room, open_store, parse_table, GlobalOptions};

/// Place a reservation on a specific table.
#[derive(Args)]
pub struct AssignCommand {
    /// Reservation id
    #[arg(value_name = "RESERVATION")]
    pub reservation: i64,

    /// Table (`7`) or merged pair (`2+3`)
    #[arg(value_name = "TABLE")]
    pub table: String,

    /// Confirm taking a table held for walk-ins
    #[arg(long)]
    pub confirm_walk_in: bool,

    /// Relocate a conflicting occupant to another table
    #[arg(long)]
    pub force: bool,
}

impl AssignCommand {
    /// Execute the assign command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let reservation = ReservationId::new(self.reservation);
        let assignment = parse_table(&self.table)?;

        let (config, room) = load_room(global)?;
        let mut store = open_store(global, &config)?;

        // The reservation names its own service.
        let existing = store.get_reservation(reservation)?;
        let snapshot = store.load_snapshot(existing.date(), existing.turno())?;

        let request = AssignRequest {
            reservation,
            assignment,
            confirm_walk_in: self.confirm_walk_in,
            force: self.force,
        };
        let plan = plan_assign(&room, &snapshot, &request)?;
        execute_plan(&mut store, &plan, global)?;

        Ok(())
    }
}
