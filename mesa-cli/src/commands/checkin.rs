//! Checkin command implementation.
//!
//! This module implements the `checkin` command, which records a
//! party's arrival (moving its table from reserved to occupied) or
//! undoes a mistaken check-in with `--undo`.

use clap::Args;

use mesa::operations::{plan_check_in, plan_undo_check_in};
use mesa::ReservationId;

use crate::error::CliError;
use crate::utils::{execute_plan, load_room, open_store, GlobalOptions};

/// Check a party in, or undo a mistaken check-in.
#[derive(Args)]
pub struct CheckInCommand {
    /// Reservation id
    #[arg(value_name = "RESERVATION")]
    pub reservation: i64,

    /// Undo a mistaken check-in
    #[arg(long)]
    pub undo: bool,
}

impl CheckInCommand {
    /// Execute the checkin command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let reservation = ReservationId::new(self.reservation);

        let (config, _room) = load_room(global)?;
        let mut store = open_store(global, &config)?;

        let existing = store.get_reservation(reservation)?;
        let snapshot = store.load_snapshot(existing.date(), existing.turno())?;

        let plan = if self.undo {
            plan_undo_check_in(&snapshot, reservation)?
        } else {
            plan_check_in(&snapshot, reservation)?
        };
        execute_plan(&mut store, &plan, global)?;

        Ok(())
    }
}
