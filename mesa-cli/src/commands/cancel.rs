//! Cancel command implementation.

use clap::Args;

use mesa::operations::plan_cancel;
use mesa::ReservationId;

use crate::error::CliError;
use crate::utils::{execute_plan, load_room, open_store, GlobalOptions};

/// Cancel a reservation, freeing its table.
#[derive(Args)]
pub struct CancelCommand {
    /// Reservation id
    #[arg(value_name = "RESERVATION")]
    pub reservation: i64,
}

impl CancelCommand {
    /// Execute the cancel command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let reservation = ReservationId::new(self.reservation);

        let (config, _room) = load_room(global)?;
        let mut store = open_store(global, &config)?;

        let existing = store.get_reservation(reservation)?;
        let snapshot = store.load_snapshot(existing.date(), existing.turno())?;

        let plan = plan_cancel(&snapshot, reservation)?;
        execute_plan(&mut store, &plan, global)?;

        Ok(())
    }
}
