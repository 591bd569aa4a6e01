//! Promote command implementation.
//!
//! This module implements the `promote` command, which turns a parked
//! waiting-list entry into a reservation after re-verifying
//! availability against the current snapshot, marking the entry
//! confirmed on success.

use clap::Args;

use mesa::operations::plan_promote;
use mesa::WaitingEntryId;

use crate::error::CliError;
use crate::utils::{execute_plan, load_room, open_store, GlobalOptions};

/// Promote a parked waiting-list entry into a reservation.
#[derive(Args)]
pub struct PromoteCommand {
    /// Waiting-list entry id
    #[arg(value_name = "ENTRY")]
    pub entry: i64,
}

impl PromoteCommand {
    /// Execute the promote command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let (config, room) = load_room(global)?;
        let mut store = open_store(global, &config)?;

        let entry = store.get_waiting_entry(WaitingEntryId::new(self.entry))?;
        let snapshot = store.load_snapshot(entry.date(), entry.turno())?;

        let plan = plan_promote(&room, &snapshot, &entry)?;
        let result = execute_plan(&mut store, &plan, global)?;

        if !global.quiet {
            if let Some(id) = result.reservation {
                println!("Reservation {id} for {}", entry.client());
            }
        }

        Ok(())
    }
}
