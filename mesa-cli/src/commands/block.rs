//! Block command implementation.
//!
//! This module implements the `block` command for editing a service's
//! walk-in blocks: manual blocks on top of the configured defaults, and
//! exceptions that re-open default-blocked tables. Without edit flags
//! the current configuration is shown.
//!
//! Saving is guarded by the configuration's version: if another
//! terminal saved in between, the save fails instead of overwriting.

use clap::Args;
use std::io::Write;

use mesa::operations::plan_save_blocks;
use mesa::TableId;

use crate::error::CliError;
use crate::utils::{execute_plan, load_room, open_store, parse_date, parse_turno, GlobalOptions};

/// Edit a service's walk-in blocks.
#[derive(Args)]
pub struct BlockCommand {
    /// Service day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: String,

    /// Service turn (mediodia or noche)
    #[arg(long, value_name = "TURNO")]
    pub turno: String,

    /// Hold these tables for walk-ins
    #[arg(long = "add", value_name = "TABLE")]
    pub add: Vec<u32>,

    /// Remove manual blocks from these tables
    #[arg(long = "remove", value_name = "TABLE")]
    pub remove: Vec<u32>,

    /// Re-open these default-blocked tables for reservations
    #[arg(long = "except", value_name = "TABLE")]
    pub except: Vec<u32>,

    /// Drop exceptions from these tables
    #[arg(long = "unexcept", value_name = "TABLE")]
    pub unexcept: Vec<u32>,
}

fn table_id(value: u32) -> Result<TableId, CliError> {
    TableId::try_from(value).map_err(|e| CliError::InvalidArguments(e.to_string()))
}

impl BlockCommand {
    /// Execute the block command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let date = parse_date(&self.date)?;
        let turno = parse_turno(&self.turno)?;

        let (config, room) = load_room(global)?;
        let mut store = open_store(global, &config)?;
        let mut blocks = store.load_blocks(date, turno)?;

        let no_edits = self.add.is_empty()
            && self.remove.is_empty()
            && self.except.is_empty()
            && self.unexcept.is_empty();
        if no_edits {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            let defaults = room.defaults().for_turno(turno);
            writeln!(handle, "default blocks: {}", format_ids(defaults.iter()))?;
            writeln!(handle, "manual blocks:  {}", format_ids(blocks.manual().iter()))?;
            writeln!(handle, "exceptions:     {}", format_ids(blocks.exceptions().iter()))?;
            return Ok(());
        }

        for value in self.add {
            blocks.block(table_id(value)?);
        }
        for value in self.remove {
            blocks.unblock(table_id(value)?);
        }
        for value in self.except {
            blocks.except(table_id(value)?);
        }
        for value in self.unexcept {
            blocks.unexcept(table_id(value)?);
        }

        let plan = plan_save_blocks(date, turno, blocks);
        execute_plan(&mut store, &plan, global)?;

        Ok(())
    }
}

fn format_ids<'a>(ids: impl Iterator<Item = &'a TableId>) -> String {
    let list: Vec<String> = ids.map(ToString::to_string).collect();
    if list.is_empty() {
        "none".to_string()
    } else {
        list.join(", ")
    }
}
