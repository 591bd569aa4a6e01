//! Utility functions for CLI operations.
//!
//! This module provides the pieces every command needs: global option
//! handling, configuration loading, store opening, argument parsing,
//! and the shared execute-and-report step.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use mesa::config::{Config, ConfigLoader, ConfigValidator};
use mesa::operations::{OperationPlan, PlanExecutor};
use mesa::store::{resolve_database_path, Store, StoreConfig};
use mesa::{DiningRoom, PartySize, SlotTime, TableAssignment, Turno};

use crate::error::CliError;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Explicit configuration file location.
    pub config: Option<PathBuf>,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds).
    pub busy_timeout: Option<u32>,

    /// Describe the plan without applying it.
    pub dry_run: bool,
}

/// Loads the dining-room configuration and materializes the floor plan.
pub fn load_room(global: &GlobalOptions) -> Result<(Config, DiningRoom), CliError> {
    let config = ConfigLoader::load(global.config.as_deref())?;
    let room = ConfigValidator::materialize(&config)?;
    Ok((config, room))
}

/// Opens the reservation store.
///
/// The database path comes from `--data-dir`, then the configuration
/// file's `database` entry, then `$MESA_DATA_DIR`, then `~/.mesa`.
pub fn open_store(global: &GlobalOptions, config: &Config) -> Result<Store, CliError> {
    let path = if let Some(ref dir) = global.data_dir {
        dir.join("mesa.db")
    } else if let Some(ref path) = config.database {
        path.clone()
    } else {
        resolve_database_path()?
    };

    let mut store_config = StoreConfig::new(path);
    if let Some(seconds) = global.busy_timeout {
        store_config = store_config.with_busy_timeout(Duration::from_secs(seconds.into()));
    }
    Store::open(store_config).map_err(CliError::from)
}

/// Executes a plan, honoring `--dry-run`, and reports what happened.
pub fn execute_plan(
    store: &mut Store,
    plan: &OperationPlan,
    global: &GlobalOptions,
) -> Result<mesa::operations::ExecutionResult, CliError> {
    let mut executor = PlanExecutor::new(store);
    if global.dry_run {
        executor = executor.dry_run();
    }
    let result = executor.execute(plan)?;

    if !global.quiet {
        if result.dry_run {
            println!("Dry run: {}", plan.description);
            for action in &result.actions_taken {
                println!("  would {}", lowercase_first(action));
            }
        } else {
            println!("{}", plan.description);
            if global.verbose {
                for action in &result.actions_taken {
                    println!("  {action}");
                }
            }
        }
        for warning in &result.warnings {
            eprintln!("WARN: {warning}");
        }
    }

    Ok(result)
}

/// Shortens a path for display.
///
/// Paths under the home directory are shown as `~/...`; everything
/// else is shown in full.
pub fn shorten_path(path: &Path) -> String {
    if let Some(home) = home::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Parses a `YYYY-MM-DD` date argument.
pub fn parse_date(text: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| CliError::InvalidArguments(format!("'{text}' is not a YYYY-MM-DD date")))
}

/// Parses a turno argument (`mediodia` or `noche`).
pub fn parse_turno(text: &str) -> Result<Turno, CliError> {
    text.parse()
        .map_err(|_| CliError::InvalidArguments(format!("'{text}' is not a turno")))
}

/// Parses an `HH:MM` slot time argument.
pub fn parse_time(text: &str) -> Result<SlotTime, CliError> {
    text.parse()
        .map_err(|_| CliError::InvalidArguments(format!("'{text}' is not an HH:MM time")))
}

/// Parses a party size argument.
pub fn parse_party(value: u8) -> Result<PartySize, CliError> {
    PartySize::try_from(value)
        .map_err(|e| CliError::InvalidArguments(e.to_string()))
}

/// Parses a table argument: a single id like `7` or a pair like `2+3`.
pub fn parse_table(text: &str) -> Result<TableAssignment, CliError> {
    text.parse()
        .map_err(|e: mesa::table::InvalidAssignmentError| {
            CliError::InvalidArguments(e.to_string())
        })
}
