//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{
    AssignCommand, AutoAssignCommand, AvailabilityCommand, BlockCommand, BookCommand,
    CancelCommand, CheckInCommand, InitCommand, ListCommand, PromoteCommand, TablesCommand,
    WaitlistCommand,
};

/// Command-line tool for restaurant table and reservation management.
#[derive(Parser)]
#[command(name = "mesa")]
#[command(version, about = "Manage restaurant tables and reservations", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Use an explicit configuration file
    #[arg(long, value_name = "PATH", global = true, env = "MESA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "MESA_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "MESA_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u32>,

    /// Describe what would happen without touching the database
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the data directory and database
    Init(InitCommand),

    /// Show the floor plan and per-service table states
    Tables(TablesCommand),

    /// Show the bookable slots for a party
    Availability(AvailabilityCommand),

    /// Book a table (auto-assigned unless --table is given)
    Book(BookCommand),

    /// Place an existing reservation on a specific table
    Assign(AssignCommand),

    /// Auto-assign tables to unassigned reservations
    Autoassign(AutoAssignCommand),

    /// List a service's reservations
    List(ListCommand),

    /// Cancel a reservation
    Cancel(CancelCommand),

    /// Check a party in (or undo a mistaken check-in)
    Checkin(CheckInCommand),

    /// Edit a service's walk-in blocks
    Block(BlockCommand),

    /// Inspect and work the waiting list
    Waitlist(WaitlistCommand),

    /// Promote a parked waiting-list entry into a reservation
    Promote(PromoteCommand),
}
