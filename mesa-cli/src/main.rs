//! Main entry point for the mesa CLI.
//!
//! This is the command-line interface for the mesa reservation system.
//! It provides commands for running a service from the front desk:
//! - `availability`: Show the bookable slots for a party
//! - `book`: Book a table, auto-assigned or pinned
//! - `assign` / `autoassign`: Place reservations on tables
//! - `waitlist` / `promote`: Work the waiting list

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    mesa::init_logger(cli.verbose, cli.quiet);

    // Convert CLI args to GlobalOptions
    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        config: cli.config,
        data_dir: cli.data_dir,
        busy_timeout: cli.busy_timeout,
        dry_run: cli.dry_run,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::Init(cmd) => cmd.execute(&global),
        cli::Command::Tables(cmd) => cmd.execute(&global),
        cli::Command::Availability(cmd) => cmd.execute(&global),
        cli::Command::Book(cmd) => cmd.execute(&global),
        cli::Command::Assign(cmd) => cmd.execute(&global),
        cli::Command::Autoassign(cmd) => cmd.execute(&global),
        cli::Command::List(cmd) => cmd.execute(&global),
        cli::Command::Cancel(cmd) => cmd.execute(&global),
        cli::Command::Checkin(cmd) => cmd.execute(&global),
        cli::Command::Block(cmd) => cmd.execute(&global),
        cli::Command::Waitlist(cmd) => cmd.execute(&global),
        cli::Command::Promote(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
