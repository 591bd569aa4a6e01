//! Init command implementation.
//!
//! This module implements the `init` command for explicitly creating
//! the mesa data directory, database, and optionally a starter
//! configuration file.

use clap::Args;
use std::path::PathBuf;

use mesa::config::Config;
use mesa::store::{default_data_dir, Store, StoreConfig};

use crate::error::CliError;
use crate::utils::{shorten_path, GlobalOptions};

/// Initialize the mesa data directory and database.
#[derive(Args)]
pub struct InitCommand {
    /// Data directory to initialize
    #[arg(long, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    /// Write a default configuration file alongside the database
    #[arg(long)]
    with_config: bool,
}

impl InitCommand {
    /// Execute the init command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // Priority: command flag > global flag > default
        let data_dir = match self.data_dir.or_else(|| global.data_dir.clone()) {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        let db_path = data_dir.join("mesa.db");
        let config_path = data_dir.join("config.yaml");

        if global.dry_run {
            println!("Would initialize mesa in: {}", shorten_path(&data_dir));
            if !db_path.exists() {
                println!("  - Create database: {}", shorten_path(&db_path));
            }
            if self.with_config && !config_path.exists() {
                println!("  - Create configuration file: {}", shorten_path(&config_path));
            }
            return Ok(());
        }

        // Opening the store creates the directory and schema.
        let database_created = !db_path.exists();
        Store::open(StoreConfig::new(&db_path))?;

        let mut config_created = false;
        if self.with_config && !config_path.exists() {
            let yaml = serde_yaml::to_string(&Config::default())
                .map_err(|e| CliError::Config(e.to_string()))?;
            std::fs::write(&config_path, yaml)?;
            config_created = true;
        }

        if !global.quiet {
            println!("Initialized mesa in: {}", shorten_path(&data_dir));
            if database_created {
                println!("  - Created database");
            } else {
                println!("  - Database already exists");
            }
            if config_created {
                println!("  - Created default configuration file");
            } else if self.with_config {
                println!("  - Configuration file already exists (not overwritten)");
            }
        }

        Ok(())
    }
}
