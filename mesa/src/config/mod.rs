//! Configuration system for mesa.
//!
//! Configuration is a single YAML file describing the floor plan, the
//! operating calendar, the default walk-in lists, and storage settings.
//! Resolution order, first hit wins:
//!
//! 1. An explicit path given by the caller (`--config` in the CLI)
//! 2. The `MESA_CONFIG` environment variable
//! 3. The user config at `~/.mesa/config.yaml`
//! 4. The built-in nine-table default layout
//!
//! # Examples
//!
//! Loading and materializing the active configuration:
//!
//! ```no_run
//! use mesa::config::{ConfigLoader, ConfigValidator};
//!
//! let config = ConfigLoader::load(None).unwrap();
//! let room = ConfigValidator::materialize(&config).unwrap();
//! println!("{} tables on the floor", room.catalog().len());
//! ```
//!
//! Programmatic configuration:
//!
//! ```
//! use mesa::config::{Config, ConfigValidator, TableEntry};
//!
//! let config = Config {
//!     tables: vec![
//!         TableEntry { id: 1, capacity: 2 },
//!         TableEntry { id: 2, capacity: 4 },
//!     ],
//!     combinable: vec![],
//!     ..Default::default()
//! };
//!
//! let room = ConfigValidator::materialize(&config).unwrap();
//! assert_eq!(room.catalog().len(), 2);
//! ```

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{ConfigLoader, CONFIG_ENV_VAR};
pub use schema::{CalendarEntry, Config, DefaultBlocksEntry, PairEntry, TableEntry};
pub use validator::ConfigValidator;
