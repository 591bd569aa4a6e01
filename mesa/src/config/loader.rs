//! Configuration file discovery and loading.
//!
//! Resolution order, first hit wins: an explicit path from the caller,
//! the `MESA_CONFIG` environment variable, the user config at
//! `~/.mesa/config.yaml`, and finally the built-in default layout.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// Environment variable naming an alternate configuration file.
pub const CONFIG_ENV_VAR: &str = "MESA_CONFIG";

/// Loads configuration files.
///
/// # Examples
///
/// ```no_run
/// use mesa::config::ConfigLoader;
///
/// let config = ConfigLoader::load(None).unwrap();
/// println!("{} tables configured", config.tables.len());
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolves and loads the active configuration.
    ///
    /// An explicit path must exist; the `MESA_CONFIG` path must exist
    /// too, since naming a missing file is a setup mistake worth
    /// surfacing. A missing user config silently falls back to the
    /// built-in default.
    ///
    /// # Errors
    ///
    /// Returns an error if a named file is missing, unreadable, or not
    /// valid YAML for the schema.
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }

        if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
            return Self::load_file(Path::new(&env_path));
        }

        let user_path = Self::user_config_path()?;
        if user_path.exists() {
            return Self::load_file(&user_path);
        }

        Ok(Config::default())
    }

    /// The default user configuration path, `~/.mesa/config.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn user_config_path() -> Result<PathBuf> {
        home::home_dir()
            .map(|home| home.join(".mesa").join("config.yaml"))
            .ok_or_else(|| Error::Validation {
                field: "config".into(),
                message: "cannot determine home directory".into(),
            })
    }

    /// Loads and parses one configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(Error::NotFound {
                resource: format!("configuration file {}", path.display()),
            });
        }
        let contents = fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }
}
