//! Configuration schema definitions.
//!
//! This module defines the YAML configuration structure for mesa: the
//! floor plan (tables and combinable pairs), the operating calendar, the
//! per-turn default walk-in lists, and storage settings. The schema is
//! plain data; cross-checks and conversion into engine types live in the
//! validator.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use mesa::config::{Config, TableEntry};
///
/// let config = Config {
///     tables: vec![TableEntry { id: 1, capacity: 2 }],
///     ..Default::default()
/// };
/// assert_eq!(config.tables.len(), 1);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path to the reservation database file.
    pub database: Option<PathBuf>,

    /// The floor plan's tables.
    #[serde(default)]
    pub tables: Vec<TableEntry>,

    /// Pairs of tables that may be merged, with their merged capacity.
    #[serde(default)]
    pub combinable: Vec<PairEntry>,

    /// Slot times per turn.
    pub calendar: Option<CalendarEntry>,

    /// Tables held for walk-ins by default, per turn.
    pub default_blocks: Option<DefaultBlocksEntry>,

    /// Tables taken out of service entirely.
    #[serde(default)]
    pub out_of_service: Vec<u32>,
}

impl Default for Config {
    /// The built-in nine-table dining room.
    fn default() -> Self {
        Self {
            database: None,
            tables: (1..=4)
                .map(|id| TableEntry { id, capacity: 2 })
                .chain((5..=8).map(|id| TableEntry { id, capacity: 4 }))
                .chain(std::iter::once(TableEntry { id: 9, capacity: 6 }))
                .collect(),
            combinable: vec![PairEntry {
                tables: [2, 3],
                capacity: 6,
            }],
            calendar: None,
            default_blocks: None,
            out_of_service: Vec::new(),
        }
    }
}

/// One table in the floor plan.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TableEntry {
    /// The table's id as printed on the floor plan.
    pub id: u32,
    /// Seats at the table on its own.
    pub capacity: u8,
}

/// A combinable pair and the capacity of the merged unit.
///
/// The merged capacity is configured, not summed: pushing two tables
/// together usually seats more than the halves do separately.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PairEntry {
    /// The two member table ids.
    pub tables: [u32; 2],
    /// Seats when merged.
    pub capacity: u8,
}

/// Slot times per turn, as `HH:MM` strings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CalendarEntry {
    /// Midday slot times.
    pub mediodia: Vec<String>,
    /// Evening slot times.
    pub noche: Vec<String>,
}

/// Default walk-in-only table ids per turn.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DefaultBlocksEntry {
    /// Tables held for walk-ins at midday.
    #[serde(default)]
    pub mediodia: Vec<u32>,
    /// Tables held for walk-ins in the evening.
    #[serde(default)]
    pub noche: Vec<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_the_nine_table_room() {
        let config = Config::default();
        assert_eq!(config.tables.len(), 9);
        assert_eq!(config.combinable.len(), 1);
        assert_eq!(config.combinable[0].tables, [2, 3]);
        assert_eq!(config.combinable[0].capacity, 6);
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let yaml = "tables: []\nnonsense: true\n";
        assert!(serde_yaml::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_partial_config_parses() {
        let yaml = r"
tables:
  - id: 1
    capacity: 2
combinable: []
";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.tables.len(), 1);
        assert!(config.calendar.is_none());
        assert!(config.out_of_service.is_empty());
    }
}
