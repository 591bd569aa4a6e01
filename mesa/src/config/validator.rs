//! Configuration validation and conversion into engine types.
//!
//! The schema holds raw numbers and strings; this module turns a
//! [`Config`] into a [`DiningRoom`], rejecting anything the engine's
//! validated types refuse (zero ids, capacities outside 1-6, malformed
//! slot times, references to unknown tables).

use std::collections::BTreeSet;

use crate::blocks::DefaultBlocks;
use crate::calendar::Calendar;
use crate::catalog::TableCatalog;
use crate::config::schema::{Config, DefaultBlocksEntry};
use crate::error::{Error, Result};
use crate::reservation::SlotTime;
use crate::room::DiningRoom;
use crate::table::{Capacity, Table, TableId};

/// Validates configurations and builds the dining room from them.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Checks a configuration without building anything.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure found.
    pub fn validate(config: &Config) -> Result<()> {
        Self::materialize(config).map(|_| ())
    }

    /// Builds the [`DiningRoom`] described by a configuration.
    ///
    /// An empty table list falls back to the built-in layout so a config
    /// file that only sets the database path still yields a usable room.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid ids, capacities, slot times, or
    /// references to tables not in the floor plan.
    pub fn materialize(config: &Config) -> Result<DiningRoom> {
        let fallback;
        let source = if config.tables.is_empty() {
            fallback = Config::default();
            &fallback
        } else {
            config
        };

        let mut tables = Vec::with_capacity(source.tables.len());
        for entry in &source.tables {
            tables.push(Table::new(
                TableId::try_from(entry.id)?,
                Capacity::try_from(entry.capacity)?,
            ));
        }

        let mut pairs = Vec::with_capacity(source.combinable.len());
        for entry in &source.combinable {
            pairs.push((
                TableId::try_from(entry.tables[0])?,
                TableId::try_from(entry.tables[1])?,
                Capacity::try_from(entry.capacity)?,
            ));
        }

        let catalog = TableCatalog::build(tables, pairs)?;

        let calendar = match &config.calendar {
            Some(entry) => {
                Calendar::new(Self::slot_list(&entry.mediodia)?, Self::slot_list(&entry.noche)?)?
            }
            None => Calendar::default(),
        };

        let defaults = Self::default_blocks(config.default_blocks.as_ref())?;

        let mut out_of_service = BTreeSet::new();
        for raw in &config.out_of_service {
            out_of_service.insert(TableId::try_from(*raw)?);
        }

        let room = DiningRoom::new(catalog, calendar, defaults, out_of_service)?;
        Ok(room)
    }

    fn slot_list(raw: &[String]) -> Result<Vec<SlotTime>> {
        raw.iter()
            .map(|s| s.parse::<SlotTime>().map_err(Error::from))
            .collect()
    }

    fn default_blocks(entry: Option<&DefaultBlocksEntry>) -> Result<DefaultBlocks> {
        let Some(entry) = entry else {
            return Ok(DefaultBlocks::default());
        };
        let to_set = |raw: &[u32]| -> Result<BTreeSet<TableId>> {
            raw.iter()
                .map(|n| TableId::try_from(*n).map_err(Error::from))
                .collect()
        };
        Ok(DefaultBlocks {
            mediodia: to_set(&entry.mediodia)?,
            noche: to_set(&entry.noche)?,
        })
    }
}
