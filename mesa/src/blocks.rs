//! Walk-in block configuration for a single service.
//!
//! Some tables are held back for walk-ins rather than reservations. The
//! static per-turn default lists live in [`DefaultBlocks`]; per-service
//! deviations (an extra manual block, or an exception re-opening a
//! default-blocked table) live in a [`BlockConfig`] keyed by
//! `(date, turno)` and passed explicitly into every resolver call.
//!
//! A table can never be in both the manual and the exception set: the
//! later admin action wins, which [`BlockConfig::block`] and
//! [`BlockConfig::except`] enforce structurally.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::reservation::Turno;
use crate::table::TableId;

/// The static per-turn lists of tables held for walk-ins by default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultBlocks {
    /// Tables held for walk-ins at midday unless excepted.
    #[serde(default)]
    pub mediodia: BTreeSet<TableId>,
    /// Tables held for walk-ins in the evening unless excepted.
    #[serde(default)]
    pub noche: BTreeSet<TableId>,
}

impl DefaultBlocks {
    /// Returns the default walk-in-only set for a turn.
    #[must_use]
    pub fn for_turno(&self, turno: Turno) -> &BTreeSet<TableId> {
        match turno {
            Turno::Mediodia => &self.mediodia,
            Turno::Noche => &self.noche,
        }
    }
}

/// The saved block deviations for one `(date, turno)` service.
///
/// The `version` counter supports compare-and-swap saves: two admins
/// editing the same service cannot silently overwrite each other.
///
/// # Examples
///
/// ```
/// use mesa::{BlockConfig, TableId};
///
/// let t4 = TableId::try_from(4).unwrap();
/// let mut config = BlockConfig::empty();
///
/// config.block(t4);
/// assert!(config.manual().contains(&t4));
///
/// // A later exception for the same table displaces the manual block.
/// config.except(t4);
/// assert!(!config.manual().contains(&t4));
/// assert!(config.exceptions().contains(&t4));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockConfig {
    manual: BTreeSet<TableId>,
    exceptions: BTreeSet<TableId>,
    version: u64,
}

impl BlockConfig {
    /// Creates an empty configuration at version 0.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a configuration from explicit sets and a version.
    ///
    /// Tables appearing in both sets are treated as manually blocked;
    /// the exception entry is dropped.
    #[must_use]
    pub fn new(manual: BTreeSet<TableId>, exceptions: BTreeSet<TableId>, version: u64) -> Self {
        let exceptions = exceptions.difference(&manual).copied().collect();
        Self {
            manual,
            exceptions,
            version,
        }
    }

    /// Tables manually marked walk-in-only for this service.
    #[must_use]
    pub const fn manual(&self) -> &BTreeSet<TableId> {
        &self.manual
    }

    /// Default-blocked tables re-opened for reservations this service.
    #[must_use]
    pub const fn exceptions(&self) -> &BTreeSet<TableId> {
        &self.exceptions
    }

    /// The saved version of this configuration.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Marks a table walk-in-only, clearing any exception for it.
    pub fn block(&mut self, id: TableId) {
        self.exceptions.remove(&id);
        self.manual.insert(id);
    }

    /// Removes a manual block.
    pub fn unblock(&mut self, id: TableId) {
        self.manual.remove(&id);
    }

    /// Re-opens a default-blocked table, clearing any manual block for it.
    pub fn except(&mut self, id: TableId) {
        self.manual.remove(&id);
        self.exceptions.insert(id);
    }

    /// Removes an exception.
    pub fn unexcept(&mut self, id: TableId) {
        self.exceptions.remove(&id);
    }

    /// Returns a copy carrying the given saved version.
    #[must_use]
    pub fn at_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> TableId {
        TableId::try_from(n).unwrap()
    }

    #[test]
    fn test_empty_config() {
        let config = BlockConfig::empty();
        assert!(config.manual().is_empty());
        assert!(config.exceptions().is_empty());
        assert_eq!(config.version(), 0);
    }

    #[test]
    fn test_block_then_except_last_action_wins() {
        let mut config = BlockConfig::empty();
        config.block(id(4));
        config.except(id(4));
        assert!(!config.manual().contains(&id(4)));
        assert!(config.exceptions().contains(&id(4)));
    }

    #[test]
    fn test_except_then_block_last_action_wins() {
        let mut config = BlockConfig::empty();
        config.except(id(4));
        config.block(id(4));
        assert!(config.manual().contains(&id(4)));
        assert!(!config.exceptions().contains(&id(4)));
    }

    #[test]
    fn test_new_resolves_overlap_towards_manual() {
        let overlap: BTreeSet<TableId> = [id(4)].into_iter().collect();
        let config = BlockConfig::new(overlap.clone(), overlap, 3);
        assert!(config.manual().contains(&id(4)));
        assert!(config.exceptions().is_empty());
        assert_eq!(config.version(), 3);
    }

    #[test]
    fn test_unblock_and_unexcept() {
        let mut config = BlockConfig::empty();
        config.block(id(1));
        config.except(id(2));
        config.unblock(id(1));
        config.unexcept(id(2));
        assert!(config.manual().is_empty());
        assert!(config.exceptions().is_empty());
    }

    #[test]
    fn test_default_blocks_per_turno() {
        let defaults = DefaultBlocks {
            mediodia: [id(1)].into_iter().collect(),
            noche: [id(2)].into_iter().collect(),
        };
        assert!(defaults.for_turno(Turno::Mediodia).contains(&id(1)));
        assert!(defaults.for_turno(Turno::Noche).contains(&id(2)));
    }
}
