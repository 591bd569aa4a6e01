//! The table catalog: the immutable description of the dining room.
//!
//! The catalog lists every physical table with its capacity and the legal
//! combination pairs. It is loaded once from configuration at startup and
//! never mutated; every resolver call receives it by reference.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::reservation::ValidationError;
use crate::table::{Capacity, Table, TableId};

/// A legal merged pair of tables and the capacity of the merged unit.
///
/// The merged capacity is configured, not summed: two adjacent 2-seat
/// tables pushed together can seat a 5-6 party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinablePair {
    /// The lower-id half of the pair.
    pub first: TableId,
    /// The higher-id half of the pair.
    pub second: TableId,
    /// Seating capacity of the merged unit.
    pub capacity: Capacity,
}

/// The immutable catalog of physical tables.
///
/// Tables are stored keyed by id, so all iteration is in ascending id
/// order; this is what makes allocation results reproducible.
///
/// # Examples
///
/// ```
/// use mesa::{Capacity, Table, TableCatalog, TableId};
///
/// let t1 = TableId::try_from(1).unwrap();
/// let t2 = TableId::try_from(2).unwrap();
/// let catalog = TableCatalog::build(
///     vec![
///         Table::new(t1, Capacity::try_from(2).unwrap()),
///         Table::new(t2, Capacity::try_from(4).unwrap()),
///     ],
///     vec![],
/// )
/// .unwrap();
///
/// assert_eq!(catalog.len(), 2);
/// assert!(catalog.contains(t1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCatalog {
    tables: BTreeMap<TableId, Table>,
    pairs: Vec<CombinablePair>,
}

impl TableCatalog {
    /// Builds a catalog from a table list and combination pairs.
    ///
    /// Pairs are normalized to ascending id order and reflected into each
    /// member table's `combinable_with` set.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Two tables share an id
    /// - A pair references a table not in the list
    /// - A pair combines a table with itself
    /// - The same pair is declared twice
    pub fn build(
        tables: Vec<Table>,
        pairs: Vec<(TableId, TableId, Capacity)>,
    ) -> Result<Self, ValidationError> {
        let mut by_id: BTreeMap<TableId, Table> = BTreeMap::new();
        for table in tables {
            if by_id.insert(table.id, table.clone()).is_some() {
                return Err(ValidationError {
                    field: "tables".into(),
                    message: format!("duplicate table id {}", table.id),
                });
            }
        }

        let mut normalized: Vec<CombinablePair> = Vec::new();
        for (a, b, capacity) in pairs {
            if a == b {
                return Err(ValidationError {
                    field: "combinations".into(),
                    message: format!("table {a} cannot be combined with itself"),
                });
            }
            let (first, second) = if a < b { (a, b) } else { (b, a) };
            for id in [first, second] {
                if !by_id.contains_key(&id) {
                    return Err(ValidationError {
                        field: "combinations".into(),
                        message: format!("combination references unknown table {id}"),
                    });
                }
            }
            if normalized
                .iter()
                .any(|p| p.first == first && p.second == second)
            {
                return Err(ValidationError {
                    field: "combinations".into(),
                    message: format!("pair {first}+{second} declared more than once"),
                });
            }
            normalized.push(CombinablePair {
                first,
                second,
                capacity,
            });
        }

        // Reflect pairs into the per-table partner sets.
        for pair in &normalized {
            if let Some(table) = by_id.get_mut(&pair.first) {
                table.combinable_with.insert(pair.second);
            }
            if let Some(table) = by_id.get_mut(&pair.second) {
                table.combinable_with.insert(pair.first);
            }
        }

        Ok(Self {
            tables: by_id,
            pairs: normalized,
        })
    }

    /// Returns the table with the given id, if it exists.
    #[must_use]
    pub fn get(&self, id: TableId) -> Option<&Table> {
        self.tables.get(&id)
    }

    /// Returns `true` if the catalog contains the given table id.
    #[must_use]
    pub fn contains(&self, id: TableId) -> bool {
        self.tables.contains_key(&id)
    }

    /// Iterates over all tables in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    /// Returns the declared combination pairs, normalized.
    #[must_use]
    pub fn pairs(&self) -> &[CombinablePair] {
        &self.pairs
    }

    /// Returns the merged capacity of the pair `(a, b)` if it is legal.
    #[must_use]
    pub fn pair_capacity(&self, a: TableId, b: TableId) -> Option<Capacity> {
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        self.pairs
            .iter()
            .find(|p| p.first == first && p.second == second)
            .map(|p| p.capacity)
    }

    /// Returns the number of tables in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns `true` if the catalog has no tables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{cap, dining_room, id};
    use super::*;

    #[test]
    fn test_build_and_lookup() {
        let catalog = dining_room();
        assert_eq!(catalog.len(), 9);
        assert!(catalog.contains(id(9)));
        assert!(!catalog.contains(id(10)));
        assert_eq!(catalog.get(id(5)).unwrap().capacity, cap(4));
    }

    #[test]
    fn test_iteration_is_ascending() {
        let catalog = dining_room();
        let ids: Vec<u32> = catalog.iter().map(|t| t.id.value()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_pairs_are_reflected_into_tables() {
        let catalog = dining_room();
        assert!(catalog.get(id(2)).unwrap().combinable_with.contains(&id(3)));
        assert!(catalog.get(id(3)).unwrap().combinable_with.contains(&id(2)));
        assert!(catalog.get(id(1)).unwrap().combinable_with.is_empty());
    }

    #[test]
    fn test_pair_capacity_lookup_is_order_insensitive() {
        let catalog = dining_room();
        assert_eq!(catalog.pair_capacity(id(2), id(3)), Some(cap(6)));
        assert_eq!(catalog.pair_capacity(id(3), id(2)), Some(cap(6)));
        assert_eq!(catalog.pair_capacity(id(1), id(2)), None);
    }

    #[test]
    fn test_duplicate_table_id_rejected() {
        let result = TableCatalog::build(
            vec![Table::new(id(1), cap(2)), Table::new(id(1), cap(4))],
            vec![],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_pair_with_unknown_table_rejected() {
        let result = TableCatalog::build(
            vec![Table::new(id(1), cap(2))],
            vec![(id(1), id(2), cap(4))],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_self_pair_rejected() {
        let result = TableCatalog::build(
            vec![Table::new(id(1), cap(2))],
            vec![(id(1), id(1), cap(4))],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_pair_rejected() {
        let result = TableCatalog::build(
            vec![Table::new(id(2), cap(2)), Table::new(id(3), cap(2))],
            vec![(id(2), id(3), cap(6)), (id(3), id(2), cap(6))],
        );
        assert!(result.is_err());
    }
}
