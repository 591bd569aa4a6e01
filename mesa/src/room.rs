//! The dining room: every static input the engine needs, bundled.
//!
//! A [`DiningRoom`] groups the table catalog, the operating calendar,
//! the per-turn default walk-in lists, and the out-of-service set. It is
//! built once from configuration; resolvers receive it by reference next
//! to the per-service [`crate::ServiceSnapshot`].

use std::collections::BTreeSet;

use crate::blocks::DefaultBlocks;
use crate::calendar::Calendar;
use crate::catalog::TableCatalog;
use crate::reservation::ValidationError;
use crate::table::TableId;

/// The static configuration of the dining room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiningRoom {
    catalog: TableCatalog,
    calendar: Calendar,
    defaults: DefaultBlocks,
    out_of_service: BTreeSet<TableId>,
}

impl DiningRoom {
    /// Bundles the static inputs, checking cross-references.
    ///
    /// # Errors
    ///
    /// Returns an error if a default-blocked or out-of-service table id
    /// is not present in the catalog.
    pub fn new(
        catalog: TableCatalog,
        calendar: Calendar,
        defaults: DefaultBlocks,
        out_of_service: BTreeSet<TableId>,
    ) -> Result<Self, ValidationError> {
        for id in defaults
            .mediodia
            .iter()
            .chain(defaults.noche.iter())
        {
            if !catalog.contains(*id) {
                return Err(ValidationError {
                    field: "default_blocks".into(),
                    message: format!("default-blocked table {id} is not in the catalog"),
                });
            }
        }
        for id in &out_of_service {
            if !catalog.contains(*id) {
                return Err(ValidationError {
                    field: "out_of_service".into(),
                    message: format!("out-of-service table {id} is not in the catalog"),
                });
            }
        }
        Ok(Self {
            catalog,
            calendar,
            defaults,
            out_of_service,
        })
    }

    /// The table catalog.
    #[must_use]
    pub const fn catalog(&self) -> &TableCatalog {
        &self.catalog
    }

    /// The operating calendar.
    #[must_use]
    pub const fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    /// The per-turn default walk-in-only lists.
    #[must_use]
    pub const fn defaults(&self) -> &DefaultBlocks {
        &self.defaults
    }

    /// Tables currently taken out of service.
    #[must_use]
    pub const fn out_of_service(&self) -> &BTreeSet<TableId> {
        &self.out_of_service
    }
}
