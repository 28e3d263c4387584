use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::table::Table;

/// A table whose unit-bearing columns have been parsed into typed values.
///
/// `parse_misses` counts, per output column, the present source values that
/// could not be parsed and became missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTable {
    table: Table,
    parse_misses: BTreeMap<String, usize>,
}

impl NormalizedTable {
    pub fn new(table: Table, parse_misses: BTreeMap<String, usize>) -> Self {
        Self {
            table,
            parse_misses,
        }
    }

    /// Wraps a table that needs no field normalization.
    pub fn passthrough(table: Table) -> Self {
        Self::new(table, BTreeMap::new())
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn into_table(self) -> Table {
        self.table
    }

    pub fn name(&self) -> &str {
        &self.table.name
    }

    pub fn parse_misses(&self) -> &BTreeMap<String, usize> {
        &self.parse_misses
    }

    pub fn total_parse_misses(&self) -> usize {
        self.parse_misses.values().sum()
    }
}
