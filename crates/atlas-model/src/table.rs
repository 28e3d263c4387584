#![deny(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::cell::{Cell, ColumnKind};
use crate::error::{ModelError, Result};

static MISSING: Cell = Cell::Missing;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub cells: Vec<Cell>,
}

impl Column {
    /// Builds a column, inferring its kind: numeric when every present cell is a number.
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        let kind = if cells.iter().all(|cell| !matches!(cell, Cell::Text(_))) {
            ColumnKind::Numeric
        } else {
            ColumnKind::Text
        };
        Self {
            name: name.into(),
            kind,
            cells,
        }
    }

    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Numeric,
            cells: values.into_iter().map(Cell::from_f64).collect(),
        }
    }

    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Text,
            cells: values.into_iter().map(Cell::from_text).collect(),
        }
    }

    /// An all-missing column of the given kind.
    pub fn missing(name: impl Into<String>, kind: ColumnKind, len: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            cells: vec![Cell::Missing; len],
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_numeric(&self) -> bool {
        self.kind == ColumnKind::Numeric
    }

    pub fn get(&self, idx: usize) -> &Cell {
        self.cells.get(idx).unwrap_or(&MISSING)
    }

    pub fn f64_values(&self) -> Vec<Option<f64>> {
        self.cells.iter().map(Cell::as_f64).collect()
    }

    pub fn present_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_missing()).count()
    }
}

/// A named, column-oriented table. All columns have the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    columns: Vec<Column>,
    height: usize,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            height: 0,
        }
    }

    pub fn with_columns(name: impl Into<String>, columns: Vec<Column>) -> Result<Self> {
        let mut table = Self::new(name);
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.column(name).ok_or_else(|| ModelError::ColumnNotFound {
            table: self.name.clone(),
            column: name.to_string(),
        })
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        self.column(column).and_then(|c| c.cells.get(row))
    }

    /// Appends a column. The first column fixes the table height.
    pub fn push_column(&mut self, column: Column) -> Result<()> {
        if self.has_column(&column.name) {
            return Err(ModelError::DuplicateColumn {
                table: self.name.clone(),
                column: column.name,
            });
        }
        if self.columns.is_empty() {
            self.height = column.len();
        } else if column.len() != self.height {
            return Err(ModelError::LengthMismatch {
                table: self.name.clone(),
                expected: self.height,
                actual: column.len(),
                column: column.name,
            });
        }
        self.columns.push(column);
        Ok(())
    }

    /// Replaces a column in place, keeping its position.
    pub fn replace_column(&mut self, name: &str, column: Column) -> Result<()> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| ModelError::ColumnNotFound {
                table: self.name.clone(),
                column: name.to_string(),
            })?;
        if column.name != name && self.has_column(&column.name) {
            return Err(ModelError::DuplicateColumn {
                table: self.name.clone(),
                column: column.name,
            });
        }
        if column.len() != self.height {
            return Err(ModelError::LengthMismatch {
                table: self.name.clone(),
                expected: self.height,
                actual: column.len(),
                column: column.name,
            });
        }
        self.columns[idx] = column;
        Ok(())
    }

    pub fn remove_column(&mut self, name: &str) -> Option<Column> {
        let idx = self.column_index(name)?;
        let removed = self.columns.remove(idx);
        if self.columns.is_empty() {
            self.height = 0;
        }
        Some(removed)
    }

    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<()> {
        if from == to {
            return Ok(());
        }
        if self.has_column(to) {
            return Err(ModelError::DuplicateColumn {
                table: self.name.clone(),
                column: to.to_string(),
            });
        }
        let idx = self
            .column_index(from)
            .ok_or_else(|| ModelError::ColumnNotFound {
                table: self.name.clone(),
                column: from.to_string(),
            })?;
        self.columns[idx].name = to.to_string();
        Ok(())
    }

    /// Cells of one row, in column order.
    pub fn row(&self, idx: usize) -> Vec<&Cell> {
        self.columns.iter().map(|c| c.get(idx)).collect()
    }

    /// Builds a new table holding the given rows, in the given order.
    pub fn take_rows(&self, indices: &[usize]) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                kind: c.kind,
                cells: indices.iter().map(|&i| c.get(i).clone()).collect(),
            })
            .collect();
        Self {
            name: self.name.clone(),
            columns,
            height: indices.len(),
        }
    }
}
