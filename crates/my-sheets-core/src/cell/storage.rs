//! Cell storage implementation
//!
//! This module provides sparse storage for spreadsheet cells.
//! Only materialized cells are stored, using a row-based BTreeMap structure.

use std::collections::BTreeMap;

use super::{Cell, CellAddress};

/// Sparse row-based storage for worksheet cells
///
/// Design decisions:
/// - Uses BTreeMap for ordered iteration (row-major, deterministic rescans)
/// - Cells are created on first access and never removed individually
///
/// Structure: `BTreeMap<row_index, BTreeMap<col_index, Cell>>`
#[derive(Debug, Default, Clone)]
pub struct CellStorage {
    /// Row index → column map
    rows: BTreeMap<u32, BTreeMap<u32, Cell>>,

    /// Number of stored cells
    len: usize,
}

impl CellStorage {
    /// Create a new empty cell storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cell, if it has been materialized
    pub fn get(&self, address: CellAddress) -> Option<&Cell> {
        self.rows
            .get(&address.row)
            .and_then(|r| r.get(&address.col))
    }

    /// Get a cell, creating an empty one on first access
    pub fn get_or_create(&mut self, address: CellAddress) -> &mut Cell {
        let len = &mut self.len;
        self.rows
            .entry(address.row)
            .or_default()
            .entry(address.col)
            .or_insert_with(|| {
                *len += 1;
                Cell::new(address)
            })
    }

    /// Clear all cells
    pub fn clear(&mut self) {
        self.rows.clear();
        self.len = 0;
    }

    /// Get the number of materialized cells
    pub fn cell_count(&self) -> usize {
        self.len
    }

    /// Check if storage is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the bounds of materialized cells
    ///
    /// Returns (min_row, min_col, max_row, max_col) or None if empty
    pub fn used_bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let min_row = *self.rows.keys().next()?;
        let max_row = *self.rows.keys().next_back()?;

        let mut min_col = u32::MAX;
        let mut max_col = 0u32;

        for row_data in self.rows.values() {
            if let Some(&col) = row_data.keys().next() {
                min_col = min_col.min(col);
            }
            if let Some(&col) = row_data.keys().next_back() {
                max_col = max_col.max(col);
            }
        }

        Some((min_row, min_col, max_row, max_col))
    }

    /// Iterate over all cells in row order
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.rows.values().flat_map(|cols| cols.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_or_create_materializes_once() {
        let mut storage = CellStorage::new();
        assert!(storage.is_empty());
        assert!(storage.get(CellAddress::new(0, 0)).is_none());

        storage.get_or_create(CellAddress::new(0, 0)).set_expression("1");
        storage.get_or_create(CellAddress::new(0, 0));
        storage.get_or_create(CellAddress::new(4, 2));

        assert_eq!(storage.cell_count(), 2);
        assert_eq!(
            storage.get(CellAddress::new(0, 0)).map(|c| c.expression()),
            Some("1")
        );
    }

    #[test]
    fn test_iter_is_row_major() {
        let mut storage = CellStorage::new();
        for (row, col) in [(2, 0), (0, 3), (0, 1), (1, 7)] {
            storage.get_or_create(CellAddress::new(row, col));
        }

        let order: Vec<_> = storage.iter().map(|c| c.address()).collect();
        assert_eq!(
            order,
            vec![
                CellAddress::new(0, 1),
                CellAddress::new(0, 3),
                CellAddress::new(1, 7),
                CellAddress::new(2, 0),
            ]
        );
        assert_eq!(storage.used_bounds(), Some((0, 0, 2, 7)));
    }

    #[test]
    fn test_clear() {
        let mut storage = CellStorage::new();
        storage.get_or_create(CellAddress::new(1, 1));
        storage.clear();
        assert!(storage.is_empty());
        assert_eq!(storage.used_bounds(), None);
    }
}
