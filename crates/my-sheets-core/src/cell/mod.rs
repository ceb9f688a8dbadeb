//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellRange`] - A rectangular range of cells (e.g., "A1:B10")
//! - [`CellValue`] - The value stored in a cell
//! - [`Cell`] - A cell's expression, derived type and value
//! - [`CellStorage`] - Sparse storage for materialized cells

mod address;
mod data;
mod storage;
mod value;

pub use address::{expand_range, CellAddress, CellRange, CellRangeIterator, MAX_RANGE_CELLS};
pub use data::{Cell, CellType};
pub use storage::CellStorage;
pub use value::{parse_number, CellError, CellValue};
