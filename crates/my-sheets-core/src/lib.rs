//! # my-sheets-core
//!
//! Core data structures for the my-sheets calculation engine.
//!
//! This crate provides the fundamental types used throughout my-sheets:
//! - [`CellAddress`] and [`CellRange`] - A1-style addressing and range expansion
//! - [`CellValue`] and [`CellError`] - The tagged value held by a cell
//! - [`Cell`] and [`CellType`] - A cell's expression and its derived type
//! - [`CellStorage`] - Sparse, row-major cell storage
//!
//! ## Example
//!
//! ```rust
//! use my_sheets_core::{CellAddress, CellRange};
//!
//! let addr = CellAddress::parse("AB12").unwrap();
//! assert_eq!((addr.row, addr.col), (11, 27));
//! assert_eq!(CellAddress::column_to_letters(27), "AB");
//!
//! let cells: Vec<_> = CellRange::parse("A1:B2").unwrap().cells().collect();
//! assert_eq!(cells.len(), 4);
//! ```

pub mod cell;
pub mod error;

// Re-exports for convenience
pub use cell::{
    expand_range, parse_number, Cell, CellAddress, CellError, CellRange, CellStorage, CellType,
    CellValue, MAX_RANGE_CELLS,
};
pub use error::{Error, Result};

/// Prefix that marks an expression as a formula
pub const FORMULA_PREFIX: char = '=';
