//! # my-sheets
//!
//! The calculation core of a spreadsheet.
//!
//! A [`Worksheet`] owns its cells and a dependency graph. Setting a cell
//! classifies the expression (text, number or formula), evaluates formulas,
//! pushes the change to every cell that reads it, and flags circular
//! references with `#CYCLE!` instead of looping.
//!
//! ## Features
//!
//! - Arithmetic (`+ - * /`) with standard precedence and parentheses
//! - `SUM`, `AVERAGE`, `MAX`, `MIN`, `MEDIAN` over values, references and ranges
//! - Automatic recalculation of dependents
//! - Cycle detection and recovery once the cycle is broken
//! - Change notifications for UI layers
//!
//! ## Example
//!
//! ```rust
//! use my_sheets::prelude::*;
//!
//! let mut sheet = Worksheet::new();
//! sheet.set_cell(0, 0, "1");
//! sheet.set_cell(1, 0, "2");
//! sheet.set_cell(2, 0, "3");
//! sheet.set_cell(0, 1, "=SUM(A1:A3)");
//! assert_eq!(sheet.get_cell(0, 1).value(), &CellValue::Number(6.0));
//!
//! sheet.set_cell(0, 0, "=B1+1");
//! assert_eq!(sheet.get_cell(0, 0).value().to_string(), "#CYCLE!");
//!
//! assert!(!sheet.is_formula_valid("=SUM(1,"));
//! ```

pub mod calculation;
pub mod prelude;
pub mod worksheet;

pub use calculation::{CalculationOptions, RecalcMode};
pub use worksheet::Worksheet;

// Re-export core types
pub use my_sheets_core::{
    expand_range, parse_number, Cell, CellAddress, CellError, CellRange, CellType, CellValue,
    Error, Result,
};

// Re-export formula types
pub use my_sheets_formula::{
    evaluate, extract_references, try_evaluate, CircularDependency, DependencyGraph,
    FormulaError, FormulaResult, Function,
};
