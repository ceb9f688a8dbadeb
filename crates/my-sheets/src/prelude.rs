//! Prelude module - common imports for my-sheets users
//!
//! ```rust
//! use my_sheets::prelude::*;
//! ```

pub use crate::{
    // Calculation types
    CalculationOptions,
    Cell,
    CellAddress,
    CellError,
    CellRange,
    CellType,
    // Cell types
    CellValue,
    // Error types
    Error,
    RecalcMode,
    Result,
    // Main types
    Worksheet,
};
