//! Cell data: expression, derived type and value

use super::{parse_number, CellAddress, CellValue};
use crate::FORMULA_PREFIX;

/// Kind of content a cell holds, derived from its expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellType {
    /// Plain text (including the empty expression)
    #[default]
    Text,
    /// Numeric text
    Number,
    /// Expression starting with `=`
    Formula,
}

impl CellType {
    /// Derive the type of an expression
    pub fn of(expression: &str) -> Self {
        if expression.starts_with(FORMULA_PREFIX) {
            CellType::Formula
        } else if parse_number(expression).is_some() {
            CellType::Number
        } else {
            CellType::Text
        }
    }
}

/// A single cell
///
/// The coordinates are fixed at creation. For non-formula cells the value is a
/// pure function of the expression; formula cells get their value from whoever
/// evaluates them.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    address: CellAddress,
    expression: String,
    cell_type: CellType,
    value: CellValue,
}

impl Cell {
    /// Create an empty cell at the given coordinates
    pub fn new(address: CellAddress) -> Self {
        Self {
            address,
            expression: String::new(),
            cell_type: CellType::Text,
            value: CellValue::blank(),
        }
    }

    /// The cell's coordinates
    pub fn address(&self) -> CellAddress {
        self.address
    }

    /// Row index (0-based)
    pub fn row(&self) -> u32 {
        self.address.row
    }

    /// Column index (0-based)
    pub fn col(&self) -> u32 {
        self.address.col
    }

    /// The raw expression as entered
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Type derived from the expression
    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    /// Check if the cell holds a formula
    pub fn is_formula(&self) -> bool {
        self.cell_type == CellType::Formula
    }

    /// Current value
    pub fn value(&self) -> &CellValue {
        &self.value
    }

    /// Replace the expression and re-derive the type
    ///
    /// Number and text cells get their value immediately. A formula cell keeps
    /// its previous value until it is evaluated.
    pub fn set_expression<S: Into<String>>(&mut self, expression: S) {
        self.expression = expression.into();
        self.cell_type = CellType::of(&self.expression);
        if let Some(value) = self.literal_value() {
            self.value = value;
        }
    }

    /// Set the computed value
    pub fn set_value(&mut self, value: CellValue) {
        self.value = value;
    }

    /// The value of a non-formula expression, `None` for formulas
    pub fn literal_value(&self) -> Option<CellValue> {
        match self.cell_type {
            CellType::Formula => None,
            CellType::Number => parse_number(&self.expression).map(CellValue::Number),
            CellType::Text => Some(CellValue::Text(self.expression.clone())),
        }
    }
}
