//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur while compiling or evaluating a formula
///
/// None of these reach a cell directly: [`crate::evaluate`] turns every one of
/// them into the `#ERROR!` sentinel.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// Formula parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Numeric literal that does not parse
    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    /// Unbalanced `(` or `)`
    #[error("Mismatched parentheses")]
    MismatchedParentheses,

    /// Unknown function
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Unknown operator or stray symbol
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },

    /// Operator or call with too few values on the stack
    #[error("Missing operand for {0}")]
    MissingOperand(String),

    /// Division by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Operand that cannot be used as a number
    #[error("Cannot convert {0} to number")]
    Value(String),

    /// Reference to invalid cell
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Evaluation did not leave exactly one value
    #[error("Invalid expression: {0} values left after evaluation")]
    InvalidExpression(usize),
}

impl From<my_sheets_core::Error> for FormulaError {
    fn from(e: my_sheets_core::Error) -> Self {
        FormulaError::InvalidReference(e.to_string())
    }
}
