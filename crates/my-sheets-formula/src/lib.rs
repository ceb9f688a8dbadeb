//! # my-sheets-formula
//!
//! Formula engine for my-sheets.
//!
//! This crate provides:
//! - Tokenizing (text → tokens, with ranges expanded inline)
//! - Compiling (infix tokens → postfix, shunting-yard)
//! - Evaluation (postfix → value) against a caller-supplied reference resolver
//! - The five aggregate functions (SUM, AVERAGE, MAX, MIN, MEDIAN)
//! - Dependency tracking with cycle rejection
//!
//! ## Example
//!
//! ```rust
//! use my_sheets_core::CellValue;
//! use my_sheets_formula::{evaluate, FormulaResult};
//!
//! let value = evaluate("=SUM(1,2,3)*A1", |reference: &str| -> FormulaResult<CellValue> {
//!     assert_eq!(reference, "A1");
//!     Ok(CellValue::Number(2.0))
//! });
//! assert_eq!(value, CellValue::Number(12.0));
//! ```

pub mod compiler;
pub mod dependency;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod lexer;
pub mod references;

pub use compiler::{compile, Operator, PostfixItem};
pub use dependency::{CircularDependency, DependencyGraph};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, evaluate_postfix, try_evaluate};
pub use functions::Function;
pub use lexer::{tokenize, Token};
pub use references::extract_references;
