//! Formula evaluator
//!
//! Runs compiled postfix against a caller-supplied resolver. The evaluator keeps
//! no state between calls, so one resolver per evaluation is all it needs.

use crate::compiler::{compile, PostfixItem};
use crate::error::{FormulaError, FormulaResult};
use crate::lexer::tokenize;
use my_sheets_core::{CellError, CellValue, FORMULA_PREFIX};

/// Evaluate an expression, collapsing every failure to `#ERROR!`
///
/// An empty expression evaluates to empty text. A leading `=` is optional.
/// The resolver receives each reference exactly as written (uppercased) and
/// returns the value to use; returning the cycle sentinel poisons whatever
/// consumes it.
pub fn evaluate<F>(expression: &str, resolver: F) -> CellValue
where
    F: FnMut(&str) -> FormulaResult<CellValue>,
{
    if expression.is_empty() {
        return CellValue::blank();
    }

    match try_evaluate(expression, resolver) {
        Ok(value) => value,
        Err(e) => {
            log::debug!("Formula {:?} evaluated to #ERROR!: {}", expression, e);
            CellValue::Error(CellError::Eval)
        }
    }
}

/// Tokenize, compile and evaluate an expression, keeping the failure reason
pub fn try_evaluate<F>(expression: &str, resolver: F) -> FormulaResult<CellValue>
where
    F: FnMut(&str) -> FormulaResult<CellValue>,
{
    let body = expression
        .strip_prefix(FORMULA_PREFIX)
        .unwrap_or(expression);

    let tokens = tokenize(body);
    let postfix = compile(&tokens)?;
    evaluate_postfix(&postfix, resolver)
}

/// Execute compiled postfix items
pub fn evaluate_postfix<F>(items: &[PostfixItem], mut resolver: F) -> FormulaResult<CellValue>
where
    F: FnMut(&str) -> FormulaResult<CellValue>,
{
    let mut stack: Vec<CellValue> = Vec::new();

    for item in items {
        match item {
            PostfixItem::Number(n) => stack.push(CellValue::Number(*n)),

            PostfixItem::Reference(name) => stack.push(resolver(name)?),

            PostfixItem::Call { function, args } => {
                if stack.len() < *args {
                    return Err(FormulaError::MissingOperand(item.to_string()));
                }
                let values = stack.split_off(stack.len() - args);

                if values.iter().any(CellValue::is_cycle) {
                    stack.push(CellValue::Error(CellError::Cycle));
                    continue;
                }

                let numbers = values
                    .iter()
                    .map(to_number)
                    .collect::<FormulaResult<Vec<f64>>>()?;
                stack.push(CellValue::Number(function.apply(&numbers)?));
            }

            PostfixItem::Operator(op) => {
                let (left, right) = match (stack.pop(), stack.pop()) {
                    (Some(right), Some(left)) => (left, right),
                    _ => return Err(FormulaError::MissingOperand(op.to_string())),
                };

                if left.is_cycle() || right.is_cycle() {
                    stack.push(CellValue::Error(CellError::Cycle));
                    continue;
                }

                let result = op.apply(to_number(&left)?, to_number(&right)?)?;
                stack.push(CellValue::Number(result));
            }
        }
    }

    if stack.len() != 1 {
        return Err(FormulaError::InvalidExpression(stack.len()));
    }
    Ok(stack.remove(0))
}

fn to_number(value: &CellValue) -> FormulaResult<f64> {
    value
        .coerce_number()
        .ok_or_else(|| FormulaError::Value(format!("{} '{}'", value.type_name(), value)))
}
