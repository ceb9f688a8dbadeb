//! Infix to postfix compiler (shunting-yard)

use crate::error::{FormulaError, FormulaResult};
use crate::functions::Function;
use crate::lexer::Token;
use std::fmt;

pub use crate::lexer::Operator;

/// One step of a compiled formula
#[derive(Debug, Clone, PartialEq)]
pub enum PostfixItem {
    /// Numeric literal
    Number(f64),
    /// Cell reference (or any other identifier) to hand to the resolver
    Reference(String),
    /// Binary operator
    Operator(Operator),
    /// Function call consuming `args` values
    Call { function: Function, args: usize },
}

impl fmt::Display for PostfixItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostfixItem::Number(n) => write!(f, "{}", n),
            PostfixItem::Reference(name) => f.write_str(name),
            PostfixItem::Operator(op) => write!(f, "{}", op),
            PostfixItem::Call { function, args } => write!(f, "{}:{}", function, args),
        }
    }
}

/// Entries on the operator stack
#[derive(Debug, Clone, Copy, PartialEq)]
enum StackEntry {
    Operator(Operator),
    LeftParen,
    Function(Function),
}

/// Compile infix tokens into postfix order
///
/// # Example
/// ```rust
/// use my_sheets_formula::{compile, tokenize};
///
/// let postfix = compile(&tokenize("2+3*4")).unwrap();
/// let text: Vec<String> = postfix.iter().map(|item| item.to_string()).collect();
/// assert_eq!(text, ["2", "3", "4", "*", "+"]);
/// ```
pub fn compile(tokens: &[Token]) -> FormulaResult<Vec<PostfixItem>> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut operators: Vec<StackEntry> = Vec::new();
    let mut arg_counts: Vec<usize> = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::Number(text) => {
                let value = text
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .ok_or_else(|| FormulaError::InvalidNumber(text.clone()))?;
                output.push(PostfixItem::Number(value));
            }
            Token::Identifier(name) => {
                output.push(PostfixItem::Reference(name.clone()));
            }
            Token::Function(function) => {
                operators.push(StackEntry::Function(*function));
                arg_counts.push(1);
            }
            Token::Comma => {
                pop_until_paren(&mut operators, &mut output)?;
                if let Some(count) = arg_counts.last_mut() {
                    *count += 1;
                }
            }
            Token::LeftParen => {
                if let Some(Token::Identifier(name)) = i.checked_sub(1).map(|p| &tokens[p]) {
                    return Err(FormulaError::UnknownFunction(name.clone()));
                }
                operators.push(StackEntry::LeftParen);
            }
            Token::RightParen => {
                pop_until_paren(&mut operators, &mut output)?;
                if operators.pop() != Some(StackEntry::LeftParen) {
                    return Err(FormulaError::MismatchedParentheses);
                }

                if let Some(&StackEntry::Function(function)) = operators.last() {
                    operators.pop();
                    let counted = arg_counts.pop().unwrap_or(0);
                    // `NAME()` has no arguments whatever the counter says
                    let args = if tokens[i - 1] == Token::LeftParen {
                        0
                    } else {
                        counted
                    };
                    output.push(PostfixItem::Call { function, args });
                }
            }
            Token::Operator(op) => {
                while let Some(&StackEntry::Operator(top)) = operators.last() {
                    if top.precedence() < op.precedence() {
                        break;
                    }
                    output.push(PostfixItem::Operator(top));
                    operators.pop();
                }
                operators.push(StackEntry::Operator(*op));
            }
            Token::Symbol(c) => {
                return Err(FormulaError::UnknownOperator(c.to_string()));
            }
        }
    }

    while let Some(entry) = operators.pop() {
        match entry {
            StackEntry::Operator(op) => output.push(PostfixItem::Operator(op)),
            StackEntry::LeftParen => return Err(FormulaError::MismatchedParentheses),
            StackEntry::Function(function) => return Err(missing_argument_list(function)),
        }
    }

    Ok(output)
}

/// Move operators to the output until the nearest `(` (left on the stack)
fn pop_until_paren(
    operators: &mut Vec<StackEntry>,
    output: &mut Vec<PostfixItem>,
) -> FormulaResult<()> {
    while let Some(&entry) = operators.last() {
        match entry {
            StackEntry::LeftParen => break,
            StackEntry::Operator(op) => output.push(PostfixItem::Operator(op)),
            StackEntry::Function(function) => return Err(missing_argument_list(function)),
        }
        operators.pop();
    }
    Ok(())
}

fn missing_argument_list(function: Function) -> FormulaError {
    FormulaError::Parse(format!("{} is not followed by an argument list", function))
}
