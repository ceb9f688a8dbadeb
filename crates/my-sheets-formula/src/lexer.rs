//! Formula tokenizer
//!
//! Splits a formula body (without the leading `=`) into a flat token list.
//! Ranges such as `A1:B2` never reach the compiler: they are expanded in place
//! into a comma-separated list of single references, which keeps them valid as
//! function arguments.

use crate::error::{FormulaError, FormulaResult};
use crate::functions::Function;
use my_sheets_core::CellRange;
use std::fmt;

/// Binary arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Map a character to an operator
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            '*' => Some(Operator::Multiply),
            '/' => Some(Operator::Divide),
            _ => None,
        }
    }

    /// Operator symbol
    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    /// Binding strength; equal precedence associates left-to-right
    pub fn precedence(&self) -> u8 {
        match self {
            Operator::Multiply | Operator::Divide => 2,
            Operator::Add | Operator::Subtract => 1,
        }
    }

    /// Apply the operator
    pub fn apply(&self, left: f64, right: f64) -> FormulaResult<f64> {
        match self {
            Operator::Add => Ok(left + right),
            Operator::Subtract => Ok(left - right),
            Operator::Multiply => Ok(left * right),
            Operator::Divide if right == 0.0 => Err(FormulaError::DivisionByZero),
            Operator::Divide => Ok(left / right),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Numeric literal text, possibly with a folded leading `-`
    Number(String),
    /// Uppercased identifier: a cell reference or an unknown name
    Identifier(String),
    /// One of the built-in functions
    Function(Function),
    /// Binary operator
    Operator(Operator),
    LeftParen,
    RightParen,
    Comma,
    /// Any other single character (including a `:` left over from a malformed range)
    Symbol(char),
}

impl Token {
    /// Classify a buffered word
    fn word(text: &str) -> Self {
        let text = text.to_uppercase();
        if text.starts_with(|c: char| c.is_alphabetic()) {
            match Function::from_name(&text) {
                Some(function) => Token::Function(function),
                None => Token::Identifier(text),
            }
        } else {
            Token::Number(text)
        }
    }

    /// Classify a single character
    fn symbol(c: char) -> Self {
        match c {
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            ',' => Token::Comma,
            _ => match Operator::from_char(c) {
                Some(op) => Token::Operator(op),
                None => Token::Symbol(c),
            },
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(text) | Token::Identifier(text) => f.write_str(text),
            Token::Function(function) => write!(f, "{}", function),
            Token::Operator(op) => write!(f, "{}", op),
            Token::LeftParen => f.write_str("("),
            Token::RightParen => f.write_str(")"),
            Token::Comma => f.write_str(","),
            Token::Symbol(c) => write!(f, "{}", c),
        }
    }
}

/// Tokenize a formula body
///
/// Tokenizing never fails; anything it cannot classify is passed on as a
/// [`Token::Symbol`] for the compiler to reject.
///
/// # Example
/// ```rust
/// use my_sheets_formula::{tokenize, Token};
///
/// let tokens = tokenize("SUM(A1:A2)");
/// assert_eq!(tokens.len(), 6);
/// assert_eq!(tokens[2], Token::Identifier("A1".into()));
/// assert_eq!(tokens[3], Token::Comma);
/// ```
pub fn tokenize(formula: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(formula);
    lexer.run();
    lexer.tokens
}

struct Lexer {
    chars: Vec<char>,
    tokens: Vec<Token>,
    buffer: String,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            tokens: Vec::new(),
            buffer: String::new(),
        }
    }

    fn run(&mut self) {
        let mut pos = 0;

        while pos < self.chars.len() {
            let c = self.chars[pos];

            if c.is_whitespace() {
                self.flush();
                pos += 1;
                continue;
            }

            if c == ':' && !self.buffer.is_empty() {
                pos = self.scan_range(pos);
                continue;
            }

            if self.buffer.is_empty() && self.in_operand_position() {
                // Unary plus is a no-op
                if c == '+' {
                    pos += 1;
                    continue;
                }
                // Unary minus folds into the literal that follows
                if c == '-' && self.peek_at(pos + 1).map_or(false, |n| n.is_ascii_digit()) {
                    self.buffer.push(c);
                    pos += 1;
                    continue;
                }
            }

            if c.is_ascii_digit() || c == '.' {
                self.buffer.push(c);
                pos += 1;
                continue;
            }

            if c.is_alphabetic() {
                pos = self.scan_word(pos);
                continue;
            }

            self.flush();
            self.tokens.push(Token::symbol(c));
            pos += 1;
        }

        self.flush();
    }

    /// Consume a letter-led word; a word followed by `:` stays buffered for the range scan
    fn scan_word(&mut self, mut pos: usize) -> usize {
        if !self.buffer.is_empty() && self.buffer.parse::<f64>().is_ok() {
            self.flush();
        }

        while let Some(c) = self.peek_at(pos).filter(|c| c.is_alphanumeric()) {
            self.buffer.push(c);
            pos += 1;
        }

        if self.peek_at(pos) != Some(':') {
            self.flush();
        }
        pos
    }

    /// Handle `start:end` where `start` is the pending buffer and `pos` is at the colon
    fn scan_range(&mut self, colon: usize) -> usize {
        let start = std::mem::take(&mut self.buffer);

        let mut pos = colon + 1;
        while self.peek_at(pos).map_or(false, |c| c.is_alphanumeric()) {
            pos += 1;
        }

        if pos == colon + 1 {
            self.tokens.push(Token::word(&start));
            self.tokens.push(Token::Symbol(':'));
            return pos;
        }

        let end: String = self.chars[colon + 1..pos].iter().collect();
        match CellRange::from_refs(&start, &end) {
            Ok(range) => {
                for (i, addr) in range.cells().enumerate() {
                    if i > 0 {
                        self.tokens.push(Token::Comma);
                    }
                    self.tokens.push(Token::Identifier(addr.to_string()));
                }
            }
            Err(_) => {
                self.tokens.push(Token::word(&start));
                self.tokens.push(Token::Symbol(':'));
                self.tokens.push(Token::word(&end));
            }
        }
        pos
    }

    fn flush(&mut self) {
        if !self.buffer.is_empty() {
            let word = std::mem::take(&mut self.buffer);
            self.tokens.push(Token::word(&word));
        }
    }

    fn in_operand_position(&self) -> bool {
        matches!(
            self.tokens.last(),
            None | Some(Token::LeftParen) | Some(Token::Comma) | Some(Token::Operator(_))
        )
    }

    fn peek_at(&self, pos: usize) -> Option<char> {
        self.chars.get(pos).copied()
    }
}
