//! Reference extraction for dependency tracking

use crate::lexer::{tokenize, Token};
use ahash::RandomState;
use my_sheets_core::{CellAddress, FORMULA_PREFIX};
use std::collections::HashSet;

/// Collect the cells a formula reads
///
/// Ranges are expanded, duplicates removed, and the order is that of first
/// occurrence. Identifiers that are not valid addresses are skipped, as are the
/// two halves of a range that failed to expand.
///
/// # Example
/// ```rust
/// use my_sheets_core::CellAddress;
/// use my_sheets_formula::extract_references;
///
/// let refs = extract_references("=A1+SUM(A1:B1)");
/// assert_eq!(refs, vec![CellAddress::new(0, 0), CellAddress::new(0, 1)]);
/// ```
pub fn extract_references(formula: &str) -> Vec<CellAddress> {
    let body = formula.strip_prefix(FORMULA_PREFIX).unwrap_or(formula);
    let tokens = tokenize(body);

    let mut seen: HashSet<CellAddress, RandomState> = HashSet::default();
    let mut refs = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        let Token::Identifier(name) = token else {
            continue;
        };
        if next_to_colon(&tokens, i) {
            continue;
        }
        if let Ok(addr) = CellAddress::parse(name) {
            if seen.insert(addr) {
                refs.push(addr);
            }
        }
    }

    refs
}

fn next_to_colon(tokens: &[Token], i: usize) -> bool {
    let colon = |t: Option<&Token>| t == Some(&Token::Symbol(':'));
    colon(i.checked_sub(1).and_then(|p| tokens.get(p))) || colon(tokens.get(i + 1))
}
