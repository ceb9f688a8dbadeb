//! Built-in aggregate functions

use crate::error::{FormulaError, FormulaResult};
use std::fmt;

/// The closed set of functions a formula may call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Sum,
    Average,
    Max,
    Min,
    Median,
}

impl Function {
    /// Every built-in function
    pub const ALL: [Function; 5] = [
        Function::Sum,
        Function::Average,
        Function::Max,
        Function::Min,
        Function::Median,
    ];

    /// Look up a function by name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }

    /// Function name (uppercase)
    pub fn name(&self) -> &'static str {
        match self {
            Function::Sum => "SUM",
            Function::Average => "AVERAGE",
            Function::Max => "MAX",
            Function::Min => "MIN",
            Function::Median => "MEDIAN",
        }
    }

    /// Apply the function to already-coerced arguments
    ///
    /// Every function needs at least one argument; there are no identity values.
    pub fn apply(&self, args: &[f64]) -> FormulaResult<f64> {
        if args.is_empty() {
            return Err(FormulaError::ArgumentCount {
                function: self.name().to_string(),
                expected: "at least 1".to_string(),
                actual: 0,
            });
        }

        let result = match self {
            Function::Sum => args.iter().sum(),
            Function::Average => args.iter().sum::<f64>() / args.len() as f64,
            Function::Max => args.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Function::Min => args.iter().copied().fold(f64::INFINITY, f64::min),
            Function::Median => median(args),
        };

        Ok(result)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn median(args: &[f64]) -> f64 {
    let mut sorted = args.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
