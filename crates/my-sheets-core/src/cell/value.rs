//! Cell value types

use lazy_regex::regex_is_match;
use std::fmt;

/// Represents the value held by a cell
///
/// Every consumer has to handle all three cases; the error sentinels are a
/// separate variant so a text cell that happens to read `#CYCLE!` is still text.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellValue {
    /// Numeric value
    Number(f64),

    /// Text value (the empty string for a blank cell)
    Text(String),

    /// Error sentinel (#ERROR!, #CYCLE!)
    Error(CellError),
}

impl CellValue {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(s.into())
    }

    /// The value of a blank cell
    pub fn blank() -> Self {
        CellValue::Text(String::new())
    }

    /// Check if this is the cycle sentinel
    pub fn is_cycle(&self) -> bool {
        matches!(self, CellValue::Error(CellError::Cycle))
    }

    /// Get the value as a number, if it is one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the value as a number, parsing numeric text
    pub fn coerce_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => parse_number(s),
            CellValue::Error(_) => None,
        }
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Number(_) => "number",
            CellValue::Text(_) => "text",
            CellValue::Error(_) => "error",
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::blank()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::text(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<CellError> for CellValue {
    fn from(e: CellError) -> Self {
        CellValue::Error(e)
    }
}

/// Error sentinels a cell can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellError {
    /// #ERROR! - Any evaluation failure other than a cycle
    Eval,
    /// #CYCLE! - The cell participates in or reads a circular reference
    Cycle,
}

impl CellError {
    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::Eval => "#ERROR!",
            CellError::Cycle => "#CYCLE!",
        }
    }

    /// Parse an error string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "#ERROR!" => Some(CellError::Eval),
            "#CYCLE!" => Some(CellError::Cycle),
            _ => None,
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse numeric text (e.g. "42", "-1.5", " .5 ", "2e3")
///
/// Only plain decimal notation is accepted: words such as `inf` or `NaN`,
/// grouping separators and values that overflow `f64` stay text.
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if !regex_is_match!(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$", s) {
        return None;
    }
    s.parse().ok().filter(|n: &f64| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number("-1.5"), Some(-1.5));
        assert_eq!(parse_number("+3"), Some(3.0));
        assert_eq!(parse_number(" .5 "), Some(0.5));
        assert_eq!(parse_number("5."), Some(5.0));
        assert_eq!(parse_number("2e3"), Some(2000.0));

        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("1.2.3"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("1,000"), None);
        assert_eq!(parse_number("."), None);
        assert_eq!(parse_number("1e999"), None);
        assert_eq!(parse_number("-1e999"), None);
        assert_eq!(parse_number("1e-999"), Some(0.0));
    }

    #[test]
    fn test_error_strings() {
        assert_eq!(CellError::Eval.to_string(), "#ERROR!");
        assert_eq!(CellError::Cycle.to_string(), "#CYCLE!");
        assert_eq!(CellError::from_str("#CYCLE!"), Some(CellError::Cycle));
        assert_eq!(CellError::from_str("#cycle!"), None);
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(CellValue::Number(2.5).coerce_number(), Some(2.5));
        assert_eq!(CellValue::text("7").coerce_number(), Some(7.0));
        assert_eq!(CellValue::text("seven").coerce_number(), None);
        assert_eq!(CellValue::blank().coerce_number(), None);
        assert_eq!(CellValue::Error(CellError::Eval).coerce_number(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Number(15.0).to_string(), "15");
        assert_eq!(CellValue::Number(3.5).to_string(), "3.5");
        assert_eq!(CellValue::text("hi").to_string(), "hi");
        assert_eq!(CellValue::Error(CellError::Cycle).to_string(), "#CYCLE!");
    }

    #[test]
    fn test_cycle_text_is_not_the_sentinel() {
        assert!(!CellValue::text("#CYCLE!").is_cycle());
        assert!(CellValue::Error(CellError::Cycle).is_cycle());
    }
}
