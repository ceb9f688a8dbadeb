//! Recalculation settings

/// How a worksheet propagates an edit to the cells that read it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecalcMode {
    /// Depth-first over dependents, re-evaluating a cell once per path that
    /// reaches it
    #[default]
    Cascade,
    /// Every transitive dependent is evaluated exactly once, in topological order
    Ordered,
}

/// Options for worksheet calculation
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationOptions {
    /// Propagation strategy after an edit (default: cascade)
    pub recalc_mode: RecalcMode,
    /// Value every reference resolves to when validating a formula (default: 1.0)
    pub validation_placeholder: f64,
}

impl Default for CalculationOptions {
    fn default() -> Self {
        Self {
            recalc_mode: RecalcMode::Cascade,
            validation_placeholder: 1.0,
        }
    }
}

impl CalculationOptions {
    /// Options with the given propagation strategy
    pub fn with_recalc_mode(mut self, mode: RecalcMode) -> Self {
        self.recalc_mode = mode;
        self
    }
}
