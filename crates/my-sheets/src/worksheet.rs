//! Worksheet: cell storage plus the dependency graph, kept settled on every edit

use crate::calculation::{CalculationOptions, RecalcMode};
use my_sheets_core::{
    parse_number, Cell, CellAddress, CellError, CellRange, CellStorage, CellValue, Result,
    FORMULA_PREFIX,
};
use my_sheets_formula::{evaluate, extract_references, DependencyGraph, FormulaResult};
use std::fmt;

type Listener = Box<dyn FnMut(CellAddress)>;

/// A single sheet of cells
///
/// The worksheet is the only writer of its cells and its dependency graph.
/// Every call to [`Worksheet::set_cell`] returns with the sheet fully
/// recalculated: dependents updated, cycles marked, and previously cyclic
/// cells retried.
///
/// # Example
/// ```rust
/// use my_sheets::{CellValue, Worksheet};
///
/// let mut sheet = Worksheet::new();
/// sheet.set_cell(0, 0, "10");
/// sheet.set_cell(0, 1, "=A1*2");
/// assert_eq!(sheet.get_cell(0, 1).value(), &CellValue::Number(20.0));
///
/// sheet.set_cell(0, 0, "5");
/// assert_eq!(sheet.get_cell(0, 1).value(), &CellValue::Number(10.0));
/// ```
pub struct Worksheet {
    cells: CellStorage,
    graph: DependencyGraph,
    options: CalculationOptions,
    listeners: Vec<Listener>,
}

impl Default for Worksheet {
    fn default() -> Self {
        Self::with_options(CalculationOptions::default())
    }
}

impl fmt::Debug for Worksheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worksheet")
            .field("cells", &self.cells)
            .field("graph", &self.graph)
            .field("options", &self.options)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Worksheet {
    /// Create an empty worksheet with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty worksheet with custom options
    pub fn with_options(options: CalculationOptions) -> Self {
        Self {
            cells: CellStorage::new(),
            graph: DependencyGraph::new(),
            options,
            listeners: Vec::new(),
        }
    }

    /// Calculation options in effect
    pub fn options(&self) -> &CalculationOptions {
        &self.options
    }

    // === Reading ===

    /// Get a cell, creating an empty one on first access
    pub fn get_cell(&mut self, row: u32, col: u32) -> &Cell {
        self.cells.get_or_create(CellAddress::new(row, col))
    }

    /// Get a cell by A1-style address, creating it on first access
    pub fn cell(&mut self, address: &str) -> Result<&Cell> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cells.get_or_create(addr))
    }

    /// Get a cell without materializing it
    pub fn cell_at(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(CellAddress::new(row, col))
    }

    /// All materialized cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Number of materialized cells (read or written at least once)
    pub fn active_cell_count(&self) -> usize {
        self.cells.cell_count()
    }

    /// Smallest range covering every materialized cell
    pub fn used_range(&self) -> Option<CellRange> {
        let (min_row, min_col, max_row, max_col) = self.cells.used_bounds()?;
        Some(CellRange::new(
            CellAddress::new(min_row, min_col),
            CellAddress::new(max_row, max_col),
        ))
    }

    /// The sheet's dependency graph, read-only
    pub fn dependency_graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Cells whose formulas read the given cell, sorted
    pub fn dependents_of(&self, row: u32, col: u32) -> Vec<CellAddress> {
        let mut cells: Vec<_> = self.graph.dependents(CellAddress::new(row, col)).collect();
        cells.sort();
        cells
    }

    /// Cells the given cell's formula reads, sorted
    pub fn dependencies_of(&self, row: u32, col: u32) -> Vec<CellAddress> {
        let mut cells: Vec<_> = self
            .graph
            .dependencies(CellAddress::new(row, col))
            .collect();
        cells.sort();
        cells
    }

    /// Check whether a formula would evaluate without `#ERROR!`
    ///
    /// References resolve to [`CalculationOptions::validation_placeholder`];
    /// the sheet is never touched. Anything that is not a formula is valid.
    pub fn is_formula_valid(&self, expression: &str) -> bool {
        if !expression.starts_with(FORMULA_PREFIX) {
            return true;
        }

        let placeholder = self.options.validation_placeholder;
        let value = evaluate(expression, |_: &str| -> FormulaResult<CellValue> {
            Ok(CellValue::Number(placeholder))
        });
        value != CellValue::Error(CellError::Eval)
    }

    // === Writing ===

    /// Register a change listener
    ///
    /// Listeners run in subscription order, once per changed cell, including
    /// cells changed by recalculation and cycle handling.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(CellAddress) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Set a cell's expression and recalculate everything it affects
    pub fn set_cell<S: Into<String>>(&mut self, row: u32, col: u32, expression: S) {
        let addr = CellAddress::new(row, col);

        self.graph.clear_dependencies(addr);
        self.cells.get_or_create(addr).set_expression(expression);
        self.update_cell(addr);

        self.notify(addr);
        self.recalculate(addr);
        self.recover_cycles();
    }

    /// Set a cell by A1-style address
    pub fn set_cell_at_address<S: Into<String>>(&mut self, address: &str, expression: S) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell(addr.row, addr.col, expression);
        Ok(())
    }

    /// Drop every cell and dependency edge; listeners stay subscribed
    pub fn clear(&mut self) {
        self.cells.clear();
        self.graph.clear();
    }

    // === Calculation ===

    /// Register the cell's references and compute its value
    ///
    /// The caller must have cleared the cell's old dependencies.
    fn update_cell(&mut self, addr: CellAddress) {
        let cell = self.cells.get_or_create(addr);
        if !cell.is_formula() {
            if let Some(value) = cell.literal_value() {
                cell.set_value(value);
            }
            return;
        }

        let expression = cell.expression().to_string();
        for target in extract_references(&expression) {
            if let Err(cycle) = self.graph.try_add_dependency(addr, target) {
                self.cells
                    .get_or_create(addr)
                    .set_value(CellValue::Error(CellError::Cycle));
                for member in cycle.path {
                    self.cells
                        .get_or_create(member)
                        .set_value(CellValue::Error(CellError::Cycle));
                    self.notify(member);
                }
                return;
            }
        }

        self.evaluate_cell(addr);
    }

    /// Re-evaluate a formula cell against the current sheet
    fn evaluate_cell(&mut self, addr: CellAddress) {
        let Some(expression) = self.cells.get(addr).map(|c| c.expression().to_string()) else {
            return;
        };

        let cells = &mut self.cells;
        let value = evaluate(&expression, |reference: &str| resolve(cells, reference));
        self.cells.get_or_create(addr).set_value(value);
    }

    /// Push a change out to every formula that reads `addr`, directly or not
    fn recalculate(&mut self, addr: CellAddress) {
        match self.options.recalc_mode {
            RecalcMode::Cascade => self.recalculate_cascade(addr),
            RecalcMode::Ordered => self.recalculate_ordered(addr),
        }
    }

    fn recalculate_cascade(&mut self, addr: CellAddress) {
        let mut stack: Vec<CellAddress> = self.graph.dependents(addr).collect();
        stack.reverse();

        while let Some(dependent) = stack.pop() {
            if !self.is_formula(dependent) {
                continue;
            }

            log::trace!("Recalculating {} (reads {})", dependent, addr);
            self.evaluate_cell(dependent);
            self.notify(dependent);

            let start = stack.len();
            stack.extend(self.graph.dependents(dependent));
            stack[start..].reverse();
        }
    }

    fn recalculate_ordered(&mut self, addr: CellAddress) {
        for dependent in self.graph.recalc_order(&[addr]) {
            if !self.is_formula(dependent) {
                continue;
            }

            log::trace!("Recalculating {} (after {})", dependent, addr);
            self.evaluate_cell(dependent);
            self.notify(dependent);
        }
    }

    /// Retry every cell currently marked `#CYCLE!`
    ///
    /// An edit anywhere may have broken the loop a cell was part of, so the
    /// whole sheet is rescanned rather than just the edited cell's neighbourhood.
    fn recover_cycles(&mut self) {
        let cyclic: Vec<CellAddress> = self
            .cells
            .iter()
            .filter(|cell| cell.value().is_cycle())
            .map(Cell::address)
            .collect();

        for addr in cyclic {
            self.graph.clear_dependencies(addr);
            self.update_cell(addr);

            let recovered = self
                .cells
                .get(addr)
                .map_or(false, |cell| !cell.value().is_cycle());
            if recovered {
                log::trace!("{} recovered from a circular reference", addr);
                self.notify(addr);
                self.recalculate(addr);
            }
        }
    }

    fn is_formula(&self, addr: CellAddress) -> bool {
        self.cells.get(addr).map_or(false, Cell::is_formula)
    }

    fn notify(&mut self, addr: CellAddress) {
        for listener in &mut self.listeners {
            listener(addr);
        }
    }
}

/// Value of a referenced cell as a formula sees it
///
/// The cycle sentinel passes through; anything that is not a number (or
/// numeric text) reads as `0.0`. Unknown cells are materialized.
fn resolve(cells: &mut CellStorage, reference: &str) -> FormulaResult<CellValue> {
    let addr = CellAddress::parse(reference)?;

    let value = match cells.get_or_create(addr).value() {
        CellValue::Number(n) => CellValue::Number(*n),
        CellValue::Text(text) => CellValue::Number(parse_number(text).unwrap_or(0.0)),
        CellValue::Error(CellError::Cycle) => CellValue::Error(CellError::Cycle),
        CellValue::Error(CellError::Eval) => CellValue::Number(0.0),
    };
    Ok(value)
}
