//! Table type
//!
//! A [`Table`] pairs a numeric [`Grid`] with a parallel [`FormulaTable`]. It only stores
//! formulas and their last results; evaluating them is the formula engine's job.

use crate::cell::{CellAddress, CellRange};
use crate::error::Result;
use crate::grid::{bounding_range, CellSource, FormulaTable, Grid};
use crate::{DEFAULT_COLS, DEFAULT_ROWS};

/// Options for creating a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableOptions {
    /// Number of rows (default: 100)
    pub rows: u32,
    /// Number of columns (default: 26)
    pub cols: u32,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
        }
    }
}

/// A grid of numeric cells plus the formulas that produce some of them
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    grid: Grid,
    formulas: FormulaTable,
}

impl Table {
    /// Create a table with the default dimensions
    pub fn new() -> Self {
        Self {
            grid: Grid::default(),
            formulas: FormulaTable::default(),
        }
    }

    /// Create a table with custom dimensions
    pub fn with_options(options: &TableOptions) -> Result<Self> {
        Ok(Self {
            grid: Grid::new(options.rows, options.cols)?,
            formulas: FormulaTable::new(options.rows, options.cols)?,
        })
    }

    /// Number of rows
    pub fn rows(&self) -> u32 {
        self.grid.rows()
    }

    /// Number of columns
    pub fn cols(&self) -> u32 {
        self.grid.cols()
    }

    /// The underlying value grid
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    // === Values ===

    /// Get a cell value by address string (e.g., "A1")
    pub fn get_value(&self, address: &str) -> Result<f64> {
        let addr = CellAddress::parse(address)?;
        Ok(self.get_value_at(addr.row, addr.col))
    }

    /// Get a cell value by indices (0 for unset or out-of-range cells)
    pub fn get_value_at(&self, row: u32, col: u32) -> f64 {
        self.grid.read_cell(row, col)
    }

    /// Set a cell value by address string
    pub fn set_cell_value(&mut self, address: &str, value: f64) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_value_at(addr.row, addr.col, value)
    }

    /// Set a cell value by row and column indices
    ///
    /// A direct write replaces whatever produced the cell before: any formula stored for the
    /// cell is dropped, so a later recalculation leaves the value alone.
    pub fn set_cell_value_at(&mut self, row: u32, col: u32, value: f64) -> Result<()> {
        self.grid.set(row, col, value)?;
        if let Some(formula) = self.formulas.clear(row, col) {
            tracing::debug!(
                cell = %CellAddress::new(row, col),
                %formula,
                "value write replaced formula"
            );
        }
        Ok(())
    }

    // === Formulas ===

    /// Get the formula text at an address, if any
    pub fn get_formula(&self, address: &str) -> Result<Option<&str>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.get_formula_at(addr.row, addr.col))
    }

    /// Get the formula text at a cell position, if any
    pub fn get_formula_at(&self, row: u32, col: u32) -> Option<&str> {
        self.formulas.get(row, col)
    }

    /// Store formula text without evaluating it
    ///
    /// The cell keeps its current value until the formula is evaluated. Used when loading
    /// saved tables, where every formula is computed afterwards in one recalculation.
    pub fn store_formula_at(&mut self, row: u32, col: u32, formula: &str) -> Result<()> {
        self.grid.checked_index(row, col)?;
        self.formulas.set(row, col, formula.to_string());
        Ok(())
    }

    /// Store formula text and its freshly computed value together
    pub fn set_formula_with_result(
        &mut self,
        row: u32,
        col: u32,
        formula: &str,
        value: f64,
    ) -> Result<()> {
        self.grid.set(row, col, value)?;
        self.formulas.set(row, col, formula.to_string());
        Ok(())
    }

    /// Write the result of a formula cell, keeping its formula
    pub fn set_formula_result(&mut self, row: u32, col: u32, value: f64) -> Result<()> {
        self.grid.set(row, col, value)
    }

    /// Remove the formula at a cell, keeping its last value
    pub fn clear_formula_at(&mut self, row: u32, col: u32) -> Option<String> {
        self.formulas.clear(row, col)
    }

    /// Iterate over formula cells in row-major order
    pub fn formula_cells(&self) -> impl Iterator<Item = (CellAddress, &str)> + '_ {
        self.formulas.iter()
    }

    /// Number of formula cells
    pub fn formula_count(&self) -> usize {
        self.formulas.len()
    }

    // === Range Operations ===

    /// Bounds of all non-zero values and formula cells
    pub fn used_range(&self) -> Option<CellRange> {
        let values = self.grid.used_range().into_iter().flat_map(|r| [r.start, r.end]);
        let formulas = self.formulas.iter().map(|(addr, _)| addr);
        bounding_range(values.chain(formulas))
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl CellSource for Table {
    fn read_cell(&self, row: u32, col: u32) -> f64 {
        self.grid.read_cell(row, col)
    }

    fn dimensions(&self) -> (u32, u32) {
        self.grid.dimensions()
    }
}
