//! Table calculation
//!
//! Evaluates formulas against a [`Table`] and re-runs stored formulas on demand.
//! Recalculation is a plain row-major scan over formula cells with no dependency
//! ordering: a formula that reads a formula cell scanned later in the same pass sees
//! that cell's value from before the pass. Extra passes settle such chains.
//!
//! # Example
//!
//! ```rust
//! use tablecalc::prelude::*;
//!
//! let mut table = Table::new();
//! table.set_cell_value("A1", 10.0).unwrap();
//! table.set_cell_value("A2", 20.0).unwrap();
//! assert_eq!(table.set_cell_formula("A3", "=A1+A2").unwrap(), 30.0);
//!
//! table.set_cell_value("A1", 15.0).unwrap();
//! let stats = table.recalculate();
//! assert_eq!(stats.cells_calculated, 1);
//! assert_eq!(table.get_value("A3").unwrap(), 35.0);
//! ```

use crate::{CellAddress, Error, FormulaEngine, FormulaError, Table};
use thiserror::Error;

/// Errors from setting or evaluating a formula on a table
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculationError {
    /// Formula could not be parsed or evaluated
    #[error(transparent)]
    Formula(#[from] FormulaError),

    /// Bad address or cell outside the table
    #[error(transparent)]
    Core(#[from] Error),
}

/// Result type for calculation operations
pub type CalculationResult<T> = std::result::Result<T, CalculationError>;

/// Options for table recalculation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculationOptions {
    /// Number of full row-major passes (default: 1)
    pub passes: u32,
}

impl Default for CalculationOptions {
    fn default() -> Self {
        Self { passes: 1 }
    }
}

/// Statistics from a recalculation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalculationStats {
    /// Total number of formula cells
    pub formula_count: usize,
    /// Number of formula evaluations, summed over all passes
    pub cells_calculated: usize,
    /// Number of evaluations that failed
    pub errors: usize,
    /// Number of passes performed
    pub passes: u32,
}

/// Extension trait for Table to add formula and calculation methods
pub trait TableCalculationExt {
    /// Evaluate a formula, then store it and its result at an address (e.g., "A3")
    fn set_cell_formula(&mut self, address: &str, formula: &str) -> CalculationResult<f64>;

    /// Evaluate a formula, then store it and its result at a cell position.
    ///
    /// On failure nothing is stored and the cell keeps its previous value and formula.
    fn set_cell_formula_at(&mut self, row: u32, col: u32, formula: &str)
        -> CalculationResult<f64>;

    /// Evaluate a formula against the table without storing anything
    fn evaluate_formula(&self, formula: &str) -> CalculationResult<f64>;

    /// Re-evaluate every stored formula once
    fn recalculate(&mut self) -> CalculationStats;

    /// Re-evaluate every stored formula with custom options
    fn recalculate_with_options(&mut self, options: &CalculationOptions) -> CalculationStats;
}

impl TableCalculationExt for Table {
    fn set_cell_formula(&mut self, address: &str, formula: &str) -> CalculationResult<f64> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_formula_at(addr.row, addr.col, formula)
    }

    fn set_cell_formula_at(
        &mut self,
        row: u32,
        col: u32,
        formula: &str,
    ) -> CalculationResult<f64> {
        let value = self.evaluate_formula(formula)?;
        self.set_formula_with_result(row, col, formula, value)?;
        tracing::debug!(cell = %CellAddress::new(row, col), formula, value, "set formula");
        Ok(value)
    }

    fn evaluate_formula(&self, formula: &str) -> CalculationResult<f64> {
        Ok(FormulaEngine::new(self).parse(formula)?)
    }

    fn recalculate(&mut self) -> CalculationStats {
        self.recalculate_with_options(&CalculationOptions::default())
    }

    fn recalculate_with_options(&mut self, options: &CalculationOptions) -> CalculationStats {
        // Snapshot the formula cells so results can be written while scanning
        let formulas: Vec<(CellAddress, String)> = self
            .formula_cells()
            .map(|(addr, formula)| (addr, formula.to_string()))
            .collect();

        let mut stats = CalculationStats {
            formula_count: formulas.len(),
            ..Default::default()
        };

        for pass in 0..options.passes {
            let mut pass_errors = 0;

            for (addr, formula) in &formulas {
                let value = match FormulaEngine::new(&*self).parse(formula) {
                    Ok(value) => value,
                    Err(e) => {
                        tracing::warn!(cell = %addr, %formula, error = %e, "formula evaluation failed");
                        pass_errors += 1;
                        f64::NAN
                    }
                };

                // Formula cells come from the table itself, so the write is in bounds
                if let Err(e) = self.set_formula_result(addr.row, addr.col, value) {
                    tracing::warn!(cell = %addr, error = %e, "could not store formula result");
                    pass_errors += 1;
                }
                stats.cells_calculated += 1;
            }

            stats.errors += pass_errors;
            stats.passes = pass + 1;
            tracing::debug!(
                pass = pass + 1,
                formulas = formulas.len(),
                errors = pass_errors,
                "recalculation pass complete"
            );
        }

        stats
    }
}
