//! # tablecalc
//!
//! A spreadsheet-style formula engine.
//!
//! Tablecalc keeps a fixed-size grid of numbers beside the formulas that produce some of
//! them. Formulas are compiled to postfix order with the shunting-yard algorithm and
//! evaluated against the grid; a recalculation pass re-runs every stored formula.
//!
//! ## Features
//!
//! - A1 addresses and rectangular ranges
//! - `+ - * /` with the usual precedence, parentheses
//! - SUM, AVERAGE, MIN, MAX and COUNT over any mix of numbers, cells, ranges and
//!   nested expressions
//! - Read and write CSV files (`csv` feature, on by default)
//!
//! ## Example
//!
//! ```rust
//! use tablecalc::prelude::*;
//!
//! let mut table = Table::new();
//!
//! // Set cell values
//! table.set_cell_value("A1", 1.0).unwrap();
//! table.set_cell_value("A2", 2.0).unwrap();
//! table.set_cell_value("A3", 3.0).unwrap();
//!
//! // Set a formula; it is evaluated right away
//! assert_eq!(table.set_cell_formula("B1", "=SUM(A1:A3)*2").unwrap(), 12.0);
//!
//! // Change an input and recalculate
//! table.set_cell_value("A3", 7.0).unwrap();
//! table.recalculate();
//! assert_eq!(table.get_value("B1").unwrap(), 20.0);
//! ```

pub mod calculation;
pub mod prelude;

// Re-export calculation types
pub use calculation::{
    CalculationError, CalculationOptions, CalculationResult, CalculationStats,
    TableCalculationExt,
};

// Re-export core types
pub use tablecalc_core::{
    CellAddress, CellRange, CellRangeIterator, CellSource, Error, FormulaTable, Grid, Result,
    Table, TableOptions, DEFAULT_COLS, DEFAULT_ROWS,
};

// Re-export formula types
pub use tablecalc_formula::{
    compile, evaluate_postfix, normalize_formula, parse_formula, tokenize, FormulaEngine,
    FormulaError, FormulaResult, FunctionDef, FunctionImpl, FunctionRegistry, Operator, Postfix,
    StackEntry, Token, ValueList,
};

// Re-export I/O types
#[cfg(feature = "csv")]
pub use tablecalc_csv::{
    CsvError, CsvReadOptions, CsvReader, CsvResult, CsvWriteOptions, CsvWriter, LineTerminator,
};
