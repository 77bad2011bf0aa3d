//! # tablecalc-core
//!
//! Core data structures for the tablecalc formula engine.
//!
//! This crate provides:
//! - [`CellAddress`] and [`CellRange`] - A1-style addressing
//! - [`Grid`] - Fixed-size numeric cell storage, read through [`CellSource`]
//! - [`FormulaTable`] - The formula text stored alongside the grid
//! - [`Table`] - A grid and its formulas
//!
//! ## Example
//!
//! ```rust
//! use tablecalc_core::Table;
//!
//! let mut table = Table::new();
//!
//! // Using string addresses
//! table.set_cell_value("A1", 10.0).unwrap();
//!
//! // Or using row/column indices (0-based)
//! table.set_cell_value_at(1, 0, 3.5).unwrap();
//!
//! assert_eq!(table.get_value("A2").unwrap(), 3.5);
//! ```

pub mod cell;
pub mod error;
pub mod grid;
pub mod table;

// Re-exports for convenience
pub use cell::{CellAddress, CellRange, CellRangeIterator};
pub use error::{Error, Result};
pub use grid::{CellSource, FormulaTable, Grid};
pub use table::{Table, TableOptions};

/// Default number of rows in a new table
pub const DEFAULT_ROWS: u32 = 100;

/// Default number of columns in a new table (A..Z)
pub const DEFAULT_COLS: u32 = 26;
