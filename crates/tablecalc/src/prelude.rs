//! Prelude module - common imports for tablecalc users
//!
//! ```rust
//! use tablecalc::prelude::*;
//! ```

pub use crate::{
    // Calculation types
    CalculationError,
    CalculationOptions,
    CalculationStats,
    // Address types
    CellAddress,
    CellRange,
    // Error types
    Error,
    FormulaError,
    Result,
    // Main types
    Table,
    // Extension traits
    TableCalculationExt,
    TableOptions,
};

// I/O types
#[cfg(feature = "csv")]
pub use crate::{CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter};
