//! # tablecalc-csv
//!
//! CSV reader and writer for tablecalc tables.
//!
//! Each field holds a number, a formula (text starting with `=`) or nothing. Formulas
//! are loaded as text only; run a recalculation after reading to compute them.

mod error;
mod options;
mod reader;
mod writer;

pub use error::{CsvError, CsvResult};
pub use options::{CsvReadOptions, CsvWriteOptions, LineTerminator};
pub use reader::CsvReader;
pub use writer::CsvWriter;
