//! # tablecalc-formula
//!
//! Formula engine for tablecalc.
//!
//! This crate provides:
//! - Formula normalization and tokenizing (text → tokens)
//! - A shunting-yard compiler (tokens → postfix)
//! - A stack evaluator over any [`tablecalc_core::CellSource`]
//! - Built-in aggregates: SUM, AVERAGE, MIN, MAX, COUNT
//!
//! ## Example
//!
//! ```rust
//! use tablecalc_core::Grid;
//! use tablecalc_formula::FormulaEngine;
//!
//! let mut grid = Grid::new(10, 10).unwrap();
//! grid.set(0, 0, 2.0).unwrap();
//!
//! let engine = FormulaEngine::new(&grid);
//! assert_eq!(engine.parse("=A1*3+1").unwrap(), 7.0);
//! ```

pub mod compiler;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod parser;
pub mod token;
pub mod tokenizer;
pub mod value;

pub use compiler::compile;
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate_postfix, FormulaEngine, StackEntry};
pub use functions::{FunctionDef, FunctionImpl, FunctionRegistry};
pub use parser::{normalize_formula, parse_formula};
pub use token::{Operator, Postfix, Token};
pub use tokenizer::tokenize;
pub use value::ValueList;
