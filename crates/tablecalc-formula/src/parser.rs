//! Formula parsing entry point
//!
//! Normalizes formula text, then runs the tokenizer and the shunting-yard compiler.

use crate::compiler::compile;
use crate::error::{FormulaError, FormulaResult};
use crate::token::Postfix;
use crate::tokenizer::tokenize;

/// Check the leading '=' and normalize the body: ASCII uppercase, whitespace removed.
///
/// Only ASCII letters change case, so no character ever expands into several.
///
/// # Example
/// ```rust
/// use tablecalc_formula::normalize_formula;
///
/// assert_eq!(normalize_formula("  = sum( a1 : a3 ) ").unwrap(), "SUM(A1:A3)");
/// assert!(normalize_formula("1+2").is_err());
/// ```
pub fn normalize_formula(formula: &str) -> FormulaResult<String> {
    let body = formula
        .trim()
        .strip_prefix('=')
        .ok_or_else(|| FormulaError::Format(formula.to_string()))?;

    Ok(body
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect())
}

/// Parse formula text into postfix order
///
/// # Example
/// ```rust
/// use tablecalc_formula::parse_formula;
///
/// let postfix = parse_formula("=SUM(A1:A3)*2").unwrap();
/// assert_eq!(postfix.to_string(), "A1:A3 SUM/1 2 *");
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<Postfix> {
    let body = normalize_formula(formula)?;
    compile(tokenize(&body)?)
}
