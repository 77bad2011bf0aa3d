//! Math functions

use crate::error::{FormulaError, FormulaResult};
use crate::value::ValueList;

/// SUM function
pub fn fn_sum(args: &ValueList) -> FormulaResult<f64> {
    Ok(args.sum())
}

/// AVERAGE function
///
/// The average of no values is NaN rather than an error.
pub fn fn_average(args: &ValueList) -> FormulaResult<f64> {
    Ok(args.sum() / args.len() as f64)
}

/// MIN function
pub fn fn_min(args: &ValueList) -> FormulaResult<f64> {
    args.min()
        .ok_or_else(|| FormulaError::EmptyArguments("MIN".into()))
}

/// MAX function
pub fn fn_max(args: &ValueList) -> FormulaResult<f64> {
    args.max()
        .ok_or_else(|| FormulaError::EmptyArguments("MAX".into()))
}

/// COUNT function
pub fn fn_count(args: &ValueList) -> FormulaResult<f64> {
    Ok(args.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(values: &[f64]) -> ValueList {
        ValueList::new(values.to_vec())
    }

    #[test]
    fn test_sum() {
        assert_eq!(fn_sum(&list(&[1.0, 2.0, 3.5])).unwrap(), 6.5);
        assert_eq!(fn_sum(&list(&[])).unwrap(), 0.0);
    }

    #[test]
    fn test_average() {
        assert_eq!(fn_average(&list(&[1.0, 2.0, 3.0])).unwrap(), 2.0);
        assert!(fn_average(&list(&[])).unwrap().is_nan());
        // Implicit zeros count toward the divisor
        assert_eq!(
            fn_average(&ValueList::with_zeros(vec![6.0], 2)).unwrap(),
            2.0
        );
    }

    #[test]
    fn test_min_max() {
        assert_eq!(fn_min(&list(&[3.0, -1.0, 2.0])).unwrap(), -1.0);
        assert_eq!(fn_max(&list(&[3.0, -1.0, 2.0])).unwrap(), 3.0);
        assert_eq!(fn_min(&ValueList::with_zeros(vec![3.0], 1)).unwrap(), 0.0);
        assert_eq!(
            fn_min(&list(&[])).unwrap_err(),
            FormulaError::EmptyArguments("MIN".into())
        );
        assert_eq!(
            fn_max(&list(&[])).unwrap_err(),
            FormulaError::EmptyArguments("MAX".into())
        );
    }

    #[test]
    fn test_count() {
        assert_eq!(fn_count(&list(&[0.0, 0.0, 7.0])).unwrap(), 3.0);
        assert_eq!(fn_count(&list(&[])).unwrap(), 0.0);
        assert_eq!(fn_count(&ValueList::with_zeros(vec![1.0], 9)).unwrap(), 10.0);
    }
}
