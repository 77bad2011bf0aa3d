//! Property-based tests for arithmetic and precedence.
//!
//! Operands are small integers so every expected value is computed with the same
//! IEEE operations, in the same order, as the evaluator.

use proptest::prelude::*;
use tablecalc::prelude::*;

fn eval(formula: &str) -> f64 {
    Table::new().evaluate_formula(formula).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn multiplication_binds_tighter(a in 0u32..1000, b in 0u32..1000, c in 0u32..1000) {
        let (a, b, c) = (a as f64, b as f64, c as f64);
        prop_assert_eq!(eval(&format!("={}+{}*{}", a, b, c)), a + b * c);
        prop_assert_eq!(eval(&format!("={}*{}+{}", a, b, c)), a * b + c);
        prop_assert_eq!(eval(&format!("=({}+{})*{}", a, b, c)), (a + b) * c);
    }

    #[test]
    fn subtraction_and_division_associate_left(a in 0u32..1000, b in 1u32..100, c in 1u32..100) {
        let (a, b, c) = (a as f64, b as f64, c as f64);
        prop_assert_eq!(eval(&format!("={}-{}-{}", a, b, c)), a - b - c);
        prop_assert_eq!(eval(&format!("={}/{}/{}", a, b, c)), a / b / c);
        prop_assert_eq!(eval(&format!("={}-{}+{}", a, b, c)), a - b + c);
    }

    #[test]
    fn sum_matches_column_total(values in proptest::collection::vec(0u32..10_000, 1..30)) {
        let mut table = Table::new();
        for (row, value) in values.iter().enumerate() {
            table.set_cell_value(&format!("A{}", row + 1), *value as f64).unwrap();
        }
        let expected: f64 = values.iter().map(|v| *v as f64).sum();
        let formula = format!("=SUM(A1:A{})", values.len());

        prop_assert_eq!(table.evaluate_formula(&formula).unwrap(), expected);
        prop_assert_eq!(
            table.evaluate_formula(&format!("=COUNT(A1:A{})", values.len())).unwrap(),
            values.len() as f64
        );
    }

    #[test]
    fn whitespace_and_case_do_not_matter(a in 0u32..1000, b in 0u32..1000) {
        let mut table = Table::new();
        table.set_cell_value("B2", a as f64).unwrap();
        table.set_cell_value("C2", b as f64).unwrap();

        let compact = table.evaluate_formula("=MAX(B2:C2)-MIN(B2,C2)").unwrap();
        let spaced = table.evaluate_formula("  =  max( b2 : c2 ) - min( b2 , c2 )").unwrap();
        prop_assert_eq!(compact, spaced);
    }
}
