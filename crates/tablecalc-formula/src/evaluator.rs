//! Postfix evaluator
//!
//! Runs a compiled formula on a value stack against a [`CellSource`]. A range pushes
//! one list entry holding its cells in row-major order; arithmetic only accepts scalars,
//! while functions flatten every entry they consume. Only the part of a range inside the
//! source is read; the rest is carried as a count of zeros.

use crate::error::{FormulaError, FormulaResult};
use crate::functions::FunctionRegistry;
use crate::parser::parse_formula;
use crate::token::{Operator, Postfix, Token};
use crate::value::ValueList;
use tablecalc_core::{CellRange, CellSource};

/// Entry on the evaluation stack
#[derive(Debug, Clone, PartialEq)]
pub enum StackEntry {
    Scalar(f64),
    /// Values of a range, row-major
    List(ValueList),
}

impl StackEntry {
    /// Numeric value, if this is a scalar
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            StackEntry::Scalar(n) => Some(*n),
            StackEntry::List(_) => None,
        }
    }
}

/// Evaluate postfix tokens against a cell source
pub fn evaluate_postfix<S: CellSource + ?Sized>(
    postfix: &Postfix,
    source: &S,
    functions: &FunctionRegistry,
) -> FormulaResult<f64> {
    let mut stack: Vec<StackEntry> = Vec::with_capacity(postfix.len());

    for token in postfix {
        match token {
            Token::Number(n) => stack.push(StackEntry::Scalar(*n)),

            Token::CellRef(addr) => stack.push(StackEntry::Scalar(
                source.read_cell(addr.row, addr.col),
            )),

            Token::CellRange(range) => stack.push(StackEntry::List(read_range(source, range))),

            Token::Operator(op) => {
                let result = evaluate_binary_op(*op, &mut stack)?;
                stack.push(StackEntry::Scalar(result));
            }

            Token::Function { name, args } => {
                let result = evaluate_function(name, *args, &mut stack, functions)?;
                stack.push(StackEntry::Scalar(result));
            }

            Token::LeftParen | Token::RightParen | Token::Comma => {
                return Err(FormulaError::Evaluation(format!(
                    "unexpected '{}' in compiled formula",
                    token
                )))
            }
        }
    }

    match (stack.pop(), stack.is_empty()) {
        (Some(StackEntry::Scalar(n)), true) => Ok(n),
        (Some(StackEntry::List(_)), true) => Err(FormulaError::Evaluation(
            "a range is not a value on its own".into(),
        )),
        (None, _) => Err(FormulaError::Evaluation("empty formula".into())),
        (Some(_), false) => Err(FormulaError::Evaluation(format!(
            "{} values left without an operator",
            stack.len() + 1
        ))),
    }
}

/// Read the cells of a range that lie inside the source
fn read_range<S: CellSource + ?Sized>(source: &S, range: &CellRange) -> ValueList {
    let (rows, cols) = source.dimensions();
    let inside = match (rows, cols) {
        (0, _) | (_, 0) => None,
        _ => range.intersect(&CellRange::from_indices(0, 0, rows - 1, cols - 1)),
    };

    let values: Vec<f64> = inside
        .iter()
        .flat_map(CellRange::cells)
        .map(|addr| source.read_cell(addr.row, addr.col))
        .collect();
    let zeros = range.cell_count().saturating_sub(values.len() as u64);

    ValueList::with_zeros(values, zeros)
}

/// Pop right then left operand and apply the operator
fn evaluate_binary_op(op: Operator, stack: &mut Vec<StackEntry>) -> FormulaResult<f64> {
    let underflow = || FormulaError::StackUnderflow(format!("'{}'", op.symbol()));

    let right = stack.pop().ok_or_else(underflow)?;
    let left = stack.pop().ok_or_else(underflow)?;

    let (left, right) = match (left.as_scalar(), right.as_scalar()) {
        (Some(l), Some(r)) => (l, r),
        _ => return Err(FormulaError::ListOperand(op.symbol())),
    };

    op.apply(left, right).ok_or_else(|| {
        FormulaError::Evaluation("range operator between non-reference operands".into())
    })
}

/// Evaluate a function call
fn evaluate_function(
    name: &str,
    args: usize,
    stack: &mut Vec<StackEntry>,
    functions: &FunctionRegistry,
) -> FormulaResult<f64> {
    let func = functions
        .get(name)
        .ok_or_else(|| FormulaError::UnknownFunction(name.to_string()))?;

    // Check argument count
    if args < func.min_args {
        return Err(FormulaError::ArgumentCount {
            function: name.to_string(),
            expected: format!("at least {}", func.min_args),
            actual: args,
        });
    }

    if let Some(max) = func.max_args {
        if args > max {
            return Err(FormulaError::ArgumentCount {
                function: name.to_string(),
                expected: format!("at most {}", max),
                actual: args,
            });
        }
    }

    if stack.len() < args {
        return Err(FormulaError::StackUnderflow(name.to_string()));
    }

    // Flatten arguments in source order
    let mut values = ValueList::default();
    for entry in stack.drain(stack.len() - args..) {
        match entry {
            StackEntry::Scalar(n) => values.push(n),
            StackEntry::List(list) => values.append(list),
        }
    }

    (func.implementation)(&values)
}

/// Evaluates formula text against a cell source
///
/// # Example
/// ```rust
/// use tablecalc_core::Grid;
/// use tablecalc_formula::FormulaEngine;
///
/// let mut grid = Grid::new(10, 10).unwrap();
/// grid.set(0, 0, 4.0).unwrap();
/// grid.set(1, 0, 6.0).unwrap();
///
/// let engine = FormulaEngine::new(&grid);
/// assert_eq!(engine.parse("=SUM(A1:A2)/2").unwrap(), 5.0);
/// ```
pub struct FormulaEngine<'a, S: CellSource + ?Sized> {
    source: &'a S,
    functions: &'a FunctionRegistry,
}

impl<'a, S: CellSource + ?Sized> FormulaEngine<'a, S> {
    /// Engine with the built-in functions
    pub fn new(source: &'a S) -> Self {
        Self::with_functions(source, FunctionRegistry::builtin())
    }

    /// Engine with a custom function registry
    pub fn with_functions(source: &'a S, functions: &'a FunctionRegistry) -> Self {
        Self { source, functions }
    }

    /// Parse and evaluate formula text
    pub fn parse(&self, formula: &str) -> FormulaResult<f64> {
        let postfix = parse_formula(formula)?;
        let value = evaluate_postfix(&postfix, self.source, self.functions)?;
        tracing::debug!(formula, value, "evaluated formula");
        Ok(value)
    }

    /// Evaluate an already compiled formula
    pub fn evaluate(&self, postfix: &Postfix) -> FormulaResult<f64> {
        evaluate_postfix(postfix, self.source, self.functions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::FunctionDef;
    use pretty_assertions::assert_eq;
    use tablecalc_core::Grid;

    /// A1=5, B1=2, A2=3, B2=4
    fn sample_grid() -> Grid {
        let mut grid = Grid::new(10, 10).unwrap();
        grid.set(0, 0, 5.0).unwrap();
        grid.set(0, 1, 2.0).unwrap();
        grid.set(1, 0, 3.0).unwrap();
        grid.set(1, 1, 4.0).unwrap();
        grid
    }

    fn eval(formula: &str) -> FormulaResult<f64> {
        let grid = sample_grid();
        FormulaEngine::new(&grid).parse(formula)
    }

    #[test]
    fn test_evaluate_arithmetic() {
        assert_eq!(eval("=1+2").unwrap(), 3.0);
        assert_eq!(eval("=10-3").unwrap(), 7.0);
        assert_eq!(eval("=4*5").unwrap(), 20.0);
        assert_eq!(eval("=20/4").unwrap(), 5.0);
        assert_eq!(eval("=2.5*2").unwrap(), 5.0);
    }

    #[test]
    fn test_evaluate_precedence() {
        assert_eq!(eval("=2+3*4").unwrap(), 14.0);
        assert_eq!(eval("=(2+3)*4").unwrap(), 20.0);
        assert_eq!(eval("=8/4/2").unwrap(), 1.0);
        assert_eq!(eval("=10-4-3").unwrap(), 3.0);
    }

    #[test]
    fn test_evaluate_references() {
        assert_eq!(eval("=A1+B1").unwrap(), 7.0);
        assert_eq!(eval("=A1*B2-A2").unwrap(), 17.0);
        // Unset and out-of-grid cells read as zero
        assert_eq!(eval("=C3+1").unwrap(), 1.0);
        assert_eq!(eval("=ZZ999+1").unwrap(), 1.0);
    }

    #[test]
    fn test_evaluate_division_by_zero() {
        assert_eq!(eval("=1/0").unwrap(), f64::INFINITY);
        assert!(eval("=0/0").unwrap().is_nan());
    }

    #[test]
    fn test_evaluate_sum() {
        assert_eq!(eval("=SUM(A1:B2)").unwrap(), 14.0);
        assert_eq!(eval("=SUM(A1,B1,10)").unwrap(), 17.0);
        assert_eq!(eval("=SUM()").unwrap(), 0.0);
    }

    #[test]
    fn test_evaluate_average() {
        assert_eq!(eval("=AVERAGE(A1:B2)").unwrap(), 3.5);
        assert!(eval("=AVERAGE()").unwrap().is_nan());
    }

    #[test]
    fn test_evaluate_min_max() {
        assert_eq!(eval("=MIN(A1:B2)").unwrap(), 2.0);
        assert_eq!(eval("=MAX(A1:B2,9)").unwrap(), 9.0);
        assert_eq!(
            eval("=MIN()").unwrap_err(),
            FormulaError::EmptyArguments("MIN".into())
        );
    }

    #[test]
    fn test_evaluate_count() {
        // Counts cells, zeros included
        assert_eq!(eval("=COUNT(A1:B2,5)").unwrap(), 5.0);
        assert_eq!(eval("=COUNT(C1:C4)").unwrap(), 4.0);
    }

    #[test]
    fn test_evaluate_reversed_range() {
        assert_eq!(eval("=SUM(B2:A1)").unwrap(), eval("=SUM(A1:B2)").unwrap());
    }

    #[test]
    fn test_evaluate_function_inside_expression() {
        assert_eq!(eval("=1+SUM(2,3)").unwrap(), 6.0);
        assert_eq!(eval("=SUM(A1:A2)*2-MAX(1,B1)").unwrap(), 14.0);
        assert_eq!(eval("=MAX(SUM(A1:B1),MIN(A2,B2))").unwrap(), 7.0);
    }

    #[test]
    fn test_evaluate_normalizes_input() {
        assert_eq!(eval("= sum( a1 : b1 ) ").unwrap(), 7.0);
    }

    #[test]
    fn test_evaluate_errors() {
        assert!(matches!(eval("1+2"), Err(FormulaError::Format(_))));
        assert!(matches!(
            eval("=1+#"),
            Err(FormulaError::UnexpectedCharacter { ch: '#', .. })
        ));
        assert!(matches!(eval("=FOO"), Err(FormulaError::InvalidReference(_))));
        assert!(matches!(
            eval("=SUM(1,2"),
            Err(FormulaError::MismatchedParenthesis(_))
        ));
        assert_eq!(
            eval("=CONCAT(1)").unwrap_err(),
            FormulaError::UnknownFunction("CONCAT".into())
        );
        assert!(matches!(eval("="), Err(FormulaError::Evaluation(_))));
        assert!(matches!(eval("=A1:B2"), Err(FormulaError::Evaluation(_))));
        assert!(matches!(eval("=(1)(2)"), Err(FormulaError::Syntax(_))));
        assert!(matches!(eval("=1+"), Err(FormulaError::Syntax(_))));
        // No unary minus
        assert_eq!(
            eval("=-1").unwrap_err(),
            FormulaError::Syntax("missing operand before '-'".into())
        );
    }

    #[test]
    fn test_evaluate_rejects_adjacent_operands() {
        for formula in ["=2(-1)", "=(10)(-3)", "=SUM(1,-2)", "=(A1)B1"] {
            assert!(
                matches!(eval(formula), Err(FormulaError::Syntax(_))),
                "{}",
                formula
            );
        }
    }

    #[test]
    fn test_evaluate_malformed_postfix() {
        let grid = sample_grid();
        let functions = FunctionRegistry::builtin();

        let dangling = Postfix::new(vec![Token::Number(1.0), Token::Operator(Operator::Add)]);
        assert_eq!(
            evaluate_postfix(&dangling, &grid, functions).unwrap_err(),
            FormulaError::StackUnderflow("'+'".into())
        );

        let leftover = Postfix::new(vec![Token::Number(1.0), Token::Number(2.0)]);
        assert!(matches!(
            evaluate_postfix(&leftover, &grid, functions),
            Err(FormulaError::Evaluation(_))
        ));

        let short_call = Postfix::new(vec![Token::Function {
            name: "SUM".into(),
            args: 2,
        }]);
        assert_eq!(
            evaluate_postfix(&short_call, &grid, functions).unwrap_err(),
            FormulaError::StackUnderflow("SUM".into())
        );
    }

    #[test]
    fn test_evaluate_explicit_range_operator() {
        assert_eq!(eval("=SUM((A1):(B2))").unwrap(), 14.0);
        assert_eq!(eval("=COUNT((B2):(A1))").unwrap(), 4.0);
    }

    #[test]
    fn test_evaluate_range_past_grid() {
        // A 10x10 grid; cells beyond it read as zero without being visited
        assert_eq!(eval("=SUM(A1:XFD1048576)").unwrap(), 14.0);
        assert_eq!(eval("=COUNT(A1:XFD1048576)").unwrap(), 17_179_869_184.0);
        assert_eq!(eval("=COUNT(J10:K11)").unwrap(), 4.0);
        assert_eq!(eval("=COUNT(Z50:Z60)").unwrap(), 11.0);
        assert_eq!(eval("=AVERAGE(A1:B4)").unwrap(), 14.0 / 8.0);
        assert_eq!(eval("=MIN(A1:B1,Z1:Z2)").unwrap(), 0.0);
        assert_eq!(eval("=MAX(A1:XFD1048576)").unwrap(), 5.0);

        let huge = eval("=COUNT(A1:ZZZZZZ4000000000)").unwrap();
        assert_eq!(huge, 321_272_406.0 * 4_000_000_000.0);
    }

    #[test]
    fn test_evaluate_range_in_arithmetic() {
        assert_eq!(
            eval("=A1:B2+1").unwrap_err(),
            FormulaError::ListOperand('+')
        );
    }

    #[test]
    fn test_custom_registry() {
        fn fn_double(args: &ValueList) -> FormulaResult<f64> {
            Ok(args.values().first().copied().unwrap_or(0.0) * 2.0)
        }

        let mut registry = FunctionRegistry::empty();
        registry.register(FunctionDef {
            name: "DOUBLE",
            min_args: 1,
            max_args: Some(1),
            implementation: fn_double,
        });

        let grid = sample_grid();
        let engine = FormulaEngine::with_functions(&grid, &registry);
        assert_eq!(engine.parse("=DOUBLE(A1)+1").unwrap(), 11.0);
        assert!(matches!(
            engine.parse("=DOUBLE(1,2)"),
            Err(FormulaError::ArgumentCount { actual: 2, .. })
        ));
        assert!(matches!(
            engine.parse("=DOUBLE()"),
            Err(FormulaError::ArgumentCount { actual: 0, .. })
        ));
        assert_eq!(
            engine.parse("=SUM(1)").unwrap_err(),
            FormulaError::UnknownFunction("SUM".into())
        );
    }
}
