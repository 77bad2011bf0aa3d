//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula parsing or evaluation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// Formula text does not start with '='
    #[error("Formula must start with '=': {0:?}")]
    Format(String),

    /// Malformed cell reference or unrecognized name
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Character that starts no token
    #[error("Unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },

    /// Unbalanced parentheses
    #[error("Mismatched parenthesis: {0}")]
    MismatchedParenthesis(String),

    /// Structural error such as an empty argument
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// Unknown function
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },

    /// Aggregate that has no result for zero values
    #[error("{0} requires at least one value")]
    EmptyArguments(String),

    /// A range was used where a single number is required
    #[error("Operator '{0}' cannot be applied to a range")]
    ListOperand(char),

    /// An operator or function found fewer operands than it needs
    #[error("Missing operand for {0}")]
    StackUnderflow(String),

    /// Formula evaluation error
    #[error("Evaluation error: {0}")]
    Evaluation(String),
}

impl From<tablecalc_core::Error> for FormulaError {
    fn from(err: tablecalc_core::Error) -> Self {
        FormulaError::InvalidReference(err.to_string())
    }
}
