//! Formula token types

use std::fmt;
use tablecalc_core::{CellAddress, CellRange};

/// A lexical unit of a formula body
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Operands ===
    /// Numeric literal
    Number(f64),
    /// Single cell reference (A1)
    CellRef(CellAddress),
    /// Contiguous range (A1:B2)
    CellRange(CellRange),

    // === Operators ===
    /// Binary operator
    Operator(Operator),
    /// Function call. `args` is filled in by the compiler; the tokenizer leaves it at 0.
    Function { name: String, args: usize },

    // === Delimiters ===
    LeftParen,
    RightParen,
    Comma,
}

impl Token {
    /// Function token with no argument count yet
    pub fn function<S: Into<String>>(name: S) -> Self {
        Token::Function {
            name: name.into(),
            args: 0,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::CellRef(addr) => write!(f, "{}", addr),
            Token::CellRange(range) => {
                write!(f, "{}:{}", range.start, range.end)
            }
            Token::Operator(op) => write!(f, "{}", op.symbol()),
            Token::Function { name, args } => write!(f, "{}/{}", name, args),
            Token::LeftParen => f.write_str("("),
            Token::RightParen => f.write_str(")"),
            Token::Comma => f.write_str(","),
        }
    }
}

/// Binary operators, all left-associative
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    /// Explicit `:` between two separately written references
    Range,
}

impl Operator {
    /// Map an operator character to its operator
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            '*' => Some(Operator::Multiply),
            '/' => Some(Operator::Divide),
            ':' => Some(Operator::Range),
            _ => None,
        }
    }

    /// Binding strength; higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Subtract => 1,
            Operator::Multiply | Operator::Divide => 2,
            Operator::Range => 3,
        }
    }

    /// Source character
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
            Operator::Range => ':',
        }
    }

    /// Apply an arithmetic operator with IEEE semantics (x/0 is infinite or NaN).
    ///
    /// Returns `None` for [`Operator::Range`], which combines references rather than numbers.
    pub fn apply(self, left: f64, right: f64) -> Option<f64> {
        match self {
            Operator::Add => Some(left + right),
            Operator::Subtract => Some(left - right),
            Operator::Multiply => Some(left * right),
            Operator::Divide => Some(left / right),
            Operator::Range => None,
        }
    }
}

/// Tokens in evaluation (reverse Polish) order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Postfix(Vec<Token>);

impl Postfix {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self(tokens)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.0.iter()
    }
}

impl fmt::Display for Postfix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Postfix {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
