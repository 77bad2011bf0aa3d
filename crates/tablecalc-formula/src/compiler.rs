//! Shunting-yard compiler
//!
//! Reorders an infix token stream into postfix order in one forward pass. Operands go
//! straight to the output; operators wait on a stack until something binding no tighter
//! arrives. A function is emitted right after its closing parenthesis, so every operator
//! and function follows its operands regardless of arity.

use crate::error::{FormulaError, FormulaResult};
use crate::token::{Operator, Postfix, Token};
use tablecalc_core::CellRange;

/// Compile infix tokens into postfix order
///
/// # Example
/// ```rust
/// use tablecalc_formula::{compile, tokenize};
///
/// let postfix = compile(tokenize("2+3*4").unwrap()).unwrap();
/// assert_eq!(postfix.to_string(), "2 3 4 * +");
/// ```
pub fn compile(tokens: Vec<Token>) -> FormulaResult<Postfix> {
    let mut compiler = Compiler::default();
    for token in tokens {
        compiler.push(token)?;
    }
    compiler.finish()
}

/// One open parenthesis
#[derive(Debug)]
struct Frame {
    /// Opened by a function call
    call: bool,
    /// Completed arguments so far
    args: usize,
    /// Something was written since the frame opened or since the last comma
    has_operand: bool,
}

#[derive(Debug, Default)]
struct Compiler {
    output: Vec<Token>,
    /// Holds operators, functions and left parentheses
    stack: Vec<Token>,
    frames: Vec<Frame>,
    /// The previous token was a function name
    call_pending: bool,
    /// The previous token completed an operand: a value, a reference or ')'
    after_operand: bool,
}

impl Compiler {
    fn push(&mut self, token: Token) -> FormulaResult<()> {
        let call = std::mem::take(&mut self.call_pending);

        match token {
            Token::Number(_) | Token::CellRef(_) | Token::CellRange(_) => {
                self.expect_operand(&token)?;
                self.mark_operand();
                self.output.push(token);
                self.after_operand = true;
            }

            Token::Operator(op) => {
                if !self.after_operand {
                    return Err(FormulaError::Syntax(format!(
                        "missing operand before '{}'",
                        op.symbol()
                    )));
                }
                self.after_operand = false;
                self.mark_operand();
                while let Some(Token::Operator(top)) = self.stack.last() {
                    if top.precedence() < op.precedence() {
                        break;
                    }
                    let top = *top;
                    self.stack.pop();
                    self.emit_operator(top)?;
                }
                self.stack.push(token);
            }

            Token::Function { .. } => {
                self.expect_operand(&token)?;
                self.mark_operand();
                self.call_pending = true;
                self.stack.push(token);
            }

            Token::LeftParen => {
                self.expect_operand(&token)?;
                self.mark_operand();
                self.frames.push(Frame {
                    call,
                    args: 0,
                    has_operand: false,
                });
                self.stack.push(token);
            }

            Token::Comma => {
                let frame = match self.frames.last_mut() {
                    Some(frame) if frame.call => frame,
                    _ => return Err(FormulaError::Syntax("',' outside a function call".into())),
                };
                if !frame.has_operand {
                    return Err(FormulaError::Syntax("empty function argument".into()));
                }
                if !self.after_operand {
                    return Err(FormulaError::Syntax("missing operand before ','".into()));
                }
                self.after_operand = false;
                frame.args += 1;
                frame.has_operand = false;
                self.pop_until_left_paren()?;
            }

            Token::RightParen => {
                let mut frame = self
                    .frames
                    .pop()
                    .ok_or_else(|| FormulaError::MismatchedParenthesis("unmatched ')'".into()))?;
                if frame.has_operand && !self.after_operand {
                    return Err(FormulaError::Syntax("missing operand before ')'".into()));
                }
                self.pop_until_left_paren()?;
                // Discard the '('
                self.stack.pop();

                if frame.has_operand {
                    frame.args += 1;
                } else if frame.call && frame.args > 0 {
                    return Err(FormulaError::Syntax("empty function argument".into()));
                } else if !frame.call {
                    return Err(FormulaError::Syntax("empty parentheses".into()));
                }

                if frame.call {
                    match self.stack.pop() {
                        Some(Token::Function { name, .. }) => self.output.push(Token::Function {
                            name,
                            args: frame.args,
                        }),
                        other => {
                            return Err(FormulaError::Syntax(format!(
                                "expected function before '(', found {:?}",
                                other
                            )))
                        }
                    }
                }
                self.after_operand = true;
            }
        }

        Ok(())
    }

    fn finish(mut self) -> FormulaResult<Postfix> {
        if self.call_pending {
            return Err(FormulaError::Syntax("function name without '('".into()));
        }
        if let Some(Token::Operator(op)) = self.stack.last() {
            if !self.after_operand {
                return Err(FormulaError::Syntax(format!(
                    "missing operand after '{}'",
                    op.symbol()
                )));
            }
        }

        while let Some(token) = self.stack.pop() {
            match token {
                Token::Operator(op) => self.emit_operator(op)?,
                _ => return Err(FormulaError::MismatchedParenthesis("unclosed '('".into())),
            }
        }

        let postfix = Postfix::new(self.output);
        tracing::trace!(%postfix, "compiled");
        Ok(postfix)
    }

    /// Two operands in a row have no operator between them
    fn expect_operand(&self, token: &Token) -> FormulaResult<()> {
        if self.after_operand {
            return Err(FormulaError::Syntax(format!(
                "missing operator before '{}'",
                token
            )));
        }
        Ok(())
    }

    fn mark_operand(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.has_operand = true;
        }
    }

    /// Move operators to the output until the innermost '(' is on top
    fn pop_until_left_paren(&mut self) -> FormulaResult<()> {
        loop {
            match self.stack.last() {
                Some(Token::LeftParen) => return Ok(()),
                Some(Token::Operator(op)) => {
                    let op = *op;
                    self.stack.pop();
                    self.emit_operator(op)?;
                }
                _ => return Err(FormulaError::MismatchedParenthesis("missing '('".into())),
            }
        }
    }

    /// Write an operator to the output.
    ///
    /// An explicit range operator is folded into its two reference operands, leaving a
    /// single range token in their place.
    fn emit_operator(&mut self, op: Operator) -> FormulaResult<()> {
        if op != Operator::Range {
            self.output.push(Token::Operator(op));
            return Ok(());
        }

        let n = self.output.len();
        match self.output.get(n.saturating_sub(2)..) {
            Some([Token::CellRef(start), Token::CellRef(end)]) => {
                let range = CellRange::new(*start, *end);
                self.output.truncate(n - 2);
                self.output.push(Token::CellRange(range));
                Ok(())
            }
            _ => Err(FormulaError::InvalidReference(
                "':' must join two cell references".into(),
            )),
        }
    }
}
