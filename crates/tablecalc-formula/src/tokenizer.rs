//! Formula tokenizer
//!
//! Turns a normalized formula body (uppercase, no leading `=`, no whitespace) into a flat
//! token stream. At each position the longest of these wins, in priority order:
//!
//! 1. contiguous range (`A1:B2`)
//! 2. single reference (`A1`)
//! 3. number (`42`, `3.5`, `.5`)
//! 4. operator (`+ - * /`, and a lone `:`)
//! 5. parenthesis
//! 6. comma
//! 7. function name, i.e. an identifier directly followed by `(`
//!
//! Anything else is rejected rather than skipped.

use crate::error::{FormulaError, FormulaResult};
use crate::token::{Operator, Token};
use tablecalc_core::{CellAddress, CellRange};

/// Tokenize a normalized formula body
///
/// # Example
/// ```rust
/// use tablecalc_formula::{tokenize, Token};
///
/// let tokens = tokenize("SUM(A1:A3)*2").unwrap();
/// assert_eq!(tokens.len(), 6);
/// assert_eq!(tokens[0], Token::function("SUM"));
/// ```
pub fn tokenize(body: &str) -> FormulaResult<Vec<Token>> {
    let mut tokenizer = Tokenizer::new(body);
    let mut tokens = Vec::new();

    while let Some(token) = tokenizer.next_token()? {
        tracing::trace!(%token, "token");
        tokens.push(token);
    }

    Ok(tokens)
}

struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn next_token(&mut self) -> FormulaResult<Option<Token>> {
        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(None),
        };

        if c.is_ascii_uppercase() {
            return self.scan_reference_or_function().map(Some);
        }

        if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()))
        {
            return self.scan_number().map(Some);
        }

        let token = match c {
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            ',' => Token::Comma,
            _ => match Operator::from_char(c) {
                Some(op) => Token::Operator(op),
                None => {
                    return Err(FormulaError::UnexpectedCharacter {
                        ch: c,
                        position: self.pos,
                    })
                }
            },
        };
        self.advance();
        Ok(Some(token))
    }

    fn scan_number(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        // Integer part
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        // Decimal part, only when digits follow the point
        if self.peek_char() == Some('.')
            && self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit())
        {
            self.advance();
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text = &self.input[start..self.pos];
        text.parse()
            .map(Token::Number)
            .map_err(|_| FormulaError::Syntax(format!("invalid number '{}'", text)))
    }

    fn scan_reference_or_function(&mut self) -> FormulaResult<Token> {
        let start = self.pos;
        let end = self.identifier_end(start);
        let text = &self.input[start..end];
        self.pos = end;

        if self.peek_char() == Some('(') {
            return Ok(Token::function(text));
        }

        if !is_cell_reference(text) {
            return Err(FormulaError::InvalidReference(text.to_string()));
        }
        let start_addr = CellAddress::parse(text)?;

        // A range needs a second plain reference right after the colon
        if self.peek_char() == Some(':') {
            let second_start = self.pos + 1;
            let second_end = self.identifier_end(second_start);
            let second = &self.input[second_start..second_end];
            let followed_by_call = self.input[second_end..].starts_with('(');

            if is_cell_reference(second) && !followed_by_call {
                let end_addr = CellAddress::parse(second)?;
                self.pos = second_end;
                return Ok(Token::CellRange(CellRange::new(start_addr, end_addr)));
            }
        }

        Ok(Token::CellRef(start_addr))
    }

    /// End of an identifier starting at `start`: `[A-Z][A-Z0-9_.]*`
    fn identifier_end(&self, start: usize) -> usize {
        let rest = &self.input[start..];
        if !rest.starts_with(|c: char| c.is_ascii_uppercase()) {
            return start;
        }
        let len = rest
            .find(|c: char| {
                !(c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_' || c == '.')
            })
            .unwrap_or(rest.len());
        start + len
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }
}

/// `[A-Z]+[0-9]+` with nothing else
fn is_cell_reference(text: &str) -> bool {
    let letters = text.bytes().take_while(u8::is_ascii_uppercase).count();
    let digits = &text[letters..];
    letters > 0 && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn addr(s: &str) -> CellAddress {
        CellAddress::parse(s).unwrap()
    }

    #[test]
    fn test_tokenize_arithmetic() {
        assert_eq!(
            tokenize("1+2.5*.5").unwrap(),
            vec![
                Token::Number(1.0),
                Token::Operator(Operator::Add),
                Token::Number(2.5),
                Token::Operator(Operator::Multiply),
                Token::Number(0.5),
            ]
        );
    }

    #[test]
    fn test_tokenize_references() {
        assert_eq!(
            tokenize("A1-AB12/C3").unwrap(),
            vec![
                Token::CellRef(addr("A1")),
                Token::Operator(Operator::Subtract),
                Token::CellRef(addr("AB12")),
                Token::Operator(Operator::Divide),
                Token::CellRef(addr("C3")),
            ]
        );
    }

    #[test]
    fn test_tokenize_range_before_reference() {
        assert_eq!(
            tokenize("A1:B2").unwrap(),
            vec![Token::CellRange(CellRange::parse("A1:B2").unwrap())]
        );
    }

    #[test]
    fn test_tokenize_function_call() {
        assert_eq!(
            tokenize("SUM(A1:A3,4)").unwrap(),
            vec![
                Token::function("SUM"),
                Token::LeftParen,
                Token::CellRange(CellRange::parse("A1:A3").unwrap()),
                Token::Comma,
                Token::Number(4.0),
                Token::RightParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_reference_shaped_function_name() {
        // LOG10( is a call, not a reference to column LOG row 10
        assert_eq!(
            tokenize("LOG10(1)").unwrap()[0],
            Token::function("LOG10")
        );
    }

    #[test]
    fn test_tokenize_explicit_range_operator() {
        assert_eq!(
            tokenize("(A1):B2").unwrap(),
            vec![
                Token::LeftParen,
                Token::CellRef(addr("A1")),
                Token::RightParen,
                Token::Operator(Operator::Range),
                Token::CellRef(addr("B2")),
            ]
        );
    }

    #[test]
    fn test_tokenize_rejects_unknown_characters() {
        assert_eq!(
            tokenize("1+#"),
            Err(FormulaError::UnexpectedCharacter { ch: '#', position: 2 })
        );
        assert!(matches!(
            tokenize("1 + 2"),
            Err(FormulaError::UnexpectedCharacter { ch: ' ', .. })
        ));
        assert!(matches!(
            tokenize("a1"),
            Err(FormulaError::UnexpectedCharacter { ch: 'a', .. })
        ));
    }

    #[test]
    fn test_tokenize_rejects_bad_references() {
        assert_eq!(
            tokenize("FOO"),
            Err(FormulaError::InvalidReference("FOO".into()))
        );
        assert!(matches!(
            tokenize("A1B"),
            Err(FormulaError::InvalidReference(_))
        ));
        assert!(matches!(
            tokenize("A0"),
            Err(FormulaError::InvalidReference(_))
        ));
    }

    #[test]
    fn test_tokenize_empty() {
        assert_eq!(tokenize("").unwrap(), vec![]);
    }
}
