
use super::{BinaryOp, Function};
use crate::parsing::operator;
use crate::parsing::source::{SourceOffset, Span};
use crate::parsing::tokenizer::TokenizerState;

use regex::Regex;
use once_cell::sync::Lazy;
use phf::phf_map;
use thiserror::Error;

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Tokenizer for the formula grammar. Stateless; all cursor state
/// lives in the [`TokenizerState`].
#[derive(Clone, Debug, Default)]
#[non_exhaustive]
pub struct ExprTokenizer {}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
  pub data: TokenData,
  pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenData {
  /// A decimal literal.
  Number(f64),
  /// The free variable `x`.
  Variable,
  /// A named constant (`e` or `E`), already resolved to its value.
  Constant(f64),
  /// A function name, or the `√` glyph (which lexes as `sqrt`).
  Function(Function),
  Operator(BinaryOp),
  LeftParen,
  RightParen,
}

#[derive(Debug, Clone, Error, PartialEq)]
#[non_exhaustive]
pub enum TokenizerError {
  #[error("Unexpected character '{0}' at {1}")]
  UnexpectedChar(char, SourceOffset),
  #[error("Unknown identifier '{0}' at {1}")]
  UnknownIdentifier(String, SourceOffset),
  #[error("Malformed number '{0}' at {1}")]
  MalformedNumber(String, SourceOffset),
}

/// The recognized function names. `ln` is the natural logarithm,
/// distinct from `exp`.
static FUNCTIONS: phf::Map<&'static str, Function> = phf_map! {
  "sin" => Function::Sin,
  "cos" => Function::Cos,
  "tan" => Function::Tan,
  "exp" => Function::Exp,
  "ln" => Function::Ln,
  "sqrt" => Function::Sqrt,
};

/// Named constants. These resolve only as standalone identifier
/// tokens, never by substring replacement, so `exp` is in no danger
/// of being misread as containing Euler's number.
static CONSTANTS: phf::Map<&'static str, f64> = phf_map! {
  "e" => std::f64::consts::E,
  "E" => std::f64::consts::E,
};

impl ExprTokenizer {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reads tokens until end of input. On error, the state is left at
  /// the offending position, which the error also reports.
  pub fn read_tokens(&self, state: &mut TokenizerState<'_>) -> Result<Vec<Token>, TokenizerError> {
    let mut tokens = Vec::new();
    loop {
      state.consume_spaces();
      if state.is_eof() {
        return Ok(tokens);
      }
      tokens.push(self.read_one_token(state)?);
    }
  }

  pub fn read_one_token(&self, state: &mut TokenizerState<'_>) -> Result<Token, TokenizerError> {
    if let Some(tok) = self.read_char_token(state) {
      Ok(tok)
    } else if let Some(res) = self.read_number_literal(state) {
      res
    } else if let Some(res) = self.read_identifier(state) {
      res
    } else if let Some(tok) = self.read_operator(state) {
      Ok(tok)
    } else {
      // consume_spaces ran before this, so there is a character here.
      let ch = state.peek().expect("read_one_token called at EOF");
      Err(TokenizerError::UnexpectedChar(ch, state.current_pos()))
    }
  }

  fn read_char_token(&self, state: &mut TokenizerState<'_>) -> Option<Token> {
    #[allow(clippy::manual_map)] // Cleaner in an if-else chain
    if let Some(m) = state.read_literal("(") {
      Some(Token::new(TokenData::LeftParen, m.span()))
    } else if let Some(m) = state.read_literal(")") {
      Some(Token::new(TokenData::RightParen, m.span()))
    } else if let Some(m) = state.read_literal("√") {
      Some(Token::new(TokenData::Function(Function::Sqrt), m.span()))
    } else {
      None
    }
  }

  /// Unsigned decimal literals. There is deliberately no
  /// scientific-notation arm: `e` is Euler's constant in this
  /// grammar, so `2e` must lex as two tokens.
  fn read_number_literal(&self, state: &mut TokenizerState<'_>) -> Option<Result<Token, TokenizerError>> {
    static RE: Lazy<Regex> = Lazy::new(|| {
      Regex::new(r"^(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)").unwrap()
    });
    let m = state.read_regex(&RE)?;
    match f64::from_str(m.as_str()) {
      Ok(value) => Some(Ok(Token::new(TokenData::Number(value), m.span()))),
      Err(_) => Some(Err(TokenizerError::MalformedNumber(m.as_str().to_owned(), m.start()))),
    }
  }

  fn read_identifier(&self, state: &mut TokenizerState<'_>) -> Option<Result<Token, TokenizerError>> {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]+").unwrap());
    let m = state.read_regex(&RE)?;
    let name = m.as_str();
    let data = if name == "x" {
      TokenData::Variable
    } else if let Some(value) = CONSTANTS.get(name) {
      TokenData::Constant(*value)
    } else if let Some(function) = FUNCTIONS.get(name) {
      TokenData::Function(*function)
    } else {
      return Some(Err(TokenizerError::UnknownIdentifier(name.to_owned(), m.start())));
    };
    Some(Ok(Token::new(data, m.span())))
  }

  fn read_operator(&self, state: &mut TokenizerState<'_>) -> Option<Token> {
    let op = state.peek().and_then(operator::from_symbol)?;
    // All operator spellings are one byte.
    let m = state.advance(1);
    Some(Token::new(TokenData::Operator(op.binary_op()), m.span()))
  }
}

impl Token {
  pub fn new(data: TokenData, span: Span) -> Self {
    Self { data, span }
  }
}

impl Display for TokenData {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      TokenData::Number(n) => write!(f, "{n}"),
      TokenData::Variable => write!(f, "x"),
      TokenData::Constant(_) => write!(f, "e"),
      TokenData::Function(function) => write!(f, "{function}"),
      TokenData::Operator(op) => write!(f, "{op}"),
      TokenData::LeftParen => write!(f, "("),
      TokenData::RightParen => write!(f, ")"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn tokenize(input: &str) -> Result<Vec<Token>, TokenizerError> {
    let mut state = TokenizerState::new(input);
    ExprTokenizer::new().read_tokens(&mut state)
  }

  fn span(start: usize, end: usize) -> Span {
    Span::new(SourceOffset(start), SourceOffset(end))
  }

  #[test]
  fn test_read_number_literals() {
    let tokens = tokenize("2 3.5 .25 40.").unwrap();
    assert_eq!(
      tokens,
      vec![
        Token::new(TokenData::Number(2.0), span(0, 1)),
        Token::new(TokenData::Number(3.5), span(2, 5)),
        Token::new(TokenData::Number(0.25), span(6, 9)),
        Token::new(TokenData::Number(40.0), span(10, 13)),
      ],
    );
  }

  #[test]
  fn test_read_identifiers() {
    let tokens = tokenize("x sin sqrt").unwrap();
    assert_eq!(
      tokens,
      vec![
        Token::new(TokenData::Variable, span(0, 1)),
        Token::new(TokenData::Function(Function::Sin), span(2, 5)),
        Token::new(TokenData::Function(Function::Sqrt), span(6, 10)),
      ],
    );
  }

  #[test]
  fn test_eulers_constant() {
    let tokens = tokenize("e").unwrap();
    assert_eq!(tokens, vec![Token::new(TokenData::Constant(std::f64::consts::E), span(0, 1))]);

    let tokens = tokenize("E").unwrap();
    assert_eq!(tokens, vec![Token::new(TokenData::Constant(std::f64::consts::E), span(0, 1))]);
  }

  #[test]
  fn test_exp_is_not_eulers_constant() {
    // `e` resolves as a standalone token only; `exp` stays a function.
    let tokens = tokenize("exp").unwrap();
    assert_eq!(tokens, vec![Token::new(TokenData::Function(Function::Exp), span(0, 3))]);
  }

  #[test]
  fn test_no_scientific_notation() {
    // `2e` is the literal 2 followed by Euler's constant.
    let tokens = tokenize("2e").unwrap();
    assert_eq!(
      tokens,
      vec![
        Token::new(TokenData::Number(2.0), span(0, 1)),
        Token::new(TokenData::Constant(std::f64::consts::E), span(1, 2)),
      ],
    );
  }

  #[test]
  fn test_sqrt_glyph() {
    let tokens = tokenize("√x").unwrap();
    assert_eq!(
      tokens,
      vec![
        // The glyph is three bytes long.
        Token::new(TokenData::Function(Function::Sqrt), span(0, 3)),
        Token::new(TokenData::Variable, span(3, 4)),
      ],
    );
  }

  #[test]
  fn test_operators_and_parens() {
    let tokens = tokenize("(x + 2) ^ 3").unwrap();
    assert_eq!(
      tokens,
      vec![
        Token::new(TokenData::LeftParen, span(0, 1)),
        Token::new(TokenData::Variable, span(1, 2)),
        Token::new(TokenData::Operator(BinaryOp::Add), span(3, 4)),
        Token::new(TokenData::Number(2.0), span(5, 6)),
        Token::new(TokenData::RightParen, span(6, 7)),
        Token::new(TokenData::Operator(BinaryOp::Pow), span(8, 9)),
        Token::new(TokenData::Number(3.0), span(10, 11)),
      ],
    );
  }

  #[test]
  fn test_unknown_identifier() {
    let err = tokenize("2 + foo").unwrap_err();
    assert_eq!(err, TokenizerError::UnknownIdentifier("foo".to_owned(), SourceOffset(4)));
  }

  #[test]
  fn test_unexpected_char() {
    let err = tokenize("x @ 2").unwrap_err();
    assert_eq!(err, TokenizerError::UnexpectedChar('@', SourceOffset(2)));
  }

  #[test]
  fn test_whitespace_insignificant() {
    let dense: Vec<_> = tokenize("x+1").unwrap().into_iter().map(|t| t.data).collect();
    let spaced: Vec<_> = tokenize("  x + 1  ").unwrap().into_iter().map(|t| t.data).collect();
    assert_eq!(dense, spaced);
  }
}
