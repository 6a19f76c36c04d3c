
//! Parser for the formula grammar.
//!
//! Parsing happens in three steps: the tokenizer lexes the input,
//! implicit multiplications are spliced into the token stream, and a
//! precedence-climbing pass folds the stream into an [`Expr`].

use super::{Expr, UnaryOp};
use super::tokenizer::{ExprTokenizer, Token, TokenData, TokenizerError};
use crate::parsing::operator::{self, InfixOperator, Precedence};
use crate::parsing::source::{SourceOffset, Span};
use crate::parsing::tokenizer::TokenizerState;

use thiserror::Error;

#[derive(Clone, Debug, Default)]
#[non_exhaustive]
pub struct ExprParser {
  tokenizer: ExprTokenizer,
}

#[derive(Debug, Clone, Error, PartialEq)]
#[non_exhaustive]
pub enum ParseError {
  #[error("{0}")]
  TokenizerError(#[from] TokenizerError),
  #[error("Unexpected token '{token}' at {span}")]
  UnexpectedToken { token: String, span: Span },
  #[error("Expected ')' at {0}")]
  ExpectedRightParen(SourceOffset),
  #[error("Unexpected end of input at {0}")]
  UnexpectedEof(SourceOffset),
}

/// Read cursor over the token stream produced by the tokenizer.
#[derive(Debug)]
struct TokenCursor<'a> {
  tokens: &'a [Token],
  index: usize,
  /// One-past-the-end offset of the input, for EOF errors.
  end: SourceOffset,
}

impl ExprParser {
  pub fn new() -> Self {
    Self::default()
  }

  /// Parses a complete formula. The whole input must be consumed;
  /// trailing tokens are an error.
  pub fn parse(&self, text: &str) -> Result<Expr, ParseError> {
    let mut state = TokenizerState::new(text);
    let tokens = self.tokenizer.read_tokens(&mut state)?;
    let tokens = insert_implicit_mul(tokens);
    let mut cursor = TokenCursor::new(&tokens, SourceOffset(text.len()));
    let expr = parse_expr(&mut cursor, Precedence::MIN)?;
    match cursor.peek() {
      None => Ok(expr),
      Some(token) => Err(ParseError::unexpected_token(token)),
    }
  }
}

impl ParseError {
  fn unexpected_token(token: &Token) -> Self {
    ParseError::UnexpectedToken {
      token: token.data.to_string(),
      span: token.span,
    }
  }

  /// The input position the error refers to.
  pub fn position(&self) -> SourceOffset {
    match self {
      ParseError::TokenizerError(TokenizerError::UnexpectedChar(_, pos)) => *pos,
      ParseError::TokenizerError(TokenizerError::UnknownIdentifier(_, pos)) => *pos,
      ParseError::TokenizerError(TokenizerError::MalformedNumber(_, pos)) => *pos,
      ParseError::UnexpectedToken { span, .. } => span.start,
      ParseError::ExpectedRightParen(pos) => *pos,
      ParseError::UnexpectedEof(pos) => *pos,
    }
  }
}

/// Splices a `*` between any token that ends a value and any token
/// that begins one, so `2x`, `3(x+1)` and `2sin(x)` parse as
/// products. A function name never ends a value, so `sin(x)` stays a
/// function application.
fn insert_implicit_mul(tokens: Vec<Token>) -> Vec<Token> {
  let mut output: Vec<Token> = Vec::with_capacity(tokens.len());
  for token in tokens {
    if let Some(previous) = output.last() {
      if ends_value(&previous.data) && begins_value(&token.data) {
        let boundary = Span::at(previous.span.end);
        output.push(Token::new(TokenData::Operator(super::BinaryOp::Mul), boundary));
      }
    }
    output.push(token);
  }
  output
}

fn ends_value(data: &TokenData) -> bool {
  matches!(
    data,
    TokenData::Number(_) | TokenData::Variable | TokenData::Constant(_) | TokenData::RightParen,
  )
}

fn begins_value(data: &TokenData) -> bool {
  matches!(
    data,
    TokenData::Number(_)
      | TokenData::Variable
      | TokenData::Constant(_)
      | TokenData::Function(_)
      | TokenData::LeftParen,
  )
}

/// Precedence climbing over the infix operator table. The table's
/// left/right precedence encoding gives `^` its right associativity
/// and the arithmetic operators their left associativity.
fn parse_expr(cursor: &mut TokenCursor<'_>, min_prec: Precedence) -> Result<Expr, ParseError> {
  let mut lhs = parse_unary(cursor)?;
  while let Some(op) = cursor.peek_infix() {
    if op.precedence() < min_prec {
      break;
    }
    cursor.advance();
    let rhs = parse_expr(cursor, op.right_precedence())?;
    lhs = Expr::binary(op.binary_op(), lhs, rhs);
  }
  Ok(lhs)
}

/// Prefix operators: `-` and function application (including the `√`
/// glyph, which lexes as a `sqrt` token). Both bind tighter than `^`,
/// so `-x^2` is `(-x)^2` and `√x^2` is `(√x)^2`.
fn parse_unary(cursor: &mut TokenCursor<'_>) -> Result<Expr, ParseError> {
  match cursor.peek().map(|t| &t.data) {
    Some(TokenData::Operator(super::BinaryOp::Sub)) => {
      cursor.advance();
      let operand = parse_unary(cursor)?;
      Ok(Expr::Unary(UnaryOp::Neg, Box::new(operand)))
    }
    Some(&TokenData::Function(function)) => {
      cursor.advance();
      let operand = parse_function_operand(cursor)?;
      Ok(Expr::call(function, operand))
    }
    _ => parse_primary(cursor),
  }
}

/// A function operand is either a parenthesized group (`sin(x)`,
/// `√(x+1)`) or, for the compact form `√x`, another unary expression.
fn parse_function_operand(cursor: &mut TokenCursor<'_>) -> Result<Expr, ParseError> {
  if matches!(cursor.peek().map(|t| &t.data), Some(TokenData::LeftParen)) {
    cursor.advance();
    let operand = parse_expr(cursor, Precedence::MIN)?;
    cursor.expect_right_paren()?;
    Ok(operand)
  } else {
    parse_unary(cursor)
  }
}

fn parse_primary(cursor: &mut TokenCursor<'_>) -> Result<Expr, ParseError> {
  let Some(token) = cursor.peek() else {
    return Err(ParseError::UnexpectedEof(cursor.end));
  };
  match token.data {
    TokenData::Number(value) | TokenData::Constant(value) => {
      cursor.advance();
      Ok(Expr::Constant(value))
    }
    TokenData::Variable => {
      cursor.advance();
      Ok(Expr::Variable)
    }
    TokenData::LeftParen => {
      cursor.advance();
      let expr = parse_expr(cursor, Precedence::MIN)?;
      cursor.expect_right_paren()?;
      Ok(expr)
    }
    _ => Err(ParseError::unexpected_token(token)),
  }
}

impl<'a> TokenCursor<'a> {
  fn new(tokens: &'a [Token], end: SourceOffset) -> Self {
    Self { tokens, index: 0, end }
  }

  fn peek(&self) -> Option<&'a Token> {
    self.tokens.get(self.index)
  }

  fn advance(&mut self) {
    self.index += 1;
  }

  /// The operator table entry for the next token, if it is an infix
  /// operator.
  fn peek_infix(&self) -> Option<&'static InfixOperator> {
    match self.peek()?.data {
      TokenData::Operator(op) => Some(operator::properties(op)),
      _ => None,
    }
  }

  fn expect_right_paren(&mut self) -> Result<(), ParseError> {
    match self.peek() {
      Some(token) if token.data == TokenData::RightParen => {
        self.advance();
        Ok(())
      }
      Some(token) => Err(ParseError::ExpectedRightParen(token.span.start)),
      None => Err(ParseError::ExpectedRightParen(self.end)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::expr::Function;

  fn parse(text: &str) -> Result<Expr, ParseError> {
    ExprParser::new().parse(text)
  }

  fn var() -> Expr {
    Expr::Variable
  }

  fn num(value: f64) -> Expr {
    Expr::Constant(value)
  }

  #[test]
  fn test_parse_simple_polynomial() {
    let expr = parse("x^2-2").unwrap();
    assert_eq!(expr, Expr::sub(Expr::pow(var(), num(2.0)), num(2.0)));
  }

  #[test]
  fn test_parse_function_call() {
    let expr = parse("2*sin(x)+1").unwrap();
    assert_eq!(
      expr,
      Expr::add(Expr::mul(num(2.0), Expr::call(Function::Sin, var())), num(1.0)),
    );
  }

  #[test]
  fn test_parse_sqrt_glyph_forms() {
    let with_parens = parse("√(x)+e").unwrap();
    assert_eq!(
      with_parens,
      Expr::add(Expr::call(Function::Sqrt, var()), num(std::f64::consts::E)),
    );

    let compact = parse("√x").unwrap();
    assert_eq!(compact, Expr::call(Function::Sqrt, var()));
  }

  #[test]
  fn test_implicit_multiplication() {
    assert_eq!(parse("2x").unwrap(), Expr::mul(num(2.0), var()));
    assert_eq!(
      parse("2x+3").unwrap(),
      Expr::add(Expr::mul(num(2.0), var()), num(3.0)),
    );
    assert_eq!(
      parse("3(x+1)").unwrap(),
      Expr::mul(num(3.0), Expr::add(var(), num(1.0))),
    );
    assert_eq!(
      parse("2sin(x)").unwrap(),
      Expr::mul(num(2.0), Expr::call(Function::Sin, var())),
    );
    assert_eq!(
      parse("(x+1)(x-2)").unwrap(),
      Expr::mul(
        Expr::add(var(), num(1.0)),
        Expr::sub(var(), num(2.0)),
      ),
    );
  }

  #[test]
  fn test_left_associativity() {
    assert_eq!(
      parse("1-2-3").unwrap(),
      Expr::sub(Expr::sub(num(1.0), num(2.0)), num(3.0)),
    );
    assert_eq!(
      parse("8/4/2").unwrap(),
      Expr::div(Expr::div(num(8.0), num(4.0)), num(2.0)),
    );
    assert_eq!(
      parse("8/4*2").unwrap(),
      Expr::mul(Expr::div(num(8.0), num(4.0)), num(2.0)),
    );
  }

  #[test]
  fn test_pow_right_associativity() {
    assert_eq!(
      parse("2^3^2").unwrap(),
      Expr::pow(num(2.0), Expr::pow(num(3.0), num(2.0))),
    );
  }

  #[test]
  fn test_precedence() {
    assert_eq!(
      parse("1+2*3").unwrap(),
      Expr::add(num(1.0), Expr::mul(num(2.0), num(3.0))),
    );
    assert_eq!(
      parse("2*x^3").unwrap(),
      Expr::mul(num(2.0), Expr::pow(var(), num(3.0))),
    );
    assert_eq!(
      parse("(1+2)*3").unwrap(),
      Expr::mul(Expr::add(num(1.0), num(2.0)), num(3.0)),
    );
  }

  #[test]
  fn test_unary_minus_binds_tighter_than_pow() {
    assert_eq!(
      parse("-x^2").unwrap(),
      Expr::pow(Expr::neg(var()), num(2.0)),
    );
    assert_eq!(
      parse("2^-x").unwrap(),
      Expr::pow(num(2.0), Expr::neg(var())),
    );
  }

  #[test]
  fn test_sqrt_binds_tighter_than_pow() {
    assert_eq!(
      parse("√x^2").unwrap(),
      Expr::pow(Expr::call(Function::Sqrt, var()), num(2.0)),
    );
  }

  #[test]
  fn test_nested_unary() {
    assert_eq!(parse("--x").unwrap(), Expr::neg(Expr::neg(var())));
    assert_eq!(
      parse("-sin(x)").unwrap(),
      Expr::neg(Expr::call(Function::Sin, var())),
    );
  }

  #[test]
  fn test_empty_input() {
    let err = parse("").unwrap_err();
    assert_eq!(err, ParseError::UnexpectedEof(SourceOffset(0)));
  }

  #[test]
  fn test_dangling_operator() {
    let err = parse("x+").unwrap_err();
    assert_eq!(err, ParseError::UnexpectedEof(SourceOffset(2)));
    assert_eq!(err.position(), SourceOffset(2));
  }

  #[test]
  fn test_unexpected_token() {
    let err = parse("2+*3").unwrap_err();
    assert_eq!(
      err,
      ParseError::UnexpectedToken {
        token: "*".to_owned(),
        span: Span::new(SourceOffset(2), SourceOffset(3)),
      },
    );
    assert_eq!(err.position(), SourceOffset(2));
  }

  #[test]
  fn test_missing_right_paren() {
    let err = parse("(x+1").unwrap_err();
    assert_eq!(err, ParseError::ExpectedRightParen(SourceOffset(4)));
  }

  #[test]
  fn test_trailing_tokens() {
    let err = parse("x+1)").unwrap_err();
    assert_eq!(
      err,
      ParseError::UnexpectedToken {
        token: ")".to_owned(),
        span: Span::new(SourceOffset(3), SourceOffset(4)),
      },
    );
  }

  #[test]
  fn test_unknown_identifier_propagates() {
    let err = parse("2+foo(x)").unwrap_err();
    assert_eq!(
      err,
      ParseError::TokenizerError(TokenizerError::UnknownIdentifier("foo".to_owned(), SourceOffset(2))),
    );
    assert_eq!(err.position(), SourceOffset(2));
  }
}
