
//! Expression trees for real-valued formulas of a single variable.

pub mod calculus;
pub mod eval;
pub mod parser;
pub mod tokenizer;

use std::fmt::{self, Display, Formatter};

/// A parsed expression. The tree is immutable once built:
/// differentiation and evaluation walk it, they never modify it.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
  Constant(f64),
  /// The single free variable `x`.
  Variable,
  Binary(BinaryOp, Box<Expr>, Box<Expr>),
  Unary(UnaryOp, Box<Expr>),
  Call(Function, Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
  Add,
  Sub,
  Mul,
  Div,
  Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
  Neg,
}

/// The closed set of unary functions the grammar recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
  Sin,
  Cos,
  Tan,
  Exp,
  Ln,
  Sqrt,
}

impl Expr {

  pub fn constant(value: f64) -> Expr {
    Expr::Constant(value)
  }

  pub fn zero() -> Expr {
    Expr::Constant(0.0)
  }

  pub fn one() -> Expr {
    Expr::Constant(1.0)
  }

  pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary(op, Box::new(left), Box::new(right))
  }

  pub fn call(function: Function, operand: Expr) -> Expr {
    Expr::Call(function, Box::new(operand))
  }

  pub fn neg(operand: Expr) -> Expr {
    Expr::Unary(UnaryOp::Neg, Box::new(operand))
  }

  pub fn add(left: Expr, right: Expr) -> Expr {
    Expr::binary(BinaryOp::Add, left, right)
  }

  pub fn sub(left: Expr, right: Expr) -> Expr {
    Expr::binary(BinaryOp::Sub, left, right)
  }

  pub fn mul(left: Expr, right: Expr) -> Expr {
    Expr::binary(BinaryOp::Mul, left, right)
  }

  pub fn div(left: Expr, right: Expr) -> Expr {
    Expr::binary(BinaryOp::Div, left, right)
  }

  pub fn pow(base: Expr, exponent: Expr) -> Expr {
    Expr::binary(BinaryOp::Pow, base, exponent)
  }

  /// True if the free variable occurs anywhere in this tree.
  pub fn contains_variable(&self) -> bool {
    match self {
      Expr::Constant(_) => false,
      Expr::Variable => true,
      Expr::Binary(_, left, right) => left.contains_variable() || right.contains_variable(),
      Expr::Unary(_, operand) => operand.contains_variable(),
      Expr::Call(_, operand) => operand.contains_variable(),
    }
  }
}

impl Function {
  pub fn name(self) -> &'static str {
    match self {
      Function::Sin => "sin",
      Function::Cos => "cos",
      Function::Tan => "tan",
      Function::Exp => "exp",
      Function::Ln => "ln",
      Function::Sqrt => "sqrt",
    }
  }
}

impl Display for BinaryOp {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    let symbol = match self {
      BinaryOp::Add => '+',
      BinaryOp::Sub => '-',
      BinaryOp::Mul => '*',
      BinaryOp::Div => '/',
      BinaryOp::Pow => '^',
    };
    write!(f, "{symbol}")
  }
}

impl Display for Function {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name())
  }
}

/// Fully parenthesized rendering. Meant for error messages and tests,
/// not for pretty-printing back to the user.
impl Display for Expr {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      Expr::Constant(c) => write!(f, "{c}"),
      Expr::Variable => write!(f, "x"),
      Expr::Binary(op, left, right) => write!(f, "({left} {op} {right})"),
      Expr::Unary(UnaryOp::Neg, operand) => write!(f, "(-{operand})"),
      Expr::Call(function, operand) => write!(f, "{function}({operand})"),
    }
  }
}
