
//! Numeric evaluation of expression trees.

use super::{BinaryOp, Expr, Function, UnaryOp};

use thiserror::Error;

use std::fmt::{self, Display, Formatter};

/// Magnitude below which a divisor is treated as zero rather than
/// divided by.
pub const DIVISION_FLOOR: f64 = 1e-10;

/// An expression treated as a real-valued function of the free
/// variable. Owns its tree; evaluation is a pure structural walk with
/// IEEE double-precision semantics and no complex-number fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprFunction {
  expr: Expr,
}

/// An error during function evaluation, recording the input value at
/// which evaluation failed.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("{kind} at x = {x}")]
pub struct EvaluationError {
  pub kind: EvaluationErrorKind,
  pub x: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvaluationErrorKind {
  DivisionByZero,
  SqrtOfNegative,
  LogOfNonPositive,
  NonFinite,
}

impl ExprFunction {
  pub fn new(expr: Expr) -> Self {
    Self { expr }
  }

  pub fn expr(&self) -> &Expr {
    &self.expr
  }

  pub fn eval_at(&self, x: f64) -> Result<f64, EvaluationError> {
    eval(&self.expr, x)
  }
}

fn eval(expr: &Expr, x: f64) -> Result<f64, EvaluationError> {
  match expr {
    Expr::Constant(c) => Ok(*c),
    Expr::Variable => Ok(x),
    Expr::Binary(op, left, right) => {
      let l = eval(left, x)?;
      let r = eval(right, x)?;
      match op {
        BinaryOp::Add => finite(l + r, x),
        BinaryOp::Sub => finite(l - r, x),
        BinaryOp::Mul => finite(l * r, x),
        BinaryOp::Div => {
          if r.abs() < DIVISION_FLOOR {
            Err(EvaluationError { kind: EvaluationErrorKind::DivisionByZero, x })
          } else {
            finite(l / r, x)
          }
        }
        // powf of a negative base with a fractional exponent is NaN,
        // which the finite check rejects.
        BinaryOp::Pow => finite(l.powf(r), x),
      }
    }
    Expr::Unary(UnaryOp::Neg, operand) => Ok(-eval(operand, x)?),
    Expr::Call(function, operand) => {
      let u = eval(operand, x)?;
      match function {
        Function::Sin => finite(u.sin(), x),
        Function::Cos => finite(u.cos(), x),
        Function::Tan => finite(u.tan(), x),
        Function::Exp => finite(u.exp(), x),
        Function::Ln => {
          if u <= 0.0 {
            Err(EvaluationError { kind: EvaluationErrorKind::LogOfNonPositive, x })
          } else {
            finite(u.ln(), x)
          }
        }
        Function::Sqrt => {
          if u < 0.0 {
            Err(EvaluationError { kind: EvaluationErrorKind::SqrtOfNegative, x })
          } else {
            finite(u.sqrt(), x)
          }
        }
      }
    }
  }
}

/// Rejects overflow to infinity and NaN at the node that produced it.
fn finite(value: f64, x: f64) -> Result<f64, EvaluationError> {
  if value.is_finite() {
    Ok(value)
  } else {
    Err(EvaluationError { kind: EvaluationErrorKind::NonFinite, x })
  }
}

impl Display for EvaluationErrorKind {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      EvaluationErrorKind::DivisionByZero => write!(f, "Division by zero"),
      EvaluationErrorKind::SqrtOfNegative => write!(f, "Square root of a negative value"),
      EvaluationErrorKind::LogOfNonPositive => write!(f, "Logarithm of a non-positive value"),
      EvaluationErrorKind::NonFinite => write!(f, "Result is not a finite number"),
    }
  }
}
