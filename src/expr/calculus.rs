
//! Symbolic differentiation with respect to the free variable.
//!
//! The rules are applied structurally and the result is not
//! simplified; the derivative tree may be syntactically larger than a
//! hand-simplified one, but it evaluates to the same values.

use super::{BinaryOp, Expr, Function, UnaryOp};

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
#[non_exhaustive]
pub enum DifferentiationError {
  #[error("Cannot differentiate a power whose exponent contains the variable")]
  NonConstantExponent,
}

/// Differentiates `expr`, producing a new tree. Total over well-formed
/// trees, except for `^` with the variable in the exponent: exponents
/// are treated as constant-valued, and anything else is rejected.
pub fn differentiate(expr: &Expr) -> Result<Expr, DifferentiationError> {
  match expr {
    Expr::Constant(_) => Ok(Expr::zero()),
    Expr::Variable => Ok(Expr::one()),
    Expr::Binary(op, left, right) => differentiate_binary(*op, left, right),
    Expr::Unary(UnaryOp::Neg, operand) => Ok(Expr::neg(differentiate(operand)?)),
    Expr::Call(function, operand) => {
      // Chain rule: (f(u))' = f'(u) * u'.
      let du = differentiate(operand)?;
      Ok(Expr::mul(outer_derivative(*function, operand), du))
    }
  }
}

fn differentiate_binary(op: BinaryOp, u: &Expr, v: &Expr) -> Result<Expr, DifferentiationError> {
  match op {
    BinaryOp::Add => Ok(Expr::add(differentiate(u)?, differentiate(v)?)),
    BinaryOp::Sub => Ok(Expr::sub(differentiate(u)?, differentiate(v)?)),
    BinaryOp::Mul => {
      // d(u*v) = u'v + uv'
      let du = differentiate(u)?;
      let dv = differentiate(v)?;
      Ok(Expr::add(
        Expr::mul(du, v.clone()),
        Expr::mul(u.clone(), dv),
      ))
    }
    BinaryOp::Div => {
      // d(u/v) = (u'v - uv') / v^2
      let du = differentiate(u)?;
      let dv = differentiate(v)?;
      Ok(Expr::div(
        Expr::sub(
          Expr::mul(du, v.clone()),
          Expr::mul(u.clone(), dv),
        ),
        Expr::pow(v.clone(), Expr::constant(2.0)),
      ))
    }
    BinaryOp::Pow => {
      if v.contains_variable() {
        return Err(DifferentiationError::NonConstantExponent);
      }
      // Constant-exponent power rule: d(u^n) = n * u^(n-1) * u'.
      let du = differentiate(u)?;
      Ok(Expr::mul(
        Expr::mul(
          v.clone(),
          Expr::pow(u.clone(), Expr::sub(v.clone(), Expr::one())),
        ),
        du,
      ))
    }
  }
}

/// The derivative of each supported function, evaluated at its
/// operand `u` (the `f'(u)` factor of the chain rule).
fn outer_derivative(function: Function, u: &Expr) -> Expr {
  match function {
    Function::Sin => Expr::call(Function::Cos, u.clone()),
    Function::Cos => Expr::neg(Expr::call(Function::Sin, u.clone())),
    // tan' = 1 + tan^2 = sec^2
    Function::Tan => Expr::add(
      Expr::one(),
      Expr::pow(Expr::call(Function::Tan, u.clone()), Expr::constant(2.0)),
    ),
    Function::Exp => Expr::call(Function::Exp, u.clone()),
    Function::Ln => Expr::div(Expr::one(), u.clone()),
    Function::Sqrt => Expr::div(
      Expr::one(),
      Expr::mul(Expr::constant(2.0), Expr::call(Function::Sqrt, u.clone())),
    ),
  }
}
