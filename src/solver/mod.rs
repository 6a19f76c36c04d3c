
//! Implementation of the Newton-Raphson method for finding roots of
//! differentiable functions, keeping a full trace of every step for
//! display.
//!
//! See <https://en.wikipedia.org/wiki/Newton%27s_method>.

mod config;
mod trace;

pub use config::SolverConfig;
pub use trace::{IterationRecord, Trace};

use crate::expr::Expr;
use crate::expr::calculus::{differentiate, DifferentiationError};
use crate::expr::eval::{EvaluationError, ExprFunction};

use serde::Serialize;
use thiserror::Error;

/// How a completed solve ended. Hitting the iteration cap is a
/// partial success, not an error: the trace accumulated so far is
/// still meaningful, and the caller decides whether to treat
/// non-convergence as fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Termination {
  Converged,
  MaxIterationsReached,
}

/// The result of a completed solve: the full iteration trace and how
/// it ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
  pub trace: Trace,
  pub termination: Termination,
}

#[derive(Debug, Clone, Error, PartialEq)]
#[non_exhaustive]
pub enum SolverError {
  #[error("{0}")]
  DifferentiationError(#[from] DifferentiationError),
  #[error("{0}")]
  EvaluationError(#[from] EvaluationError),
  #[error("Derivative is near zero ({derivative}) at x = {x}, iteration {iteration}")]
  DerivativeNearZero { x: f64, derivative: f64, iteration: usize },
}

/// A function paired with its derivative, both compiled for numeric
/// evaluation.
struct FunctionWithDerivative {
  function: ExprFunction,
  derivative: ExprFunction,
}

impl FunctionWithDerivative {
  /// Differentiates `expr` once and compiles both trees. The trees
  /// live only as long as this pair; the caller keeps the original.
  fn from_expr(expr: &Expr) -> Result<Self, SolverError> {
    let derivative = differentiate(expr)?;
    Ok(Self {
      function: ExprFunction::new(expr.clone()),
      derivative: ExprFunction::new(derivative),
    })
  }

  /// Evaluates `f` and `f'` at `x` in one shot.
  fn eval_pair(&self, x: f64) -> Result<(f64, f64), EvaluationError> {
    Ok((self.function.eval_at(x)?, self.derivative.eval_at(x)?))
  }
}

/// Runs Newton-Raphson on `f` with the given configuration.
///
/// The returned trace always starts with a record for the initial
/// guess (index 0, infinite error), followed by one record per update
/// step. Because the index-0 error is infinite, the loop always takes
/// at least one real step, even if the initial guess already sits on
/// a root.
pub fn solve(f: &Expr, config: &SolverConfig) -> Result<Solution, SolverError> {
  let pair = FunctionWithDerivative::from_expr(f)?;
  let mut trace = Trace::default();

  let x0 = config.initial_guess;
  let (fx0, fprime_x0) = pair.eval_pair(x0)?;
  trace.push(IterationRecord {
    index: 0,
    x: x0,
    fx: fx0,
    fprime_x: fprime_x0,
    error_percent: f64::INFINITY,
  });

  let mut x = x0;
  let mut error_percent = f64::INFINITY;
  let mut iteration = 1;
  while error_percent > config.tolerance_percent && iteration <= config.max_iterations {
    let (fx, fprime_x) = pair.eval_pair(x)?;
    if fprime_x.abs() < config.derivative_floor {
      return Err(SolverError::DerivativeNearZero { x, derivative: fprime_x, iteration });
    }

    let x_new = x - fx / fprime_x;

    // Relative error in percent, falling back to absolute error when
    // the new iterate sits close to zero and a relative measure would
    // be meaningless.
    error_percent = if x_new.abs() < config.near_zero_floor {
      (x_new - x).abs() * 100.0
    } else {
      ((x_new - x) / x_new).abs() * 100.0
    };

    // Evaluate at the new estimate before recording the step; a
    // failure here discards the step entirely.
    let (fx_new, fprime_x_new) = pair.eval_pair(x_new)?;
    trace.push(IterationRecord {
      index: iteration,
      x: x_new,
      fx: fx_new,
      fprime_x: fprime_x_new,
      error_percent,
    });

    if error_percent <= config.tolerance_percent {
      return Ok(Solution { trace, termination: Termination::Converged });
    }
    x = x_new;
    iteration += 1;
  }

  Ok(Solution { trace, termination: Termination::MaxIterationsReached })
}
