
//! Core pipeline for an interactive Newton-Raphson root finder:
//! formula text is parsed into an expression tree, differentiated
//! symbolically, compiled for numeric evaluation, and iterated to a
//! root, producing a per-step trace for the surrounding UI to
//! display.

pub mod error;
pub mod expr;
pub mod parsing;
pub mod solver;

use crate::error::Error;
use crate::expr::parser::ExprParser;
use crate::solver::{Solution, SolverConfig};

/// Parses `function_text` and runs Newton-Raphson on it. The text
/// must already use `.` as its decimal separator; converting a locale
/// comma is the caller's concern.
pub fn solve_formula(function_text: &str, config: &SolverConfig) -> Result<Solution, Error> {
  let expr = ExprParser::new().parse(function_text)?;
  let solution = solver::solve(&expr, config)?;
  Ok(solution)
}
