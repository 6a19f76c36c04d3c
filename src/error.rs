
use crate::expr::calculus::DifferentiationError;
use crate::expr::eval::EvaluationError;
use crate::expr::parser::ParseError;
use crate::solver::SolverError;

use thiserror::Error;

/// Any error the formula-to-trace pipeline can produce. Callers that
/// drive individual stages get the specific error types; callers that
/// go from text to solution in one call get this sum.
#[derive(Debug, Clone, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
  #[error("{0}")]
  ParseError(#[from] ParseError),
  #[error("{0}")]
  DifferentiationError(#[from] DifferentiationError),
  #[error("{0}")]
  EvaluationError(#[from] EvaluationError),
  #[error("{0}")]
  SolverError(#[from] SolverError),
}
