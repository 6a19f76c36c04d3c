
use serde::{Deserialize, Serialize};

/// Tuning parameters for one solve call. Immutable for the duration
/// of the solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
  /// The starting estimate `x0`.
  pub initial_guess: f64,
  /// Convergence threshold for the relative error, in percent.
  /// Must be positive.
  pub tolerance_percent: f64,
  /// Hard cap on the number of update steps.
  pub max_iterations: usize,
  /// Derivative magnitudes below this floor abort the iteration
  /// rather than dividing.
  pub derivative_floor: f64,
  /// Iterates within this distance of zero switch the error metric
  /// from relative to absolute.
  pub near_zero_floor: f64,
}

impl SolverConfig {
  pub const DEFAULT_MAX_ITERATIONS: usize = 50;
  pub const DEFAULT_DERIVATIVE_FLOOR: f64 = 1e-10;
  pub const DEFAULT_NEAR_ZERO_FLOOR: f64 = 1e-10;

  pub fn new(initial_guess: f64, tolerance_percent: f64) -> Self {
    Self {
      initial_guess,
      tolerance_percent,
      max_iterations: Self::DEFAULT_MAX_ITERATIONS,
      derivative_floor: Self::DEFAULT_DERIVATIVE_FLOOR,
      near_zero_floor: Self::DEFAULT_NEAR_ZERO_FLOOR,
    }
  }
}
