//! Bounded root approximation by bisection
//!
//! Searches `[0, max(|n|, 1)]` for `m` with `m^degree` within `precision` of
//! `|n|`, then restores the sign. The loop always terminates: besides the
//! precision check it stops once the midpoint coincides with a bound (no
//! further f64 progress is possible) or the iteration cap is hit.

use tracing::trace;

use super::entities::{Approximation, Termination};
use super::error::{DomainError, DomainResult};

pub const DEFAULT_DEGREE: u32 = 3;
pub const DEFAULT_PRECISION: f64 = 1e-10;
/// Enough to bisect the whole f64 range down to adjacent floats.
pub const DEFAULT_MAX_ITERATIONS: u32 = 4096;
/// Each step costs `degree - 1` multiplications.
pub const MAX_DEGREE: u32 = 64;

/// Binary-search root approximator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootApproximator {
    degree: u32,
    precision: f64,
    max_iterations: u32,
    strict: bool,
}

impl Default for RootApproximator {
    fn default() -> Self {
        Self::cube()
    }
}

impl RootApproximator {
    /// Create an approximator, validating its parameters.
    ///
    /// # Errors
    /// * `InvalidParameter` if `degree` is outside `2..=MAX_DEGREE`, `precision` is not a positive
    ///   finite number, or `max_iterations == 0`.
    pub fn new(
        degree: u32,
        precision: f64,
        max_iterations: u32,
        strict: bool,
    ) -> DomainResult<Self> {
        if !(2..=MAX_DEGREE).contains(&degree) {
            return Err(DomainError::InvalidParameter {
                name: "degree",
                message: format!("must be between 2 and {}, got {}", MAX_DEGREE, degree),
            });
        }
        if !(precision.is_finite() && precision > 0.0) {
            return Err(DomainError::InvalidParameter {
                name: "precision",
                message: format!("must be a positive finite number, got {}", precision),
            });
        }
        if max_iterations == 0 {
            return Err(DomainError::InvalidParameter {
                name: "max_iterations",
                message: "must be at least 1".into(),
            });
        }
        Ok(Self {
            degree,
            precision,
            max_iterations,
            strict,
        })
    }

    /// Cube root with the default precision and iteration cap, lenient mode.
    pub fn cube() -> Self {
        Self {
            degree: DEFAULT_DEGREE,
            precision: DEFAULT_PRECISION,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            strict: false,
        }
    }

    pub fn degree(&self) -> u32 {
        self.degree
    }

    pub fn precision(&self) -> f64 {
        self.precision
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Approximate the `degree`-th root of `n`.
    ///
    /// Negative `n` is handled by searching on `|n|` and negating the result,
    /// so `approximate(-x).root == -approximate(x).root` bit for bit.
    ///
    /// # Errors
    /// * `NonFiniteInput` for NaN or infinite `n`
    /// * `NegativeEvenRoot` for negative `n` with an even degree
    /// * `DidNotConverge` in strict mode when the loop stops outside the
    ///   precision window
    pub fn approximate(&self, n: f64) -> DomainResult<Approximation> {
        if !n.is_finite() {
            return Err(DomainError::NonFiniteInput(n));
        }
        let is_negative = n < 0.0;
        if is_negative && self.degree % 2 == 0 {
            return Err(DomainError::NegativeEvenRoot {
                value: n,
                degree: self.degree,
            });
        }

        let target = n.abs();
        let mut low = 0.0_f64;
        // roots of values in (0, 1) lie above the value itself
        let mut high = if target > 0.0 && target < 1.0 {
            1.0
        } else {
            target
        };

        let mut steps = 0_u32;
        let mut mid = low;
        let mut termination = Termination::IterationLimit;

        while steps < self.max_iterations {
            steps += 1;
            mid = low + (high - low) / 2.0;
            let power = self.power(mid);

            if (power - target).abs() < self.precision {
                termination = Termination::WithinPrecision;
                break;
            }
            if mid <= low || mid >= high {
                termination = Termination::BracketCollapsed;
                break;
            }
            if power < target {
                low = mid;
            } else {
                high = mid;
            }
        }

        trace!(
            n,
            root = mid,
            steps,
            ?termination,
            "approximate: degree={}",
            self.degree
        );

        if self.strict && !termination.is_converged() {
            return Err(DomainError::DidNotConverge {
                value: n,
                steps,
                termination,
            });
        }

        Ok(Approximation {
            root: if is_negative { -mid } else { mid },
            steps,
            termination,
        })
    }

    /// `m^degree` by repeated multiplication (`m*m*m` for the cube).
    fn power(&self, m: f64) -> f64 {
        (1..self.degree).fold(m, |acc, _| acc * m)
    }
}

/// Cube root of `n` with default settings, as the legacy `(root, steps)` pair.
pub fn cube_root(n: f64) -> DomainResult<(f64, u32)> {
    RootApproximator::cube().approximate(n).map(|a| a.as_pair())
}
