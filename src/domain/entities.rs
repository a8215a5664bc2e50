//! Domain entities: approximation results, benchmark samples, input parsing

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use super::error::{DomainError, DomainResult};

/// Why the bisection loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// `|m^degree - |n|| < precision`
    WithinPrecision,
    /// Midpoint no longer distinguishable from a bound in f64
    BracketCollapsed,
    /// Iteration cap reached
    IterationLimit,
}

impl Termination {
    pub fn is_converged(&self) -> bool {
        matches!(self, Termination::WithinPrecision)
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Termination::WithinPrecision => "within precision",
            Termination::BracketCollapsed => "bracket collapsed",
            Termination::IterationLimit => "iteration limit",
        };
        f.write_str(s)
    }
}

/// Result of a single approximation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Approximation {
    /// Approximate root, sign-corrected
    pub root: f64,
    /// Number of midpoints evaluated
    pub steps: u32,
    pub termination: Termination,
}

impl Approximation {
    /// The legacy `(root, steps)` pair.
    pub fn as_pair(&self) -> (f64, u32) {
        (self.root, self.steps)
    }
}

/// One harness measurement: input, digit length, steps and elapsed time.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub value: u64,
    pub digits: u32,
    pub steps: u32,
    pub elapsed: Duration,
    pub root: f64,
    pub termination: Termination,
}

impl Sample {
    pub fn seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Parse a user-supplied value, rejecting non-numeric and non-finite input.
///
/// Accepts anything `f64::from_str` accepts after trimming whitespace,
/// except `NaN` and the infinities.
pub fn parse_value(text: &str) -> DomainResult<f64> {
    let trimmed = text.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| DomainError::InvalidNumber(text.to_string()))?;
    if !value.is_finite() {
        return Err(DomainError::NonFiniteInput(value));
    }
    Ok(value)
}

/// Number of decimal digits of `value` (`0` has one digit).
pub fn digit_count(value: u64) -> u32 {
    value.checked_ilog10().map_or(1, |d| d + 1)
}

/// Expand `~`, `$VAR` and `${VAR}` in a path-like string.
///
/// Unresolvable variables leave the input unchanged.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
