//! Benchmark harness service
//!
//! Runs the approximator over inputs of increasing digit length
//! (6, 15, 105, ...) and collects step counts and wall-clock time.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{digit_count, Approximation, RootApproximator, Sample};
use crate::infrastructure::traits::Clock;

/// Largest digit length whose test value `10^(d-1) + 5` fits in `u64`.
pub const MAX_DIGITS: u32 = 19;

/// Test inputs for digit lengths `1..=max_digits`: `(digits, 10^(digits-1) + 5)`.
pub fn test_values(max_digits: u32) -> ApplicationResult<Vec<(u32, u64)>> {
    if max_digits == 0 || max_digits > MAX_DIGITS {
        return Err(ApplicationError::InvalidDigits {
            got: max_digits,
            max: MAX_DIGITS,
        });
    }
    (1..=max_digits)
        .map(|digits| {
            10u64
                .checked_pow(digits - 1)
                .and_then(|p| p.checked_add(5))
                .map(|value| (digits, value))
                .ok_or(ApplicationError::InvalidDigits {
                    got: max_digits,
                    max: MAX_DIGITS,
                })
        })
        .collect()
}

/// Samples of one harness run plus the parameters they were taken with.
#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    pub samples: Vec<Sample>,
    pub degree: u32,
    pub precision: f64,
    pub repetitions: u32,
    pub host: String,
    pub generated_at: DateTime<Local>,
}

impl BenchmarkReport {
    pub fn total_steps(&self) -> u64 {
        self.samples.iter().map(|s| u64::from(s.steps)).sum()
    }

    pub fn total_elapsed(&self) -> Duration {
        self.samples.iter().map(|s| s.elapsed).sum()
    }

    /// Samples whose approximation stopped outside the precision window.
    pub fn unconverged(&self) -> impl Iterator<Item = &Sample> {
        self.samples
            .iter()
            .filter(|s| !s.termination.is_converged())
    }
}

/// Service for timing the approximator over generated inputs.
pub struct BenchmarkService {
    approximator: RootApproximator,
    clock: Arc<dyn Clock>,
    repetitions: u32,
}

impl BenchmarkService {
    /// Create a new benchmark service.
    ///
    /// Each input is approximated `repetitions` times; the reported time is
    /// the mean over those calls.
    pub fn new(
        approximator: RootApproximator,
        clock: Arc<dyn Clock>,
        repetitions: u32,
    ) -> ApplicationResult<Self> {
        if repetitions == 0 {
            return Err(ApplicationError::Config {
                message: "repetitions must be at least 1".into(),
            });
        }
        Ok(Self {
            approximator,
            clock,
            repetitions,
        })
    }

    /// Run the harness for digit lengths `1..=max_digits`.
    #[instrument(skip(self))]
    pub fn run(&self, max_digits: u32) -> ApplicationResult<BenchmarkReport> {
        let inputs = test_values(max_digits)?;
        let mut samples = Vec::with_capacity(inputs.len());

        for (_, value) in inputs {
            let sample = self.measure(value)?;
            debug!(
                "run: value={} digits={} steps={} elapsed={:?} ({})",
                sample.value, sample.digits, sample.steps, sample.elapsed, sample.termination
            );
            samples.push(sample);
        }

        Ok(BenchmarkReport {
            samples,
            degree: self.approximator.degree(),
            precision: self.approximator.precision(),
            repetitions: self.repetitions,
            host: host_name(),
            generated_at: Local::now(),
        })
    }

    /// Time a single input. Steps and root come from the last repetition.
    pub fn measure(&self, value: u64) -> ApplicationResult<Sample> {
        let mut total = Duration::ZERO;
        let mut last: Option<Approximation> = None;

        for _ in 0..self.repetitions {
            let start = self.clock.start();
            let approximation = self.approximator.approximate(value as f64)?;
            total += self.clock.elapsed(start);
            last = Some(approximation);
        }

        let approximation = last.ok_or_else(|| ApplicationError::Config {
            message: "repetitions must be at least 1".into(),
        })?;

        Ok(Sample {
            value,
            digits: digit_count(value),
            steps: approximation.steps,
            elapsed: total / self.repetitions,
            root: approximation.root,
            termination: approximation.termination,
        })
    }
}

fn host_name() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".into())
}
