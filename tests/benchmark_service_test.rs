//! Tests for BenchmarkService

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rootbench::application::services::{test_values, BenchmarkService, MAX_DIGITS};
use rootbench::application::ApplicationError;
use rootbench::domain::{RootApproximator, Termination};
use rootbench::infrastructure::traits::{Clock, SystemClock};
use rootbench::util::testing;

/// Clock that reports a fixed duration per measurement and counts calls.
struct FixedClock {
    step: Duration,
    starts: AtomicUsize,
}

impl FixedClock {
    fn new(step: Duration) -> Self {
        Self {
            step,
            starts: AtomicUsize::new(0),
        }
    }
}

impl Clock for FixedClock {
    fn start(&self) -> Instant {
        self.starts.fetch_add(1, Ordering::SeqCst);
        Instant::now()
    }

    fn elapsed(&self, _start: Instant) -> Duration {
        self.step
    }
}

fn service_with(clock: Arc<dyn Clock>, repetitions: u32) -> BenchmarkService {
    testing::init_test_setup();
    BenchmarkService::new(RootApproximator::cube(), clock, repetitions).expect("service")
}

#[test]
fn given_ten_digits_when_generating_values_then_matches_legacy_sequence() {
    let values: Vec<u64> = test_values(10).unwrap().into_iter().map(|(_, v)| v).collect();
    assert_eq!(
        values,
        vec![
            6,
            15,
            105,
            1_005,
            10_005,
            100_005,
            1_000_005,
            10_000_005,
            100_000_005,
            1_000_000_005
        ]
    );
}

#[test]
fn given_max_digits_when_generating_values_then_last_fits_u64() {
    let values = test_values(MAX_DIGITS).unwrap();
    assert_eq!(values.last(), Some(&(19, 1_000_000_000_000_000_005)));
}

#[test]
fn given_fixed_clock_when_running_then_collects_one_sample_per_digit() {
    let clock = Arc::new(FixedClock::new(Duration::from_millis(2)));
    let service = service_with(clock.clone(), 1);

    let report = service.run(4).unwrap();

    assert_eq!(report.samples.len(), 4);
    let digits: Vec<u32> = report.samples.iter().map(|s| s.digits).collect();
    assert_eq!(digits, vec![1, 2, 3, 4]);
    assert_eq!(report.samples[1].value, 15);
    assert!(report
        .samples
        .iter()
        .all(|s| s.elapsed == Duration::from_millis(2)));
    assert_eq!(report.total_elapsed(), Duration::from_millis(8));
    assert_eq!(clock.starts.load(Ordering::SeqCst), 4);
    assert_eq!(report.degree, 3);
    assert_eq!(report.precision, 1e-10);
}

#[test]
fn given_repetitions_when_running_then_reports_mean_time_and_calls_each_value_repeatedly() {
    let clock = Arc::new(FixedClock::new(Duration::from_micros(30)));
    let service = service_with(clock.clone(), 5);

    let report = service.run(3).unwrap();

    assert_eq!(clock.starts.load(Ordering::SeqCst), 15);
    assert!(report
        .samples
        .iter()
        .all(|s| s.elapsed == Duration::from_micros(30)));
    assert_eq!(report.repetitions, 5);
}

#[test]
fn given_run_when_inspecting_samples_then_steps_match_direct_approximation() {
    let service = service_with(Arc::new(SystemClock), 1);

    let report = service.run(10).unwrap();

    for sample in &report.samples {
        let direct = RootApproximator::cube()
            .approximate(sample.value as f64)
            .unwrap();
        assert_eq!(sample.steps, direct.steps, "value {}", sample.value);
        assert_eq!(sample.root, direct.root);
        assert_ne!(sample.termination, Termination::IterationLimit);
    }
    assert_eq!(
        report.total_steps(),
        report.samples.iter().map(|s| u64::from(s.steps)).sum::<u64>()
    );
    assert!(!report.host.is_empty());
}

#[test]
fn given_zero_repetitions_when_creating_service_then_rejects() {
    let result = BenchmarkService::new(RootApproximator::cube(), Arc::new(SystemClock), 0);
    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_too_many_digits_when_running_then_rejects() {
    let service = service_with(Arc::new(SystemClock), 1);
    assert!(matches!(
        service.run(MAX_DIGITS + 1),
        Err(ApplicationError::InvalidDigits { got: 20, .. })
    ));
}

#[test]
fn given_strict_approximator_with_tiny_cap_when_running_then_propagates_domain_error() {
    let strict = RootApproximator::new(3, 1e-10, 3, true).unwrap();
    let service = BenchmarkService::new(strict, Arc::new(SystemClock), 1).unwrap();
    assert!(matches!(service.run(2), Err(ApplicationError::Domain(_))));
}

#[test]
fn given_values_without_f64_root_in_window_when_running_then_reported_unconverged() {
    let service = service_with(Arc::new(FixedClock::new(Duration::from_micros(1))), 1);

    let report = service.run(10).unwrap();

    let unconverged: Vec<u64> = report.unconverged().map(|s| s.value).collect();
    assert_eq!(unconverged, vec![1_000_005, 10_000_005, 100_000_005]);
    assert!(report
        .unconverged()
        .all(|s| s.termination == Termination::BracketCollapsed));
    assert_eq!(report.samples[6].steps, 66);
    assert_eq!(report.samples[9].steps, 69);
    assert_eq!(report.samples[9].termination, Termination::WithinPrecision);
}
