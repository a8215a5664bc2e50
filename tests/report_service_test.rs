//! Tests for ReportService

use std::sync::Arc;
use std::time::{Duration, Instant};

use tempfile::TempDir;

use rootbench::application::services::{
    BenchmarkReport, BenchmarkService, ReportFormat, ReportService,
};
use rootbench::application::ApplicationError;
use rootbench::domain::RootApproximator;
use rootbench::infrastructure::traits::{Clock, RealFileSystem};
use rootbench::util::testing;

struct QuarterMillisecondClock;

impl Clock for QuarterMillisecondClock {
    fn start(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, _start: Instant) -> Duration {
        Duration::from_micros(250)
    }
}

fn sample_report(max_digits: u32) -> BenchmarkReport {
    testing::init_test_setup();
    BenchmarkService::new(
        RootApproximator::cube(),
        Arc::new(QuarterMillisecondClock),
        1,
    )
    .unwrap()
    .run(max_digits)
    .unwrap()
}

fn service() -> ReportService {
    ReportService::new(Arc::new(RealFileSystem))
}

#[test]
fn given_report_when_rendering_lines_then_uses_legacy_format() {
    let report = sample_report(3);

    let lines = service().render_lines(&report);

    assert_eq!(lines.len(), 3);
    for (line, sample) in lines.iter().zip(&report.samples) {
        assert_eq!(
            line,
            &format!(
                "{}: Steps={}, Time=0.00025000 seconds",
                sample.value, sample.steps
            )
        );
    }
    assert!(lines[1].starts_with("15: Steps="));
}

#[test]
fn given_toml_format_when_exporting_then_writes_samples_table() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested/dir/run.toml");
    let report = sample_report(4);

    let written = service()
        .export(&report, &path, ReportFormat::Toml)
        .expect("export toml");

    assert_eq!(written, path);
    let content = std::fs::read_to_string(&path).unwrap();
    let doc: toml::Value = toml::from_str(&content).unwrap();
    let samples = doc["samples"].as_array().unwrap();
    assert_eq!(samples.len(), 4);
    assert_eq!(samples[1]["value"].as_integer(), Some(15));
    assert_eq!(samples[1]["digits"].as_integer(), Some(2));
    assert_eq!(
        samples[1]["steps"].as_integer(),
        Some(i64::from(report.samples[1].steps))
    );
    assert_eq!(samples[0]["termination"].as_str(), Some("within_precision"));
    assert_eq!(doc["meta"]["degree"].as_integer(), Some(3));
}

#[test]
fn given_json_format_when_exporting_then_writes_parseable_json() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("run.json");
    let report = sample_report(10);

    service()
        .export(&report, &path, ReportFormat::Json)
        .expect("export json");

    let content = std::fs::read_to_string(&path).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
    let samples = doc["samples"].as_array().unwrap();
    assert_eq!(samples.len(), 10);
    assert_eq!(samples[9]["value"].as_u64(), Some(1_000_000_005));
    assert_eq!(samples[9]["seconds"].as_f64(), Some(0.00025));
    assert_eq!(doc["meta"]["repetitions"].as_u64(), Some(1));
}

#[test]
fn given_unwritable_target_when_exporting_then_returns_operation_failed() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    let report = sample_report(1);

    let result = service().export(&report, &blocker.join("run.toml"), ReportFormat::Toml);

    match result {
        Err(ApplicationError::OperationFailed { context, .. }) => {
            assert!(context.contains("run.toml"), "context: {}", context)
        }
        other => panic!("expected OperationFailed, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn given_report_when_rendering_both_formats_then_contain_every_value() {
    let report = sample_report(5);
    let svc = service();

    for format in [ReportFormat::Toml, ReportFormat::Json] {
        let text = svc.render(&report, format).unwrap();
        for sample in &report.samples {
            assert!(
                text.contains(&sample.value.to_string()),
                "{} export misses {}",
                format,
                sample.value
            );
        }
    }
}
