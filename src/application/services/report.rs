//! Reporting service
//!
//! Renders benchmark samples as console lines and exports them as a data
//! file for an external plotting tool.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::services::BenchmarkReport;
use crate::application::{ApplicationResult, ExportResultExt};
use crate::domain::{expand_env_vars, Sample, Termination};
use crate::infrastructure::traits::FileSystem;

/// Export file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Toml,
    Json,
}

impl ReportFormat {
    /// Format implied by a file extension, if any.
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "toml" => Some(ReportFormat::Toml),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Toml => f.write_str("toml"),
            ReportFormat::Json => f.write_str("json"),
        }
    }
}

/// `"{value}: Steps={steps}, Time={seconds:.8f} seconds"`
pub fn format_sample_line(sample: &Sample) -> String {
    format!(
        "{}: Steps={}, Time={:.8} seconds",
        sample.value,
        sample.steps,
        sample.seconds()
    )
}

#[derive(Debug, Serialize)]
struct ExportMeta<'a> {
    host: &'a str,
    generated_at: String,
    degree: u32,
    precision: f64,
    repetitions: u32,
}

#[derive(Debug, Serialize)]
struct ExportRow {
    digits: u32,
    value: u64,
    steps: u32,
    seconds: f64,
    root: f64,
    termination: Termination,
}

#[derive(Debug, Serialize)]
struct ExportDocument<'a> {
    meta: ExportMeta<'a>,
    samples: Vec<ExportRow>,
}

impl<'a> From<&'a BenchmarkReport> for ExportDocument<'a> {
    fn from(report: &'a BenchmarkReport) -> Self {
        Self {
            meta: ExportMeta {
                host: &report.host,
                generated_at: report.generated_at.to_rfc3339(),
                degree: report.degree,
                precision: report.precision,
                repetitions: report.repetitions,
            },
            samples: report
                .samples
                .iter()
                .map(|s| ExportRow {
                    digits: s.digits,
                    value: s.value,
                    steps: s.steps,
                    seconds: s.seconds(),
                    root: s.root,
                    termination: s.termination,
                })
                .collect(),
        }
    }
}

/// Service for presenting and exporting benchmark results.
pub struct ReportService {
    fs: Arc<dyn FileSystem>,
}

impl ReportService {
    /// Create a new report service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// One legacy-format line per sample, in run order.
    pub fn render_lines(&self, report: &BenchmarkReport) -> Vec<String> {
        report.samples.iter().map(format_sample_line).collect()
    }

    /// Serialize the report without writing it.
    pub fn render(&self, report: &BenchmarkReport, format: ReportFormat) -> ApplicationResult<String> {
        let document = ExportDocument::from(report);
        let target = Path::new("<report>");
        match format {
            ReportFormat::Toml => {
                toml::to_string_pretty(&document).with_path_context("serialize toml", target)
            }
            ReportFormat::Json => {
                serde_json::to_string_pretty(&document).with_path_context("serialize json", target)
            }
        }
    }

    /// Write the report to `path` (after `~`/`$VAR` expansion).
    ///
    /// Returns the expanded path actually written.
    #[instrument(skip(self, report))]
    pub fn export(
        &self,
        report: &BenchmarkReport,
        path: &Path,
        format: ReportFormat,
    ) -> ApplicationResult<PathBuf> {
        let path = PathBuf::from(expand_env_vars(&path.to_string_lossy()));
        let content = self.render(report, format)?;

        self.fs
            .ensure_parent(&path)
            .with_path_context("create parent directory for", &path)?;
        self.fs
            .write(&path, &content)
            .with_path_context("write report", &path)?;

        debug!(
            "export: wrote {} samples as {} to {}",
            report.samples.len(),
            format,
            path.display()
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_sample_line() {
        let sample = Sample {
            value: 1_000_000_005,
            digits: 10,
            steps: 69,
            elapsed: Duration::from_micros(12),
            root: 1000.0000016666666,
            termination: Termination::WithinPrecision,
        };
        assert_eq!(
            format_sample_line(&sample),
            "1000000005: Steps=69, Time=0.00001200 seconds"
        );
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ReportFormat::from_extension(Path::new("out/run.JSON")),
            Some(ReportFormat::Json)
        );
        assert_eq!(
            ReportFormat::from_extension(Path::new("run.toml")),
            Some(ReportFormat::Toml)
        );
        assert_eq!(ReportFormat::from_extension(Path::new("run.csv")), None);
        assert_eq!(ReportFormat::from_extension(Path::new("run")), None);
    }
}
