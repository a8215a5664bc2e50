//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (Clock, FileSystem)
//! but are themselves concrete structs, not traits.

mod benchmark;
mod report;

pub use benchmark::{test_values, BenchmarkReport, BenchmarkService, MAX_DIGITS};
pub use report::{format_sample_line, ReportFormat, ReportService};
