//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{BenchmarkService, ReportService};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::RootApproximator;
use crate::infrastructure::traits::{Clock, FileSystem, RealFileSystem, SystemClock};

/// Container holding application settings and I/O boundaries.
///
/// Services are built on demand from the current settings.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Clock used for benchmark timing
    pub clock: Arc<dyn Clock>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(SystemClock), Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, clock: Arc<dyn Clock>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings: Arc::new(settings),
            clock,
            fs,
        }
    }

    /// Approximator configured by the settings.
    pub fn approximator(&self) -> ApplicationResult<RootApproximator> {
        self.settings.build_approximator()
    }

    /// Benchmark harness using the configured approximator and repetitions.
    pub fn benchmark_service(&self) -> ApplicationResult<BenchmarkService> {
        BenchmarkService::new(
            self.approximator()?,
            Arc::clone(&self.clock),
            self.settings.bench.repetitions,
        )
    }

    pub fn report_service(&self) -> ReportService {
        ReportService::new(Arc::clone(&self.fs))
    }
}
