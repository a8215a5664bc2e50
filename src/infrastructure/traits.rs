//! I/O boundary traits for testability
//!
//! These traits abstract the clock and the filesystem, allowing services
//! to be tested with mock implementations.

use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

/// Monotonic clock abstraction for timing measurements.
pub trait Clock: Send + Sync {
    /// Start a measurement.
    fn start(&self) -> Instant;

    /// Elapsed time since `start`.
    fn elapsed(&self, start: Instant) -> Duration;
}

/// Filesystem abstraction for report export.
pub trait FileSystem: Send + Sync {
    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Wall-clock timing via `std::time::Instant`.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn start(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, start: Instant) -> Duration {
        start.elapsed()
    }
}

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
                std::fs::create_dir_all(parent)
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock;
        let start = clock.start();
        let first = clock.elapsed(start);
        let second = clock.elapsed(start);
        assert!(second >= first);
    }

    #[test]
    fn test_ensure_parent_creates_missing_directories() {
        let temp = tempfile::TempDir::new().unwrap();
        let target = temp.path().join("a/b/report.toml");

        RealFileSystem.ensure_parent(&target).unwrap();

        assert!(temp.path().join("a/b").is_dir());
    }
}
