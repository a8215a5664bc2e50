//! rootbench: bounded binary-search root approximation
//!
//! The [`domain`] layer holds the approximator itself; [`application`]
//! services run the step/time benchmark and report its samples.
//!
//! ```
//! let (root, steps) = rootbench::cube_root(-27.0).unwrap();
//! assert!((root + 3.0).abs() < 1e-9);
//! assert!(steps > 0);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{cube_root, Approximation, RootApproximator, Termination};
