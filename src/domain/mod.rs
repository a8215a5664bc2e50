//! Domain layer: the root approximator and its entities
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod approximator;
pub mod entities;
pub mod error;

pub use approximator::{
    cube_root, RootApproximator, DEFAULT_DEGREE, DEFAULT_MAX_ITERATIONS, DEFAULT_PRECISION,
    MAX_DEGREE,
};
pub use entities::*;
pub use error::{DomainError, DomainResult};
