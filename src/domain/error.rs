//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent rejected operations on the tour engine.
/// These are independent of configuration and terminal concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("action history is empty")]
    EmptyHistory,

    #[error(
        "invalid region {x},{y},{width},{height}: size must be positive and fit the i32 coordinate range"
    )]
    InvalidRegion {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    #[error("region holds only {capacity} distinct points, {requested} requested")]
    RegionTooSmall { requested: usize, capacity: u64 },

    #[error("invalid point '{0}': expected X,Y")]
    InvalidPoint(String),

    #[error("invalid region '{0}': expected X,Y,WIDTH,HEIGHT")]
    InvalidRegionSpec(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
