//! Application layer: step driver and session service
//!
//! This layer orchestrates domain logic and owns the only thread in the crate.

pub mod driver;
pub mod error;
pub mod services;

pub use driver::{lock_engine, SharedEngine, StepDriver, StepObserver};
pub use error::{ApplicationError, ApplicationResult};
