//! Infrastructure layer: listeners and DI container
//!
//! This layer implements the engine's outward seams and wires up services.

pub mod di;
pub mod error;
pub mod listeners;

pub use error::InfraError;
pub use listeners::ChannelListener;
