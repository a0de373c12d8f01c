//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.

mod session;

pub use session::TourSession;
