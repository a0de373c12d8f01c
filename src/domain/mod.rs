//! Domain layer: points, the attachment tree and the tour engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod engine;
pub mod error;
pub mod history;
pub mod listener;
pub mod point;
pub mod region;

pub use arena::{PointArena, PointId, TreeLinks, TreeNode};
pub use engine::{
    Generation, Phase, Segment, Snapshot, StepResult, TourEngine, DEFAULT_ATTEMPTS_PER_POINT,
};
pub use error::{DomainError, DomainResult};
pub use history::{Action, ActionLog};
pub use listener::CompletionListener;
pub use point::{distance, Point};
pub use region::Region;
