//! Greedy nearest-attachment tours, revealed one step at a time.
//!
//! Layers, inside out: `domain` (points, tree, engine), `application`
//! (step driver, session), `infrastructure` (listeners, wiring) and `cli`.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
