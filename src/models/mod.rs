//! Core data models for bracket statistics.

mod position;
mod stats;
mod tournament;

pub use position::*;
pub use stats::*;
pub use tournament::*;
